use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use super::model::{
    FoodDataset, FoodRecord, LEGACY_PACKAGING, PACKAGING, PRODUCT_COLUMN, TOTAL_EMISSIONS_CLEAN,
};
use super::reconcile::reconcile;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Conditions that stop the pipeline before any view is built.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Source file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV framing (not a bad cell, those become missing).
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The source has no header row.
    #[error("CSV has no header row")]
    EmptyHeader,

    /// The label column is absent.
    #[error("CSV missing 'Food product' column")]
    MissingLabelColumn,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and reconcile the food production table from raw CSV bytes.
///
/// CSV layout: header row with column names. `Food product` holds the label,
/// every other column is coerced to a float. Cells that do not parse become
/// missing values; they never fail the load.
pub fn load_bytes(bytes: &[u8]) -> Result<FoodDataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let raw_headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();
    if raw_headers.is_empty() || raw_headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::EmptyHeader);
    }
    let headers = normalise_headers(raw_headers);

    let label_idx = headers
        .iter()
        .position(|h| h == PRODUCT_COLUMN)
        .ok_or(LoadError::MissingLabelColumn)?;

    // Numeric columns: everything but the label. A source copy of the
    // derived total is dropped, reconciliation recomputes it.
    let numeric: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != label_idx)
        .filter(|(_, name)| {
            if name.as_str() == TOTAL_EMISSIONS_CLEAN {
                log::warn!("Ignoring source column '{TOTAL_EMISSIONS_CLEAN}', it is recomputed");
                false
            } else {
                true
            }
        })
        .map(|(i, name)| (i, name.clone()))
        .collect();

    let mut records = Vec::new();
    let mut coerced = 0usize;

    for result in reader.byte_records() {
        let row = result?;

        // A blank label is stored empty and treated as missing downstream.
        let product = row
            .get(label_idx)
            .map(String::from_utf8_lossy)
            .filter(|cell| !cell.trim().is_empty())
            .map(|cell| cell.into_owned())
            .unwrap_or_default();

        let mut values = BTreeMap::new();
        for (col_idx, col_name) in &numeric {
            let cell = row
                .get(*col_idx)
                .map(String::from_utf8_lossy)
                .unwrap_or_default();
            let value = parse_numeric(&cell);
            if value.is_none() && !cell.trim().is_empty() {
                coerced += 1;
            }
            values.insert(col_name.clone(), value);
        }

        records.push(FoodRecord {
            product,
            values,
            total_emissions_clean: None,
        });
    }

    let column_names = numeric.into_iter().map(|(_, name)| name).collect();
    let mut dataset = FoodDataset::from_records(records, column_names);
    let overridden = reconcile(&mut dataset);

    log::info!(
        "Loaded {} products with stage columns {:?}",
        dataset.len(),
        dataset.stage_columns
    );
    log::debug!("{coerced} cells coerced to missing, {overridden} totals replaced by stage sums");

    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Memoized loading
// ---------------------------------------------------------------------------

/// Memo of load-and-reconcile keyed on source content.
///
/// Identical bytes always reconcile to an identical table, so the result is
/// shared for the rest of the session.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<(u64, usize), Arc<FoodDataset>>,
}

impl DatasetCache {
    /// Load `bytes`, reusing a previous result for the same content.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<Arc<FoodDataset>, LoadError> {
        let key = content_key(bytes);
        if let Some(hit) = self.entries.get(&key) {
            log::debug!("Dataset cache hit ({} bytes)", bytes.len());
            return Ok(Arc::clone(hit));
        }
        let dataset = Arc::new(load_bytes(bytes)?);
        self.entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Read `path` and load it through the cache.
    pub fn load_file(&mut self, path: &Path) -> Result<Arc<FoodDataset>, LoadError> {
        let bytes = read_source(path)?;
        self.load_bytes(&bytes)
    }

    /// Number of distinct sources held.
    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

fn content_key(bytes: &[u8]) -> (u64, usize) {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    (hasher.finish(), bytes.len())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_source(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Coerce one cell to a float. Blank, non-numeric and NaN cells are missing.
fn parse_numeric(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Make header names unique, then rename the legacy packaging header.
///
/// Later duplicates get `.1`, `.2`, ... suffixes. When the canonical
/// `Packaging` header already exists it keeps its name and the legacy
/// column takes the next free suffix.
fn normalise_headers(raw: Vec<String>) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(raw.len());
    for header in raw {
        let unique = unique_name(&names, &header);
        names.push(unique);
    }
    for i in 0..names.len() {
        if names[i] == LEGACY_PACKAGING {
            names[i] = unique_name(&names, PACKAGING);
        }
    }
    names
}

fn unique_name(taken: &[String], base: &str) -> String {
    if !taken.iter().any(|t| t == base) {
        return base.to_string();
    }
    let mut n = 1;
    loop {
        let candidate = format!("{base}.{n}");
        if !taken.iter().any(|t| *t == candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{TOTAL_EMISSIONS, TRANSPORT};

    const SAMPLE: &str = "\
Food product,Land use change,Animal Feed,Farm,Processing,Transport,Packging,Retail,Total_emissions,Land use per kilogram (m² per kilogram)
Beef (beef herd),16.3,1.9,39.4,1.3,0.3,0.2,0.2,59.6,326.21
Tofu,1,0,0.5,0.8,0.2,0.2,0.3,3,2.2
Rice,-0.1,0,3.6,0.1,0.1,0.1,0.1,4,n/a
";

    #[test]
    fn legacy_packaging_header_is_renamed() {
        let ds = load_bytes(SAMPLE.as_bytes()).unwrap();
        assert!(ds.has_column(PACKAGING));
        assert!(!ds.has_column(LEGACY_PACKAGING));
        assert_eq!(ds.stage_columns.len(), 7);
        assert_eq!(ds.records[1].value(PACKAGING), Some(0.2));
    }

    #[test]
    fn both_packaging_headers_keep_canonical_name() {
        let csv = "Food product,Packaging,Packging\nOats,0.1,0.2\n";
        let ds = load_bytes(csv.as_bytes()).unwrap();
        assert_eq!(ds.column_names, vec!["Packaging", "Packaging.1"]);
        assert_eq!(ds.records[0].value(PACKAGING), Some(0.1));
    }

    #[test]
    fn duplicate_headers_are_suffixed() {
        let csv = "Food product,Farm,Farm,Farm\nOats,1,2,3\n";
        let ds = load_bytes(csv.as_bytes()).unwrap();
        assert_eq!(ds.column_names, vec!["Farm", "Farm.1", "Farm.2"]);
        assert_eq!(ds.records[0].value("Farm.2"), Some(3.0));
    }

    #[test]
    fn bad_cells_become_missing() {
        let csv = "Food product,Farm,Transport,Other\nOats,abc,,NaN\nPeas, 1.5 ,1e-1,inf\n";
        let ds = load_bytes(csv.as_bytes()).unwrap();
        assert_eq!(ds.records[0].value("Farm"), None);
        assert_eq!(ds.records[0].value(TRANSPORT), None);
        assert_eq!(ds.records[0].value("Other"), None);
        assert_eq!(ds.records[1].value("Farm"), Some(1.5));
        assert_eq!(ds.records[1].value(TRANSPORT), Some(0.1));
        assert_eq!(ds.records[1].value("Other"), Some(f64::INFINITY));
    }

    #[test]
    fn short_rows_pad_with_missing() {
        let csv = "Food product,Farm,Retail\nOats,1\n";
        let ds = load_bytes(csv.as_bytes()).unwrap();
        assert_eq!(ds.records[0].value("Retail"), None);
        assert_eq!(ds.records[0].total_emissions_clean, Some(1.0));
    }

    #[test]
    fn missing_label_column_is_fatal() {
        let csv = "Product,Farm\nOats,1\n";
        assert!(matches!(
            load_bytes(csv.as_bytes()),
            Err(LoadError::MissingLabelColumn)
        ));
    }

    #[test]
    fn empty_source_is_fatal() {
        assert!(matches!(load_bytes(b""), Err(LoadError::EmptyHeader)));
    }

    #[test]
    fn unreadable_file_is_fatal() {
        let err = DatasetCache::default()
            .load_file(Path::new("/nonexistent/Food_Production.csv"))
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn blank_labels_load_as_missing() {
        let csv = "Food product,Farm\n,5\nBeef,3\n  ,1\n";
        let ds = load_bytes(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[0].label(), None);
        assert_eq!(ds.records[2].label(), None);
        assert_eq!(ds.records[0].value("Farm"), Some(5.0));
        assert_eq!(ds.products.iter().collect::<Vec<_>>(), vec!["Beef"]);
    }

    #[test]
    fn source_clean_column_is_recomputed() {
        let csv = "Food product,Farm,Total_emissions_clean\nOats,1.5,99\n";
        let ds = load_bytes(csv.as_bytes()).unwrap();
        assert!(!ds.column_names.iter().any(|c| c == TOTAL_EMISSIONS_CLEAN));
        assert_eq!(ds.records[0].total_emissions_clean, Some(1.5));
    }

    #[test]
    fn totals_are_reconciled_on_load() {
        let ds = load_bytes(SAMPLE.as_bytes()).unwrap();
        // Beef stages sum to 59.6 and agree with the stated total.
        assert_eq!(ds.records[0].total_emissions_clean, Some(59.6));
        // Tofu stages sum to 3.0.
        let tofu = ds.records[1].total_emissions_clean.unwrap();
        assert!((tofu - 3.0).abs() < 1e-9);
        // Rice stages sum to 3.9, which overrides the stated 4.
        let rice = ds.records[2].total_emissions_clean.unwrap();
        assert!((rice - 3.9).abs() < 1e-9);
        assert_eq!(ds.records[2].value(TOTAL_EMISSIONS), Some(4.0));
    }

    #[test]
    fn identical_content_yields_identical_table() {
        let a = load_bytes(SAMPLE.as_bytes()).unwrap();
        let b = load_bytes(SAMPLE.as_bytes()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn cache_shares_result_for_same_content() {
        let mut cache = DatasetCache::default();
        let a = cache.load_bytes(SAMPLE.as_bytes()).unwrap();
        let b = cache.load_bytes(SAMPLE.as_bytes()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        let other = "Food product,Farm\nOats,1\n";
        let c = cache.load_bytes(other.as_bytes()).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);
    }
}
