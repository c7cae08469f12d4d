use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Label column; the only non-numeric column of the source table.
pub const PRODUCT_COLUMN: &str = "Food product";

/// Stated total, possibly inconsistent with its stages.
pub const TOTAL_EMISSIONS: &str = "Total_emissions";

/// Derived total produced by reconciliation.
pub const TOTAL_EMISSIONS_CLEAN: &str = "Total_emissions_clean";

pub const FRESHWATER_COLUMN: &str = "Freshwater withdrawals per kilogram (liters per kilogram)";
pub const SCARCITY_WATER_COLUMN: &str =
    "Scarcity-weighted water use per kilogram (liters per kilogram)";
pub const LAND_USE_COLUMN: &str = "Land use per kilogram (m² per kilogram)";

pub const TRANSPORT: &str = "Transport";
pub const PACKAGING: &str = "Packaging";

/// Misspelled header found in the published dataset, renamed on load.
pub const LEGACY_PACKAGING: &str = "Packging";

/// Lifecycle stages in canonical order.
pub const STAGE_COLUMNS: [&str; 7] = [
    "Land use change",
    "Animal Feed",
    "Farm",
    "Processing",
    TRANSPORT,
    PACKAGING,
    "Retail",
];

// ---------------------------------------------------------------------------
// FoodRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single food product (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct FoodRecord {
    /// Value of the `Food product` column; empty when the cell was blank.
    pub product: String,
    /// Numeric columns: column_name → value (`None` = missing).
    pub values: BTreeMap<String, Option<f64>>,
    /// Reconciled total emissions.
    pub total_emissions_clean: Option<f64>,
}

impl FoodRecord {
    /// Product label, `None` for a blank `Food product` cell.
    pub fn label(&self) -> Option<&str> {
        (!self.product.is_empty()).then_some(self.product.as_str())
    }

    /// Value of a numeric column, including the derived total.
    pub fn value(&self, column: &str) -> Option<f64> {
        if column == TOTAL_EMISSIONS_CLEAN {
            return self.total_emissions_clean;
        }
        self.values.get(column).copied().flatten()
    }
}

// ---------------------------------------------------------------------------
// FoodDataset – the reconciled table
// ---------------------------------------------------------------------------

/// The reconciled table with pre-computed column indices.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodDataset {
    /// All products (rows) in source order.
    pub records: Vec<FoodRecord>,
    /// Numeric column names in header order (excludes the label column).
    pub column_names: Vec<String>,
    /// Stage columns present in the source, in canonical order.
    pub stage_columns: Vec<String>,
    /// Sorted set of distinct product labels (blank labels excluded).
    pub products: BTreeSet<String>,
}

impl FoodDataset {
    /// Build column indices from the reconciled records.
    pub fn from_records(records: Vec<FoodRecord>, column_names: Vec<String>) -> Self {
        let stage_columns = STAGE_COLUMNS
            .iter()
            .filter(|stage| column_names.iter().any(|c| c == *stage))
            .map(|stage| stage.to_string())
            .collect();
        let products = records
            .iter()
            .filter_map(|r| r.label().map(str::to_string))
            .collect();

        FoodDataset {
            records,
            column_names,
            stage_columns,
            products,
        }
    }

    /// Whether the table carries `column`. The derived total is always present.
    pub fn has_column(&self, column: &str) -> bool {
        column == TOTAL_EMISSIONS_CLEAN || self.column_names.iter().any(|c| c == column)
    }

    /// A new table holding the rows at `indices`, in the given order.
    pub fn subset(&self, indices: &[usize]) -> FoodDataset {
        let records: Vec<FoodRecord> = indices
            .iter()
            .filter_map(|&i| self.records.get(i).cloned())
            .collect();
        FoodDataset::from_records(records, self.column_names.clone())
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(product: &str, farm: Option<f64>) -> FoodRecord {
        FoodRecord {
            product: product.to_string(),
            values: BTreeMap::from([("Farm".to_string(), farm)]),
            total_emissions_clean: farm,
        }
    }

    #[test]
    fn stage_columns_follow_canonical_order() {
        let columns = vec![
            "Retail".to_string(),
            "Farm".to_string(),
            "Other".to_string(),
            "Land use change".to_string(),
        ];
        let ds = FoodDataset::from_records(Vec::new(), columns);
        assert_eq!(ds.stage_columns, vec!["Land use change", "Farm", "Retail"]);
    }

    #[test]
    fn derived_total_is_always_a_column() {
        let ds = FoodDataset::from_records(Vec::new(), vec!["Farm".to_string()]);
        assert!(ds.has_column(TOTAL_EMISSIONS_CLEAN));
        assert!(ds.has_column("Farm"));
        assert!(!ds.has_column(TOTAL_EMISSIONS));
    }

    #[test]
    fn blank_labels_are_not_products() {
        let ds = FoodDataset::from_records(
            vec![record("", Some(5.0)), record("Beef", Some(3.0))],
            vec!["Farm".to_string()],
        );
        assert_eq!(ds.records[0].label(), None);
        assert_eq!(ds.records[1].label(), Some("Beef"));
        assert_eq!(ds.products.len(), 1);
        assert!(ds.products.contains("Beef"));
    }

    #[test]
    fn subset_keeps_requested_rows_and_rebuilds_products() {
        let ds = FoodDataset::from_records(
            vec![
                record("Beef", Some(39.4)),
                record("Tofu", Some(0.5)),
                record("Rice", None),
            ],
            vec!["Farm".to_string()],
        );
        let sub = ds.subset(&[2, 0]);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.records[0].product, "Rice");
        assert_eq!(sub.records[1].value("Farm"), Some(39.4));
        assert!(sub.products.contains("Beef"));
        assert!(!sub.products.contains("Tofu"));
    }
}
