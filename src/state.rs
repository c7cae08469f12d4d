use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::color::StagePalette;
use crate::config::DashboardConfig;
use crate::data::filter::{apply_filter, ProductSelection};
use crate::data::loader::DatasetCache;
use crate::data::model::FoodDataset;
use crate::views::{build_views, View};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Load-and-reconcile results keyed on file content.
    pub cache: DatasetCache,

    /// Reconciled table (None until a file loads).
    pub dataset: Option<Arc<FoodDataset>>,

    /// File the current table came from.
    pub source_path: Option<PathBuf>,

    /// Selected products; empty means no filter.
    pub selection: ProductSelection,

    /// Table after the product filter (cached).
    pub filtered: Option<FoodDataset>,

    /// Views built from `filtered` (cached).
    pub views: Vec<View>,

    /// Colours for the stacked stage breakdown.
    pub stage_palette: StagePalette,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            cache: DatasetCache::default(),
            dataset: None,
            source_path: None,
            selection: ProductSelection::new(),
            filtered: None,
            views: Vec::new(),
            stage_palette: StagePalette::new(&[]),
            status_message: None,
        }
    }

    /// Load a CSV through the cache and make it the current table.
    ///
    /// On failure the previous table, its source path and its views stay in
    /// place; only the status message reports the error.
    pub fn load_path(&mut self, path: &Path) -> Result<()> {
        match self
            .cache
            .load_file(path)
            .with_context(|| format!("loading {}", path.display()))
        {
            Ok(dataset) => {
                self.source_path = Some(path.to_path_buf());
                self.set_dataset(dataset);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
                Err(e)
            }
        }
    }

    /// Ingest a newly loaded table, reset the selection and rebuild views.
    pub fn set_dataset(&mut self, dataset: Arc<FoodDataset>) {
        self.stage_palette = StagePalette::new(&dataset.stage_columns);
        self.selection.clear();
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the filtered table and every view after a selection change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            let filtered = apply_filter(ds, &self.selection);
            self.views = build_views(&filtered);
            self.filtered = Some(filtered);
        }
    }

    /// Toggle a single product in the selection.
    pub fn toggle_product(&mut self, product: &str) {
        if !self.selection.remove(product) {
            self.selection.insert(product.to_string());
        }
        self.refilter();
    }

    /// Select every product.
    pub fn select_all(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection = ds.products.clone();
            self.refilter();
        }
    }

    /// Clear the selection (no filter).
    pub fn select_none(&mut self) {
        self.selection.clear();
        self.refilter();
    }

    /// Rows in the filtered table.
    pub fn visible_rows(&self) -> usize {
        self.filtered.as_ref().map_or(0, |f| f.len())
    }
}
