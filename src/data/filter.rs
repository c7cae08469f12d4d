use std::collections::BTreeSet;

use super::model::FoodDataset;

// ---------------------------------------------------------------------------
// Product selection
// ---------------------------------------------------------------------------

/// Selected product labels. An empty selection means "no filter" (show all).
pub type ProductSelection = BTreeSet<String>;

/// Return indices of products that pass the selection, in table order.
pub fn filtered_indices(dataset: &FoodDataset, selection: &ProductSelection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            selection.is_empty() || record.label().is_some_and(|l| selection.contains(l))
        })
        .map(|(i, _)| i)
        .collect()
}

/// Derive a fresh filtered table. The source table is left untouched.
pub fn apply_filter(dataset: &FoodDataset, selection: &ProductSelection) -> FoodDataset {
    if selection.is_empty() {
        return dataset.clone();
    }
    dataset.subset(&filtered_indices(dataset, selection))
}
