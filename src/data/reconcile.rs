use std::collections::BTreeMap;

use super::model::{FoodDataset, TOTAL_EMISSIONS};

/// Largest gap between the stated total and its stages still treated as agreement.
pub const TOLERANCE: f64 = 1e-6;

/// Sum of the present stage values of one row. Missing cells count as zero,
/// so a row with every stage missing sums to `0.0`.
pub fn stage_sum(values: &BTreeMap<String, Option<f64>>, stage_columns: &[String]) -> f64 {
    stage_columns
        .iter()
        .filter_map(|stage| values.get(stage).copied().flatten())
        .sum()
}

/// Pick the reconciled total for one row.
///
/// The stage breakdown wins whenever it disagrees with the stated total by
/// more than [`TOLERANCE`]. A missing stated total falls back to the stage sum.
pub fn reconcile_total(stated: Option<f64>, stage_sum: f64) -> f64 {
    match stated {
        Some(total) if (total - stage_sum).abs() > TOLERANCE => stage_sum,
        Some(total) => total,
        None => stage_sum,
    }
}

/// Fill `total_emissions_clean` on every record of `dataset`.
///
/// Returns how many rows had their stated total replaced by the stage sum.
pub fn reconcile(dataset: &mut FoodDataset) -> usize {
    let has_total = dataset.has_column(TOTAL_EMISSIONS);
    let stages = dataset.stage_columns.clone();
    let mut overridden = 0;

    for record in &mut dataset.records {
        let sum = stage_sum(&record.values, &stages);
        let clean = if has_total {
            let stated = record.values.get(TOTAL_EMISSIONS).copied().flatten();
            let clean = reconcile_total(stated, sum);
            if stated.is_some_and(|t| t != clean) {
                overridden += 1;
            }
            clean
        } else {
            sum
        };
        record.total_emissions_clean = Some(clean).filter(|v| !v.is_nan());
    }

    overridden
}
