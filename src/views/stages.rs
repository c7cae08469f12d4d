use std::collections::BTreeSet;

use crate::data::model::{FoodDataset, FoodRecord};

use super::{descending_missing_last, BREAKDOWN_N};

/// Average contribution of one lifecycle stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageMean {
    pub stage: String,
    /// `None` when no row has a value for the stage.
    pub mean: Option<f64>,
}

/// One segment of a stacked bar: a product's emissions at one stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageContribution {
    pub product: String,
    pub stage: String,
    pub value: Option<f64>,
}

/// Q2: mean of each present stage column, largest first.
pub fn stage_averages(table: &FoodDataset) -> Vec<StageMean> {
    let mut means: Vec<StageMean> = table
        .stage_columns
        .iter()
        .map(|stage| {
            let values: Vec<f64> = table
                .records
                .iter()
                .filter_map(|r| r.value(stage))
                .collect();
            let mean = if values.is_empty() {
                None
            } else {
                Some(values.iter().sum::<f64>() / values.len() as f64).filter(|m| !m.is_nan())
            };
            StageMean {
                stage: stage.clone(),
                mean,
            }
        })
        .collect();

    means.sort_by(|a, b| descending_missing_last(a.mean, b.mean));
    means
}

/// Q3: stage breakdown of the highest emitting products.
///
/// The [`BREAKDOWN_N`] highest reconciled totals pick the product labels;
/// every row carrying one of those labels is kept in table order. Segments
/// are emitted stage by stage.
pub fn top_breakdown(table: &FoodDataset) -> Vec<StageContribution> {
    let mut order: Vec<&FoodRecord> = table.records.iter().collect();
    order.sort_by(|a, b| descending_missing_last(a.total_emissions_clean, b.total_emissions_clean));
    let leaders: BTreeSet<&str> = order
        .iter()
        .take(BREAKDOWN_N)
        .map(|r| r.product.as_str())
        .collect();

    let rows: Vec<&FoodRecord> = table
        .records
        .iter()
        .filter(|r| leaders.contains(r.product.as_str()))
        .collect();

    table
        .stage_columns
        .iter()
        .flat_map(|stage| {
            rows.iter().map(move |r| StageContribution {
                product: r.product.clone(),
                stage: stage.clone(),
                value: r.value(stage),
            })
        })
        .collect()
}
