use crate::data::model::{
    FoodDataset, LAND_USE_COLUMN, PACKAGING, TOTAL_EMISSIONS_CLEAN, TRANSPORT,
};

use super::TOP_N;

/// Share of transport and packaging emissions removed in the policy scenario.
pub const SCENARIO_CUT: f64 = 0.5;

/// One bar of a ranking chart.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedItem {
    pub product: String,
    pub value: f64,
}

/// Keep the `n` largest items and return them smallest first.
///
/// Both sorts are stable, so equal values keep their table order.
pub fn top_n(mut items: Vec<RankedItem>, n: usize) -> Vec<RankedItem> {
    items.sort_by(|a, b| b.value.total_cmp(&a.value));
    items.truncate(n);
    items.sort_by(|a, b| a.value.total_cmp(&b.value));
    items
}

/// Non-missing values of `column`, one item per labelled row.
fn ranked_column(table: &FoodDataset, column: &str) -> Vec<RankedItem> {
    table
        .records
        .iter()
        .filter_map(|record| {
            Some(RankedItem {
                product: record.label()?.to_string(),
                value: record.value(column)?,
            })
        })
        .collect()
}

/// Q1: products with the highest reconciled emissions.
pub fn top_emitters(table: &FoodDataset) -> Vec<RankedItem> {
    top_n(ranked_column(table, TOTAL_EMISSIONS_CLEAN), TOP_N)
}

/// Q5: products with the highest land use per kilogram.
pub fn land_use_ranking(table: &FoodDataset) -> Vec<RankedItem> {
    top_n(ranked_column(table, LAND_USE_COLUMN), TOP_N)
}

/// Q7: largest savings if transport and packaging emissions are halved.
///
/// The reduction is taken as the difference between the reconciled total and
/// the scenario total. Missing transport or packaging cells count as zero.
pub fn policy_scenario(table: &FoodDataset) -> Vec<RankedItem> {
    let cut_columns: Vec<&str> = [TRANSPORT, PACKAGING]
        .into_iter()
        .filter(|c| table.has_column(c))
        .collect();

    let reductions = table
        .records
        .iter()
        .filter_map(|record| {
            let product = record.label()?;
            let clean = record.total_emissions_clean?;
            let scenario = cut_columns.iter().fold(clean, |acc, column| {
                acc - SCENARIO_CUT * record.value(column).unwrap_or(0.0)
            });
            let reduction = clean - scenario;
            (!reduction.is_nan()).then(|| RankedItem {
                product: product.to_string(),
                value: reduction,
            })
        })
        .collect();

    top_n(reductions, TOP_N)
}
