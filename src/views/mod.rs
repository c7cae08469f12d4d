//! Derived views over the filtered table.
//!
//! Every view is a pure function of the table it is given. Each [`ViewKind`]
//! declares the columns it needs and [`build_views`] only builds the views
//! whose requirement the table satisfies; the others are skipped silently.

pub mod rankings;
pub mod scatter;
pub mod stages;

use std::cmp::Ordering;

use crate::data::model::{
    FoodDataset, FRESHWATER_COLUMN, LAND_USE_COLUMN, PACKAGING, SCARCITY_WATER_COLUMN,
    STAGE_COLUMNS, TOTAL_EMISSIONS_CLEAN, TRANSPORT,
};
use rankings::RankedItem;
use scatter::{Correlation, ScatterPoint};
use stages::{StageContribution, StageMean};

/// Rows kept by the ranking views.
pub const TOP_N: usize = 10;

/// Products broken down by stage.
pub const BREAKDOWN_N: usize = 5;

// ---------------------------------------------------------------------------
// Chart description handed to the renderer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    HorizontalBar,
    Bar,
    StackedHorizontalBar,
    Scatter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    /// Title drawn above the chart, if any.
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
}

impl ChartSpec {
    fn new(kind: ChartKind, x_label: &str, y_label: &str) -> Self {
        ChartSpec {
            kind,
            title: None,
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column requirements
// ---------------------------------------------------------------------------

/// Columns a view needs before it can be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Every listed column must be present.
    AllOf(&'static [&'static str]),
    /// At least one listed column must be present.
    AnyOf(&'static [&'static str]),
}

impl Requirement {
    pub fn is_satisfied(&self, table: &FoodDataset) -> bool {
        match self {
            Requirement::AllOf(columns) => columns.iter().all(|c| table.has_column(c)),
            Requirement::AnyOf(columns) => columns.iter().any(|c| table.has_column(c)),
        }
    }
}

// ---------------------------------------------------------------------------
// View catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    TopEmitters,
    StageAverages,
    TopBreakdown,
    WaterVsEmissions,
    LandUse,
    ScarcityCorrelation,
    PolicyScenario,
}

impl ViewKind {
    /// All views in display order.
    pub const ALL: [ViewKind; 7] = [
        ViewKind::TopEmitters,
        ViewKind::StageAverages,
        ViewKind::TopBreakdown,
        ViewKind::WaterVsEmissions,
        ViewKind::LandUse,
        ViewKind::ScarcityCorrelation,
        ViewKind::PolicyScenario,
    ];

    /// Section heading shown above the chart.
    pub fn heading(&self) -> &'static str {
        match self {
            ViewKind::TopEmitters => "Q1. Highest greenhouse gas emissions per kg",
            ViewKind::StageAverages => "Q2. Average emissions by lifecycle stage",
            ViewKind::TopBreakdown => "Q3. Lifecycle breakdown for top 5 emitting foods",
            ViewKind::WaterVsEmissions => "Q4. Freshwater withdrawals vs. GHG emissions",
            ViewKind::LandUse => "Q5. Highest land use per kg",
            ViewKind::ScarcityCorrelation => "Q6. Emissions vs scarcity-weighted water use",
            ViewKind::PolicyScenario => "Q7. Reduction if Transport & Packaging cut by 50%",
        }
    }

    pub fn requirement(&self) -> Requirement {
        match self {
            ViewKind::TopEmitters => Requirement::AllOf(&[TOTAL_EMISSIONS_CLEAN]),
            ViewKind::StageAverages | ViewKind::TopBreakdown => Requirement::AnyOf(&STAGE_COLUMNS),
            ViewKind::WaterVsEmissions => {
                Requirement::AllOf(&[FRESHWATER_COLUMN, TOTAL_EMISSIONS_CLEAN])
            }
            ViewKind::LandUse => Requirement::AllOf(&[LAND_USE_COLUMN]),
            ViewKind::ScarcityCorrelation => {
                Requirement::AllOf(&[SCARCITY_WATER_COLUMN, TOTAL_EMISSIONS_CLEAN])
            }
            ViewKind::PolicyScenario => Requirement::AnyOf(&[TRANSPORT, PACKAGING]),
        }
    }

    /// Compute this view from `table`. Callers check the requirement first.
    pub fn build(&self, table: &FoodDataset) -> View {
        let (chart, data) = match self {
            ViewKind::TopEmitters => (
                ChartSpec::new(ChartKind::HorizontalBar, "kgCO₂e per kg", ""),
                ViewData::Ranking(rankings::top_emitters(table)),
            ),
            ViewKind::StageAverages => (
                ChartSpec::new(ChartKind::Bar, "Stage", "Avg. kgCO₂e per kg"),
                ViewData::StageAverages(stages::stage_averages(table)),
            ),
            ViewKind::TopBreakdown => (
                ChartSpec::new(ChartKind::StackedHorizontalBar, "kgCO2e_per_kg", "Food product"),
                ViewData::Breakdown(stages::top_breakdown(table)),
            ),
            ViewKind::WaterVsEmissions => (
                ChartSpec::new(ChartKind::Scatter, "Freshwater per kg (L)", "kgCO₂e per kg"),
                ViewData::Scatter(scatter::water_vs_emissions(table)),
            ),
            ViewKind::LandUse => (
                ChartSpec::new(ChartKind::HorizontalBar, "m² land per kg", ""),
                ViewData::Ranking(rankings::land_use_ranking(table)),
            ),
            ViewKind::ScarcityCorrelation => {
                let correlation = scatter::scarcity_correlation(table);
                let mut chart =
                    ChartSpec::new(ChartKind::Scatter, "Scarcity water (L/kg)", "kgCO₂e per kg");
                chart.title = Some(format!(
                    "Correlation (r = {})",
                    format_value(correlation.coefficient)
                ));
                (chart, ViewData::Correlation(correlation))
            }
            ViewKind::PolicyScenario => (
                ChartSpec::new(ChartKind::HorizontalBar, "kgCO₂e saved per kg", ""),
                ViewData::Ranking(rankings::policy_scenario(table)),
            ),
        };
        View {
            kind: *self,
            chart,
            data,
        }
    }
}

// ---------------------------------------------------------------------------
// View output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ViewData {
    /// Bars in ascending order (largest drawn last, at the top).
    Ranking(Vec<RankedItem>),
    StageAverages(Vec<StageMean>),
    Breakdown(Vec<StageContribution>),
    Scatter(Vec<ScatterPoint>),
    Correlation(Correlation),
}

/// One renderable derived dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub kind: ViewKind,
    pub chart: ChartSpec,
    pub data: ViewData,
}

/// Build every view whose required columns are present in `table`.
pub fn build_views(table: &FoodDataset) -> Vec<View> {
    ViewKind::ALL
        .iter()
        .filter(|kind| {
            let ok = kind.requirement().is_satisfied(table);
            if !ok {
                log::debug!("Skipping {kind:?}: required columns absent");
            }
            ok
        })
        .map(|kind| kind.build(table))
        .collect()
}

/// Two-decimal text used for every value label.
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

/// Descending order with missing values last.
pub(crate) fn descending_missing_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply_filter, ProductSelection};
    use crate::data::loader::load_bytes;

    const FULL: &str = "\
Food product,Land use change,Animal Feed,Farm,Processing,Transport,Packging,Retail,Total_emissions,Freshwater withdrawals per kilogram (liters per kilogram),Land use per kilogram (m² per kilogram),Scarcity-weighted water use per kilogram (liters per kilogram)
Beef (beef herd),16.3,1.9,39.4,1.3,0.3,0.2,0.2,59.6,1451.2,326.21,34732.3
Lamb & Mutton,0.5,2.5,19.5,1.1,0.6,0.3,0.2,24.5,1803.2,369.81,141925
Cheese,4.5,2.3,13.1,0.7,0.1,0.2,0.3,21.2,5605.2,87.79,180851.9
Tofu,1,0,0.5,0.8,0.2,0.2,0.3,3,149.2,2.2,3412.5
Potatoes,0,0,0.2,0,0.1,0,0,0.3,59.1,0.88,2754.2
";

    fn kinds(views: &[View]) -> Vec<ViewKind> {
        views.iter().map(|v| v.kind).collect()
    }

    #[test]
    fn full_schema_builds_all_views_in_order() {
        let ds = load_bytes(FULL.as_bytes()).unwrap();
        assert_eq!(kinds(&build_views(&ds)), ViewKind::ALL.to_vec());
    }

    #[test]
    fn views_with_absent_columns_are_skipped() {
        let csv = "Food product,Farm,Retail\nOats,1.0,0.1\nPeas,0.7,0.2\n";
        let ds = load_bytes(csv.as_bytes()).unwrap();
        assert_eq!(
            kinds(&build_views(&ds)),
            vec![
                ViewKind::TopEmitters,
                ViewKind::StageAverages,
                ViewKind::TopBreakdown,
            ]
        );
    }

    #[test]
    fn label_only_table_still_ranks_emitters() {
        let csv = "Food product\nOats\nPeas\n";
        let ds = load_bytes(csv.as_bytes()).unwrap();
        assert_eq!(kinds(&build_views(&ds)), vec![ViewKind::TopEmitters]);
    }

    #[test]
    fn scenario_needs_only_one_cut_column() {
        let csv = "Food product,Packaging\nOats,0.1\n";
        let ds = load_bytes(csv.as_bytes()).unwrap();
        assert!(ViewKind::PolicyScenario.requirement().is_satisfied(&ds));
    }

    #[test]
    fn correlation_title_embeds_coefficient() {
        let csv = "\
Food product,Farm,Scarcity-weighted water use per kilogram (liters per kilogram)
A,1,10
B,2,20
C,3,30
";
        let ds = load_bytes(csv.as_bytes()).unwrap();
        let view = ViewKind::ScarcityCorrelation.build(&ds);
        assert_eq!(view.chart.title.as_deref(), Some("Correlation (r = 1.00)"));
        assert_eq!(view.chart.kind, ChartKind::Scatter);
    }

    #[test]
    fn views_follow_the_filter() {
        let ds = load_bytes(FULL.as_bytes()).unwrap();
        let selection: ProductSelection = ["Tofu", "Potatoes"].iter().map(|s| s.to_string()).collect();
        let filtered = apply_filter(&ds, &selection);
        let views = build_views(&filtered);
        let ViewData::Ranking(top) = &views[0].data else {
            panic!("Q1 is a ranking");
        };
        let products: Vec<&str> = top.iter().map(|i| i.product.as_str()).collect();
        assert_eq!(products, vec!["Potatoes", "Tofu"]);
        // The unfiltered table is unchanged.
        assert_eq!(ds.len(), 5);
    }

    #[test]
    fn values_format_to_two_decimals() {
        assert_eq!(format_value(Some(0.4)), "0.40");
        assert_eq!(format_value(Some(59.596)), "59.60");
        assert_eq!(format_value(None), "n/a");
    }
}
