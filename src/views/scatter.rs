use crate::data::model::{
    FoodDataset, FoodRecord, FRESHWATER_COLUMN, SCARCITY_WATER_COLUMN, TOTAL_EMISSIONS_CLEAN,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub product: String,
    pub x: f64,
    pub y: f64,
}

/// Scatter points plus the Pearson coefficient between the two axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Correlation {
    pub points: Vec<ScatterPoint>,
    /// `None` with fewer than two points or a constant axis.
    pub coefficient: Option<f64>,
}

/// Rows where both columns have a value.
fn paired<'a>(
    records: impl Iterator<Item = &'a FoodRecord>,
    x_column: &str,
    y_column: &str,
) -> Vec<ScatterPoint> {
    records
        .filter_map(|record| {
            Some(ScatterPoint {
                product: record.product.clone(),
                x: record.value(x_column)?,
                y: record.value(y_column)?,
            })
        })
        .collect()
}

/// Q4: freshwater withdrawals against reconciled emissions, labelled rows only.
pub fn water_vs_emissions(table: &FoodDataset) -> Vec<ScatterPoint> {
    let labelled = table.records.iter().filter(|r| r.label().is_some());
    paired(labelled, FRESHWATER_COLUMN, TOTAL_EMISSIONS_CLEAN)
}

/// Q6: scarcity-weighted water use against reconciled emissions.
///
/// Unlabelled rows still count towards the coefficient.
pub fn scarcity_correlation(table: &FoodDataset) -> Correlation {
    let points = paired(table.records.iter(), SCARCITY_WATER_COLUMN, TOTAL_EMISSIONS_CLEAN);
    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    let coefficient = pearson(&xs, &ys);
    Correlation {
        points,
        coefficient,
    }
}

/// Pearson correlation coefficient of two equally long series.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 || is_constant(&xs[..n]) || is_constant(&ys[..n]) {
        return None;
    }
    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let r = cov / (var_x * var_y).sqrt();
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bytes;
    use crate::views::format_value;

    #[test]
    fn perfectly_linear_series_correlate_to_one() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [3.0, 5.0, 7.0, 9.0];
        assert_eq!(format_value(pearson(&xs, &ys)), "1.00");

        let inverse = [9.0, 7.0, 5.0, 3.0];
        assert_eq!(format_value(pearson(&xs, &inverse)), "-1.00");
    }

    #[test]
    fn degenerate_series_have_no_coefficient() {
        assert_eq!(pearson(&[1.0], &[2.0]), None);
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
        assert_eq!(pearson(&[], &[]), None);
    }

    #[test]
    fn known_coefficient() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [2.0, 4.0, 5.0, 4.0, 5.0];
        let r = pearson(&xs, &ys).unwrap();
        assert!((r - 0.7745966692414834).abs() < 1e-12);
    }

    #[test]
    fn scatter_drops_rows_missing_either_axis() {
        let csv = "\
Food product,Farm,Freshwater withdrawals per kilogram (liters per kilogram)
A,1,100
B,2,
C,3,300
";
        let ds = load_bytes(csv.as_bytes()).unwrap();
        let points = water_vs_emissions(&ds);
        let products: Vec<&str> = points.iter().map(|p| p.product.as_str()).collect();
        assert_eq!(products, vec!["A", "C"]);
        assert_eq!(points[1].x, 300.0);
        assert_eq!(points[1].y, 3.0);
    }

    #[test]
    fn unlabelled_rows_leave_q4_but_stay_in_q6() {
        let csv = "\
Food product,Farm,Freshwater withdrawals per kilogram (liters per kilogram),Scarcity-weighted water use per kilogram (liters per kilogram)
,1,100,10
A,2,200,20
B,3,300,30
";
        let ds = load_bytes(csv.as_bytes()).unwrap();
        let q4 = water_vs_emissions(&ds);
        let products: Vec<&str> = q4.iter().map(|p| p.product.as_str()).collect();
        assert_eq!(products, vec!["A", "B"]);
        assert_eq!(scarcity_correlation(&ds).points.len(), 3);
    }

    #[test]
    fn scarcity_correlation_over_filtered_rows() {
        let csv = "\
Food product,Farm,Scarcity-weighted water use per kilogram (liters per kilogram)
A,1,10
B,2,n/a
C,3,30
D,4,40
";
        let ds = load_bytes(csv.as_bytes()).unwrap();
        let corr = scarcity_correlation(&ds);
        assert_eq!(corr.points.len(), 3);
        assert_eq!(format_value(corr.coefficient), "1.00");
    }
}
