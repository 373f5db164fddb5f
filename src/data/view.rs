use chrono::{Datelike, NaiveDate};

use super::aggregate::{sales_by_launch_date, sales_by_manufacturer, sales_by_model, Aggregation};
use super::filter::{apply_filter, FilterSelection};
use super::model::{CarSale, NumericColumn, SalesDataset};
use super::stats::{correlate, CorrelationMatrix, Histogram, SummaryMetrics, HISTOGRAM_BINS};

/// Rows shown in the preview table.
pub const PREVIEW_ROWS: usize = 5;

/// One dot of the sales-vs-launch scatter plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub launch: NaiveDate,
    pub sales: f64,
    pub manufacturer: String,
}

impl ScatterPoint {
    /// Launch date as a fractional year, for a numeric x axis.
    pub fn year_fraction(&self) -> f64 {
        year_fraction(self.launch)
    }
}

/// A date as a fractional year, e.g. 2021-07-02 → 2021.4986.
pub fn year_fraction(date: NaiveDate) -> f64 {
    let days_in_year = NaiveDate::from_ymd_opt(date.year(), 12, 31)
        .map_or(365, |d| d.ordinal());
    f64::from(date.year()) + f64::from(date.ordinal0()) / f64::from(days_in_year)
}

/// Everything the dashboard renders for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// Records passing the filter.
    pub record_count: usize,
    pub preview: Vec<CarSale>,
    pub top_models: Aggregation,
    pub sales_trend: Aggregation,
    pub distribution: Histogram,
    pub manufacturer_share: Aggregation,
    /// Records with an unparsable launch date are absent.
    pub scatter: Vec<ScatterPoint>,
    pub correlation: CorrelationMatrix,
    pub metrics: SummaryMetrics,
}

impl DashboardView {
    /// Filter the dataset and derive every chart and metric from the subset.
    pub fn compute(dataset: &SalesDataset, selection: &FilterSelection) -> Self {
        let subset = apply_filter(dataset, selection);
        log::debug!(
            "Recomputing dashboard: {} of {} records match {:?}",
            subset.len(),
            dataset.len(),
            selection
        );

        let sales: Vec<f64> = subset.iter().map(|s| s.sales_in_thousands).collect();
        let scatter = subset
            .iter()
            .filter_map(|sale| {
                Some(ScatterPoint {
                    launch: sale.launch_date()?,
                    sales: sale.sales_in_thousands,
                    manufacturer: sale.manufacturer.clone(),
                })
            })
            .collect();

        Self {
            record_count: subset.len(),
            preview: subset.iter().take(PREVIEW_ROWS).map(|s| (*s).clone()).collect(),
            top_models: sales_by_model(&subset),
            sales_trend: sales_by_launch_date(&subset),
            distribution: Histogram::compute(&sales, HISTOGRAM_BINS),
            manufacturer_share: sales_by_manufacturer(&subset),
            scatter,
            correlation: correlate(&subset, NumericColumn::Sales, NumericColumn::LaunchYear),
            metrics: SummaryMetrics::compute(&subset),
        }
    }

    /// True when the selection matched nothing.
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn dataset() -> SalesDataset {
        SalesDataset::from_records(vec![
            CarSale::new("Toyota", "Corolla", 10.0, "Passenger", "2020-01-01"),
            CarSale::new("Toyota", "Hilux", 5.0, "Truck", "2021-01-01"),
            CarSale::new("Ford", "Focus", 8.0, "Passenger", "2020-06-01"),
        ])
    }

    #[test]
    fn unfiltered_view_covers_everything() {
        let ds = dataset();
        let view = DashboardView::compute(&ds, &FilterSelection::default());

        assert_eq!(view.record_count, 3);
        assert_eq!(view.preview, ds.records);
        assert_eq!(view.scatter.len(), 3);
        assert_eq!(view.distribution.total(), 3);
        assert_abs_diff_eq!(view.manufacturer_share.total(), 23.0);
        assert_abs_diff_eq!(view.metrics.total_sales, 23.0);
    }

    #[test]
    fn toyota_view_matches_example() {
        let ds = dataset();
        let selection = FilterSelection::new(["Toyota"], Vec::<String>::new());
        let view = DashboardView::compute(&ds, &selection);

        assert_eq!(view.record_count, 2);
        assert_abs_diff_eq!(view.metrics.total_sales, 15.0);
        assert_abs_diff_eq!(view.metrics.mean_sales, 7.5);
        assert_eq!(view.metrics.distinct_models, 2);
        assert_eq!(view.metrics.distinct_manufacturers, 1);
        assert_eq!(view.manufacturer_share.len(), 1);
        // Two points, two distinct years: a perfect (negative) fit.
        assert_abs_diff_eq!(view.correlation.coefficient(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_selection_result_is_safe() {
        let ds = dataset();
        let selection = FilterSelection::new(Vec::<String>::new(), ["SUV"]);
        let view = DashboardView::compute(&ds, &selection);

        assert!(view.is_empty());
        assert!(view.preview.is_empty());
        assert!(view.top_models.is_empty());
        assert!(view.sales_trend.is_empty());
        assert!(view.distribution.is_empty());
        assert!(view.manufacturer_share.is_empty());
        assert!(view.scatter.is_empty());
        assert!(view.correlation.coefficient().is_nan());
        assert_eq!(view.metrics.total_sales, 0.0);
        assert!(view.metrics.mean_sales.is_nan());
    }

    #[test]
    fn preview_is_capped() {
        let records = (0..12)
            .map(|i| CarSale::new("Kia", format!("K{i}"), 1.0, "Car", "2019-01-01"))
            .collect();
        let ds = SalesDataset::from_records(records);
        let view = DashboardView::compute(&ds, &FilterSelection::default());
        assert_eq!(view.preview.len(), PREVIEW_ROWS);
        assert_eq!(view.preview[0].model, "K0");
    }

    #[test]
    fn year_fraction_tracks_day_of_year() {
        let point = ScatterPoint {
            launch: NaiveDate::from_ymd_opt(2021, 7, 2).unwrap(),
            sales: 1.0,
            manufacturer: "Kia".into(),
        };
        assert_abs_diff_eq!(
            point.year_fraction(),
            2021.0 + 182.0 / 365.0,
            epsilon = 1e-12
        );
    }
}
