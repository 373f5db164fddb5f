//! Pipeline properties checked against the dataset shipped in `data/`.

use std::path::PathBuf;

use approx::assert_abs_diff_eq;
use car_sales_dashboard::config::DEFAULT_DATA_PATH;
use car_sales_dashboard::data::aggregate::{sales_by_manufacturer, sales_by_model, TOP_MODELS};
use car_sales_dashboard::data::filter::{apply_filter, FilterSelection};
use car_sales_dashboard::data::loader::load_file;
use car_sales_dashboard::data::model::{NumericColumn, SalesDataset};
use car_sales_dashboard::data::stats::correlate;
use car_sales_dashboard::data::view::DashboardView;
use car_sales_dashboard::report;
use rstest::{fixture, rstest};

#[fixture]
fn dataset() -> SalesDataset {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_DATA_PATH);
    load_file(&path).expect("bundled dataset loads")
}

#[rstest]
fn bundled_file_loads_every_complete_row(dataset: SalesDataset) {
    assert_eq!(dataset.len(), 46);
    assert_eq!(dataset.manufacturers.len(), 13);
    assert_eq!(
        dataset.vehicle_types.iter().collect::<Vec<_>>(),
        vec!["Car", "Passenger"]
    );
}

#[rstest]
fn unfiltered_selection_is_identity(dataset: SalesDataset) {
    let subset = apply_filter(&dataset, &FilterSelection::default());
    assert_eq!(subset.len(), dataset.len());
    assert!(subset.iter().zip(&dataset.records).all(|(a, b)| *a == b));
}

#[rstest]
#[case(&["Ford"], &[])]
#[case(&[], &["Car"])]
#[case(&["Toyota", "Honda"], &["Passenger"])]
#[case(&["Audi"], &["Car"])]
fn filtered_totals_stay_within_unfiltered(
    dataset: SalesDataset,
    #[case] manufacturers: &[&str],
    #[case] vehicle_types: &[&str],
) {
    let selection = FilterSelection::new(
        manufacturers.iter().copied(),
        vehicle_types.iter().copied(),
    );
    let all = dataset.all();
    let subset = apply_filter(&dataset, &selection);

    let full = sales_by_manufacturer(&all);
    for (maker, total) in sales_by_manufacturer(&subset).iter() {
        assert!(total <= full.get(maker).unwrap() + 1e-9);
    }

    let top = sales_by_model(&subset);
    assert!(top.len() <= TOP_MODELS);
    assert!(top.entries.windows(2).all(|w| w[0].1 >= w[1].1));
}

#[rstest]
fn top_models_led_by_f_series(dataset: SalesDataset) {
    let top = sales_by_model(&dataset.all());
    assert_eq!(top.len(), TOP_MODELS);
    assert_eq!(top.entries[0].0.to_string(), "F-Series");
    assert_abs_diff_eq!(top.entries[0].1, 540.561);
}

#[rstest]
fn correlation_matrix_shape(dataset: SalesDataset) {
    let corr = correlate(&dataset.all(), NumericColumn::Sales, NumericColumn::LaunchYear);
    assert_abs_diff_eq!(corr.get(0, 0), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(corr.get(1, 1), 1.0, epsilon = 1e-12);
    assert_eq!(corr.get(0, 1), corr.get(1, 0));
    assert!((-1.0..=1.0).contains(&corr.coefficient()));
}

#[rstest]
fn summary_report_for_a_selection(dataset: SalesDataset) {
    let selection = FilterSelection::new(["Ford"], Vec::<String>::new());
    let view = DashboardView::compute(&dataset, &selection);

    assert_eq!(view.record_count, 6);
    assert_eq!(view.metrics.distinct_manufacturers, 1);
    let text = report::render(&view);
    assert!(text.contains("6 records match"));
    assert!(text.contains("F-Series"));
}
