//! Plain-text rendering of a [`DashboardView`] for `--summary` runs.

use std::fmt::Write;

use crate::data::stats::format_metric;
use crate::data::view::DashboardView;

pub const NO_DATA: &str = "No data available for the selected filters.";

/// Render every dashboard section as text, in on-screen order.
pub fn render(view: &DashboardView) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, view);
    out
}

fn write_report(out: &mut String, view: &DashboardView) -> std::fmt::Result {
    writeln!(out, "Car Sales Data Dashboard")?;
    writeln!(out, "{} records match the current filters", view.record_count)?;

    section(out, "Filtered Dataset Preview")?;
    for sale in &view.preview {
        writeln!(
            out,
            "  {:<14} {:<18} {:>10.3}  {:<10} {}",
            sale.manufacturer,
            sale.model,
            sale.sales_in_thousands,
            sale.vehicle_type,
            sale.latest_launch
        )?;
    }

    section(out, "Sales by Model (Top Models)")?;
    if view.is_empty() {
        writeln!(out, "  {NO_DATA}")?;
    }
    for (model, sales) in view.top_models.iter() {
        writeln!(out, "  {model:<20} {sales:>10.3}")?;
    }

    section(out, "Sales Trend by Latest Launch Date")?;
    for (date, sales) in view.sales_trend.iter() {
        writeln!(out, "  {date}  {sales:>10.3}")?;
    }

    section(out, "Sales Distribution")?;
    for bin in &view.distribution.bins {
        writeln!(out, "  [{:>8.2}, {:>8.2})  {}", bin.start, bin.end, bin.count)?;
    }

    section(out, "Sales Share by Manufacturer")?;
    let total = view.manufacturer_share.total();
    for (maker, sales) in view.manufacturer_share.iter() {
        let share = if total > 0.0 { sales / total * 100.0 } else { 0.0 };
        writeln!(out, "  {maker:<14} {share:>5.1}%")?;
    }

    section(out, "Correlation Matrix")?;
    let [a, b] = view.correlation.columns;
    writeln!(out, "  {:<20} {:>20} {:>20}", "", a.name(), b.name())?;
    for (i, column) in [a, b].iter().enumerate() {
        writeln!(
            out,
            "  {:<20} {:>20} {:>20}",
            column.name(),
            format_metric(view.correlation.get(i, 0)),
            format_metric(view.correlation.get(i, 1))
        )?;
    }

    section(out, "Summary Metrics")?;
    let m = &view.metrics;
    writeln!(out, "  Average Sales:          {}", format_metric(m.mean_sales))?;
    writeln!(out, "  Total Models in Filter: {}", m.distinct_models)?;
    writeln!(out, "  Total Sales:            {}", format_metric(m.total_sales))?;
    writeln!(out, "  Unique Manufacturers:   {}", m.distinct_manufacturers)?;
    Ok(())
}

fn section(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "== {title} ==")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::FilterSelection;
    use crate::data::model::{CarSale, SalesDataset};

    fn dataset() -> SalesDataset {
        SalesDataset::from_records(vec![
            CarSale::new("Toyota", "Corolla", 10.0, "Passenger", "2020-01-01"),
            CarSale::new("Toyota", "Hilux", 5.0, "Truck", "2021-01-01"),
            CarSale::new("Ford", "Focus", 8.0, "Passenger", "2020-06-01"),
        ])
    }

    #[test]
    fn report_lists_metrics() {
        let selection = FilterSelection::new(["Toyota"], Vec::<String>::new());
        let text = render(&DashboardView::compute(&dataset(), &selection));

        assert!(text.contains("2 records match"));
        assert!(text.contains("Average Sales:          7.50"));
        assert!(text.contains("Total Sales:            15.00"));
        assert!(text.contains("Unique Manufacturers:   1"));
        assert!(text.contains("Toyota         100.0%"));
        assert!(!text.contains(NO_DATA));
    }

    #[test]
    fn empty_report_says_so() {
        let selection = FilterSelection::new(Vec::<String>::new(), ["SUV"]);
        let text = render(&DashboardView::compute(&dataset(), &selection));

        assert!(text.contains(NO_DATA));
        assert!(text.contains("Average Sales:          n/a"));
        assert!(text.contains("Total Sales:            0.00"));
    }
}
