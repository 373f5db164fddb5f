use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, RichText, ScrollArea, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text,
};

use crate::color::{coolwarm, ColorMap};
use crate::data::aggregate::{Aggregation, GroupLabel};
use crate::data::stats::{format_metric, CorrelationMatrix, Histogram};
use crate::data::view::{year_fraction, DashboardView, ScatterPoint};
use crate::report::NO_DATA;
use crate::state::AppState;
use crate::ui::panels;

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render every chart and metric for the current selection.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view car sales  (File → Open…)");
        });
        return;
    };
    let color_map = state.color_map.as_ref();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Car Sales Data Dashboard");
            ui.label("Interactive analytics dashboard for car sales dataset.");

            section(ui, "Filtered Dataset Preview");
            panels::preview_table(ui, view);

            section(ui, "Sales by Model (Top Models)");
            guarded(ui, view, |ui| top_models_chart(ui, &view.top_models));

            section(ui, "Sales Trend by Latest Launch Year");
            guarded(ui, view, |ui| trend_chart(ui, &view.sales_trend));

            section(ui, "Sales Distribution (Histogram)");
            guarded(ui, view, |ui| histogram_chart(ui, &view.distribution));

            section(ui, "Sales Share by Manufacturer");
            guarded(ui, view, |ui| pie_chart(ui, &view.manufacturer_share, color_map));

            section(ui, "Scatter Plot: Sales vs Launch Year");
            guarded(ui, view, |ui| scatter_chart(ui, &view.scatter, color_map));

            section(ui, "Correlation Heatmap");
            guarded(ui, view, |ui| heatmap(ui, &view.correlation));

            section(ui, "Summary Metrics");
            panels::metrics(ui, view);
        });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.strong(RichText::new(title).size(18.0));
    ui.separator();
}

/// Draw a chart only when the selection matched something.
fn guarded(ui: &mut Ui, view: &DashboardView, draw: impl FnOnce(&mut Ui)) {
    if view.is_empty() {
        ui.label(RichText::new(format!("⚠ {NO_DATA}")).color(Color32::YELLOW));
    } else {
        draw(ui);
    }
}

/// Axis label for integer positions of a categorical axis.
fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Bar, line and histogram charts
// ---------------------------------------------------------------------------

fn top_models_chart(ui: &mut Ui, top_models: &Aggregation) {
    let labels: Vec<String> = top_models
        .iter()
        .map(|(model, _)| model.to_string())
        .collect();
    let bars: Vec<Bar> = top_models
        .iter()
        .enumerate()
        .map(|(i, (model, sales))| Bar::new(i as f64, sales).name(model).width(0.7))
        .collect();

    Plot::new("top_models")
        .height(CHART_HEIGHT)
        .x_axis_label("Car Model")
        .y_axis_label("Sales in Thousands")
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Top Selling Car Models"));
        });
}

fn trend_chart(ui: &mut Ui, trend: &Aggregation) {
    let points: Vec<[f64; 2]> = trend
        .iter()
        .filter_map(|(label, sales)| match label {
            GroupLabel::Date(date) => Some([year_fraction(*date), sales]),
            _ => None,
        })
        .collect();

    Plot::new("sales_trend")
        .height(CHART_HEIGHT)
        .x_axis_label("Launch Year")
        .y_axis_label("Total Sales (Thousands)")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name("Sales Trend Over Launch Years")
                    .width(1.5),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .name("Sales Trend Over Launch Years")
                    .radius(3.0),
            );
        });
}

fn histogram_chart(ui: &mut Ui, hist: &Histogram) {
    let bars: Vec<Bar> = hist
        .bins
        .iter()
        .map(|bin| {
            Bar::new(bin.center(), bin.count as f64)
                .width(bin.width())
                .name(format!("{:.1} – {:.1}", bin.start, bin.end))
        })
        .collect();

    Plot::new("sales_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label("Sales in Thousands")
        .y_axis_label("Count")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Distribution of Car Sales"));
        });
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// One wedge of the manufacturer share pie. Angles in radians.
#[derive(Debug, Clone, PartialEq)]
struct PieSlice {
    label: String,
    fraction: f64,
    start: f64,
    end: f64,
}

/// Split a full turn between the groups of `share`, in order.
fn pie_slices(share: &Aggregation) -> Vec<PieSlice> {
    let total = share.total();
    if total <= 0.0 || !total.is_finite() {
        return Vec::new();
    }

    let mut start = 0.0;
    share
        .iter()
        .filter(|(_, value)| *value > 0.0)
        .map(|(label, value)| {
            let fraction = value / total;
            let end = start + fraction * TAU;
            let slice = PieSlice {
                label: label.to_string(),
                fraction,
                start,
                end,
            };
            start = end;
            slice
        })
        .collect()
}

/// Closed fan from the origin; egui fills convex shapes, so callers keep
/// each wedge at or below a quarter turn.
fn wedge(start: f64, end: f64) -> PlotPoints<'static> {
    let steps = ((end - start) / (TAU / 180.0)).ceil().max(1.0) as usize;
    let mut points = vec![[0.0, 0.0]];
    points.extend((0..=steps).map(|i| {
        let angle = start + (end - start) * i as f64 / steps as f64;
        [angle.cos(), angle.sin()]
    }));
    PlotPoints::new(points)
}

fn pie_chart(ui: &mut Ui, share: &Aggregation, color_map: Option<&ColorMap>) {
    let slices = pie_slices(share);

    Plot::new("manufacturer_share")
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .legend(Legend::default())
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for slice in &slices {
                let color = color_map.map_or(Color32::LIGHT_BLUE, |cm| cm.color_for(&slice.label));
                let name = format!("{} ({:.1}%)", slice.label, slice.fraction * 100.0);

                let mut from = slice.start;
                while from < slice.end {
                    let to = (from + FRAC_PI_2).min(slice.end);
                    plot_ui.polygon(
                        Polygon::new(wedge(from, to))
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, color))
                            .name(&name),
                    );
                    from = to;
                }

                let mid = (slice.start + slice.end) / 2.0;
                plot_ui.text(Text::new(
                    PlotPoint::new(0.7 * mid.cos(), 0.7 * mid.sin()),
                    format!("{:.1}%", slice.fraction * 100.0),
                ));
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter plot
// ---------------------------------------------------------------------------

fn scatter_chart(ui: &mut Ui, points: &[ScatterPoint], color_map: Option<&ColorMap>) {
    let mut by_maker: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for p in points {
        by_maker
            .entry(p.manufacturer.as_str())
            .or_default()
            .push([p.year_fraction(), p.sales]);
    }

    Plot::new("sales_vs_launch")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Launch Year")
        .y_axis_label("Sales (Thousands)")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (maker, pts) in by_maker {
                let color = color_map.map_or(Color32::LIGHT_BLUE, |cm| cm.color_for(maker));
                plot_ui.points(
                    Points::new(PlotPoints::from(pts))
                        .radius(3.5)
                        .color(color)
                        .name(maker),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

fn heatmap(ui: &mut Ui, corr: &CorrelationMatrix) {
    let names: Vec<String> = corr.columns.iter().map(|c| c.name().to_string()).collect();
    let x_names = names.clone();
    let y_names = names;

    Plot::new("correlation_heatmap")
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .include_x(-0.5)
        .include_x(1.5)
        .include_y(-0.5)
        .include_y(1.5)
        .x_axis_formatter(move |mark, _range| category_label(&x_names, mark.value))
        // Row 0 sits at the top.
        .y_axis_formatter(move |mark, _range| category_label(&y_names, 1.0 - mark.value))
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for row in 0..2 {
                for col in 0..2 {
                    let value = corr.get(row, col);
                    let (cx, cy) = (col as f64, 1.0 - row as f64);
                    let cell = PlotPoints::new(vec![
                        [cx - 0.5, cy - 0.5],
                        [cx + 0.5, cy - 0.5],
                        [cx + 0.5, cy + 0.5],
                        [cx - 0.5, cy + 0.5],
                    ]);
                    plot_ui.polygon(
                        Polygon::new(cell)
                            .fill_color(coolwarm(value))
                            .stroke(Stroke::new(1.0, Color32::WHITE)),
                    );
                    plot_ui.text(Text::new(
                        PlotPoint::new(cx, cy),
                        RichText::new(format_metric(value))
                            .color(Color32::BLACK)
                            .strong(),
                    ));
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn share(entries: &[(&str, f64)]) -> Aggregation {
        Aggregation {
            entries: entries
                .iter()
                .map(|(k, v)| (GroupLabel::Text(k.to_string()), *v))
                .collect(),
        }
    }

    #[test]
    fn pie_slices_cover_a_full_turn() {
        let slices = pie_slices(&share(&[("Ford", 8.0), ("Honda", 0.0), ("Toyota", 24.0)]));

        // Zero-sales manufacturers get no wedge.
        assert_eq!(slices.len(), 2);
        assert_abs_diff_eq!(slices[0].fraction, 0.25);
        assert_abs_diff_eq!(slices[0].start, 0.0);
        assert_abs_diff_eq!(slices[1].start, slices[0].end);
        assert_abs_diff_eq!(slices[1].end, TAU, epsilon = 1e-12);
    }

    #[test]
    fn pie_of_nothing_is_empty() {
        assert!(pie_slices(&share(&[])).is_empty());
        assert!(pie_slices(&share(&[("Ford", 0.0)])).is_empty());
    }

    #[test]
    fn wedge_starts_at_origin_and_follows_the_arc() {
        let points = wedge(0.0, FRAC_PI_2);
        let pts = points.points();
        assert_eq!((pts[0].x, pts[0].y), (0.0, 0.0));
        assert_abs_diff_eq!(pts[1].x, 1.0);
        let last = pts.last().unwrap();
        assert_abs_diff_eq!(last.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(last.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn category_labels_only_on_integer_marks() {
        let labels = vec!["Corolla".to_string(), "Focus".to_string()];
        assert_eq!(category_label(&labels, 0.0), "Corolla");
        assert_eq!(category_label(&labels, 1.0), "Focus");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }
}
