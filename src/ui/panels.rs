use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::FilterDimension;
use crate::data::model::REQUIRED_COLUMNS;
use crate::data::stats::format_metric;
use crate::data::view::DashboardView;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

enum FilterAction {
    Toggle(FilterDimension, String),
    SelectAll(FilterDimension),
    Clear(FilterDimension),
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clicks are applied after the loop so the dataset borrow can end first.
    let mut actions = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for dim in FilterDimension::ALL {
                let options = dim.options(dataset);
                let selected = state.selection.selected(dim);

                // Nothing ticked means the dimension is not filtered.
                let header_text = if selected.is_empty() {
                    format!("{}  (all)", dim.label())
                } else {
                    format!("{}  ({}/{})", dim.label(), selected.len(), options.len())
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim.label())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                actions.push(FilterAction::SelectAll(dim));
                            }
                            if ui.small_button("Clear").clicked() {
                                actions.push(FilterAction::Clear(dim));
                            }
                        });

                        for value in options {
                            let mut text = RichText::new(value);
                            if dim == FilterDimension::Manufacturer {
                                if let Some(cm) = &state.color_map {
                                    text = text.color(cm.color_for(value));
                                }
                            }

                            let mut checked = selected.contains(value);
                            if ui.checkbox(&mut checked, text).changed() {
                                actions.push(FilterAction::Toggle(dim, value.clone()));
                            }
                        }
                    });
            }
        });

    for action in actions {
        match action {
            FilterAction::Toggle(dim, value) => state.toggle_filter_value(dim, &value),
            FilterAction::SelectAll(dim) => state.select_all(dim),
            FilterAction::Clear(dim) => state.clear(dim),
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(view)) = (&state.dataset, &state.view) {
            ui.label(format!(
                "{} records loaded, {} visible",
                ds.len(),
                view.record_count
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open car sales data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Preview table and metrics
// ---------------------------------------------------------------------------

/// First rows of the filtered subset.
pub fn preview_table(ui: &mut Ui, view: &DashboardView) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().at_least(90.0), REQUIRED_COLUMNS.len())
        .header(20.0, |mut header| {
            for title in REQUIRED_COLUMNS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for sale in &view.preview {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&sale.manufacturer);
                    });
                    row.col(|ui| {
                        ui.label(&sale.model);
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.3}", sale.sales_in_thousands));
                    });
                    row.col(|ui| {
                        ui.label(&sale.vehicle_type);
                    });
                    row.col(|ui| {
                        ui.label(&sale.latest_launch);
                    });
                });
            }
        });
}

/// The four summary numbers, laid out in two columns.
pub fn metrics(ui: &mut Ui, view: &DashboardView) {
    let m = &view.metrics;
    ui.columns(2, |cols| {
        metric(&mut cols[0], "Average Sales", format_metric(m.mean_sales));
        metric(
            &mut cols[1],
            "Total Models in Filter",
            m.distinct_models.to_string(),
        );
        metric(&mut cols[0], "Total Sales", format_metric(m.total_sales));
        metric(
            &mut cols[1],
            "Unique Manufacturers",
            m.distinct_manufacturers.to_string(),
        );
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.label(RichText::new(label).weak());
    ui.label(RichText::new(value).heading().strong());
    ui.add_space(6.0);
}
