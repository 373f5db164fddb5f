use anyhow::{Context, Result};
use car_sales_dashboard::app::CarSalesApp;
use car_sales_dashboard::config::{Cli, DashboardConfig};
use car_sales_dashboard::data::{loader, view::DashboardView};
use car_sales_dashboard::report;
use car_sales_dashboard::state::AppState;
use clap::Parser;
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::from(Cli::parse());

    // Loaded once; the app owns it from here on.
    let dataset = loader::load_file(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))?;

    if config.summary_only {
        let view = DashboardView::compute(&dataset, &config.selection);
        print!("{}", report::render(&view));
        return Ok(());
    }

    let state = AppState::with_dataset(dataset, config.selection);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Car Sales Data Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(CarSalesApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}
