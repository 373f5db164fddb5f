use std::path::PathBuf;

use clap::Parser;

use crate::data::filter::FilterSelection;

/// Dataset location used when no path is given.
pub const DEFAULT_DATA_PATH: &str = "data/Car_sales.csv";

/// Interactive car sales dashboard.
#[derive(Debug, Parser)]
#[command(name = "car-sales-dashboard", version, about)]
pub struct Cli {
    /// Sales file to load (.csv, .json, .parquet)
    #[arg(default_value = DEFAULT_DATA_PATH)]
    pub path: PathBuf,

    /// Pre-select a manufacturer (repeatable)
    #[arg(long = "manufacturer", short = 'm', value_name = "NAME")]
    pub manufacturers: Vec<String>,

    /// Pre-select a vehicle type (repeatable)
    #[arg(long = "vehicle-type", short = 't', value_name = "TYPE")]
    pub vehicle_types: Vec<String>,

    /// Print the dashboard as text and exit instead of opening a window
    #[arg(long)]
    pub summary: bool,
}

/// Resolved startup settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub selection: FilterSelection,
    pub summary_only: bool,
}

impl From<Cli> for DashboardConfig {
    fn from(cli: Cli) -> Self {
        Self {
            data_path: cli.path,
            selection: FilterSelection::new(cli.manufacturers, cli.vehicle_types),
            summary_only: cli.summary,
        }
    }
}
