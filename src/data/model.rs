use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Source column names
// ---------------------------------------------------------------------------

pub const MANUFACTURER: &str = "Manufacturer";
pub const MODEL: &str = "Model";
pub const SALES_IN_THOUSANDS: &str = "Sales_in_thousands";
pub const VEHICLE_TYPE: &str = "Vehicle_type";
pub const LATEST_LAUNCH: &str = "Latest_Launch";

/// Columns every input file must provide. Anything else is ignored.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    MANUFACTURER,
    MODEL,
    SALES_IN_THOUSANDS,
    VEHICLE_TYPE,
    LATEST_LAUNCH,
];

// ---------------------------------------------------------------------------
// CarSale – one row of the source table
// ---------------------------------------------------------------------------

/// A single sales record. Field names follow the source CSV headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarSale {
    #[serde(rename = "Manufacturer")]
    pub manufacturer: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Sales_in_thousands")]
    pub sales_in_thousands: f64,
    #[serde(rename = "Vehicle_type")]
    pub vehicle_type: String,
    /// Launch date exactly as it appeared in the file.
    #[serde(rename = "Latest_Launch")]
    pub latest_launch: String,
}

impl CarSale {
    pub fn new(
        manufacturer: impl Into<String>,
        model: impl Into<String>,
        sales_in_thousands: f64,
        vehicle_type: impl Into<String>,
        latest_launch: impl Into<String>,
    ) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            model: model.into(),
            sales_in_thousands,
            vehicle_type: vehicle_type.into(),
            latest_launch: latest_launch.into(),
        }
    }

    /// Parsed launch date, `None` when the text is not a recognised date.
    pub fn launch_date(&self) -> Option<NaiveDate> {
        parse_launch_date(&self.latest_launch)
    }

    pub fn launch_year(&self) -> Option<i32> {
        self.launch_date().map(|d| d.year())
    }
}

/// Accepted launch date layouts, tried in order. Slash dates are month-first.
const DATE_FORMATS: [&str; 5] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%b %d, %Y",
];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a launch date the way the dashboard understands it.
///
/// A bare four-digit year maps to January 1st of that year.
pub fn parse_launch_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if text.len() == 4 && text.bytes().all(|b| b.is_ascii_digit()) {
        return text
            .parse::<i32>()
            .ok()
            .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1));
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

// ---------------------------------------------------------------------------
// Column selectors
// ---------------------------------------------------------------------------

/// Text columns that can be counted or grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryColumn {
    Manufacturer,
    Model,
    VehicleType,
}

impl CategoryColumn {
    pub fn value<'a>(&self, sale: &'a CarSale) -> &'a str {
        match self {
            CategoryColumn::Manufacturer => &sale.manufacturer,
            CategoryColumn::Model => &sale.model,
            CategoryColumn::VehicleType => &sale.vehicle_type,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CategoryColumn::Manufacturer => MANUFACTURER,
            CategoryColumn::Model => MODEL,
            CategoryColumn::VehicleType => VEHICLE_TYPE,
        }
    }
}

/// Numeric views of a record. `LaunchYear` is derived from `Latest_Launch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericColumn {
    Sales,
    LaunchYear,
}

impl NumericColumn {
    pub fn value(&self, sale: &CarSale) -> Option<f64> {
        match self {
            NumericColumn::Sales => Some(sale.sales_in_thousands),
            NumericColumn::LaunchYear => sale.launch_year().map(f64::from),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NumericColumn::Sales => SALES_IN_THOUSANDS,
            NumericColumn::LaunchYear => "Launch_Year",
        }
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

// ---------------------------------------------------------------------------
// SalesDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset plus the option lists shown by the selectors.
#[derive(Debug, Clone, Default)]
pub struct SalesDataset {
    /// All records in file order.
    pub records: Vec<CarSale>,
    /// Sorted distinct manufacturers.
    pub manufacturers: BTreeSet<String>,
    /// Sorted distinct vehicle types.
    pub vehicle_types: BTreeSet<String>,
}

impl SalesDataset {
    /// Build option indices from the loaded records.
    pub fn from_records(records: Vec<CarSale>) -> Self {
        let manufacturers = records.iter().map(|r| r.manufacturer.clone()).collect();
        let vehicle_types = records.iter().map(|r| r.vehicle_type.clone()).collect();
        SalesDataset {
            records,
            manufacturers,
            vehicle_types,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Borrow every record, in file order.
    pub fn all(&self) -> Vec<&CarSale> {
        self.records.iter().collect()
    }
}
