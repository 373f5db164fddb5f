use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{
    CarSale, LATEST_LAUNCH, MANUFACTURER, MODEL, REQUIRED_COLUMNS, SALES_IN_THOUSANDS,
    SalesDataset, VEHICLE_TYPE,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sales dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row containing at least the five required columns
/// * `.json`    – `[{ "Manufacturer": ..., "Model": ..., ... }, ...]`
/// * `.parquet` – columns named like the CSV headers
///
/// Rows missing any required value are dropped, as is any row whose sales
/// figure is not a non-negative number.
pub fn load_file(path: &Path) -> Result<SalesDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => read_csv(File::open(path).context("opening CSV")?)?,
        "json" => read_json(BufReader::new(
            File::open(path).context("opening JSON file")?,
        ))?,
        "parquet" | "pq" => read_parquet(File::open(path).context("opening parquet file")?)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    };

    log::info!(
        "Loaded {} records from {} ({} manufacturers, {} vehicle types)",
        dataset.len(),
        path.display(),
        dataset.manufacturers.len(),
        dataset.vehicle_types.len()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Row cleaning
// ---------------------------------------------------------------------------

/// A row as it comes off disk: any field may be absent.
#[derive(Debug, Default, Deserialize)]
struct RawSale {
    #[serde(rename = "Manufacturer", default)]
    manufacturer: Option<String>,
    #[serde(rename = "Model", default)]
    model: Option<String>,
    #[serde(
        rename = "Sales_in_thousands",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    sales_in_thousands: Option<f64>,
    #[serde(rename = "Vehicle_type", default)]
    vehicle_type: Option<String>,
    #[serde(
        rename = "Latest_Launch",
        default,
        deserialize_with = "text_or_number"
    )]
    latest_launch: Option<String>,
}

/// Launch cells are usually text, but a bare year may arrive as a number.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Text(String),
        Int(i64),
        Float(f64),
    }

    let cell = Option::<Cell>::deserialize(deserializer)?;
    Ok(cell.map(|cell| match cell {
        Cell::Text(s) => s,
        Cell::Int(n) => n.to_string(),
        Cell::Float(x) => x.to_string(),
    }))
}

impl RawSale {
    fn into_sale(self) -> Option<CarSale> {
        fn present(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.trim().is_empty())
        }

        let sales = self
            .sales_in_thousands
            .filter(|s| s.is_finite() && *s >= 0.0)?;
        Some(CarSale {
            manufacturer: present(self.manufacturer)?,
            model: present(self.model)?,
            sales_in_thousands: sales,
            vehicle_type: present(self.vehicle_type)?,
            latest_launch: present(self.latest_launch)?,
        })
    }
}

fn build_dataset(rows: Vec<RawSale>) -> SalesDataset {
    let total = rows.len();
    let records: Vec<CarSale> = rows.into_iter().filter_map(RawSale::into_sale).collect();

    let dropped = total - records.len();
    if dropped > 0 {
        log::warn!("Dropped {dropped} of {total} rows with missing or invalid values");
    }
    SalesDataset::from_records(records)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per line.
/// Columns other than the required five are ignored.
pub fn read_csv<R: Read>(input: R) -> Result<SalesDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(input);
    let headers = reader.headers().context("reading CSV headers")?.clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn(column).into());
        }
    }

    let mut rows = Vec::new();
    // Line 1 is the header.
    for (row_no, result) in reader.deserialize::<RawSale>().enumerate() {
        rows.push(result.with_context(|| format!("CSV line {}", row_no + 2))?);
    }

    Ok(build_dataset(rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Manufacturer": "Acura",
///     "Model": "Integra",
///     "Sales_in_thousands": 16.919,
///     "Vehicle_type": "Passenger",
///     "Latest_Launch": "2/2/2012"
///   },
///   ...
/// ]
/// ```
pub fn read_json<R: Read>(input: R) -> Result<SalesDataset> {
    let root: JsonValue = serde_json::from_reader(input).context("parsing JSON")?;
    let JsonValue::Array(items) = root else {
        return Err(LoadError::NotAnArray.into());
    };

    let rows = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<RawSale>(item)
                .with_context(|| format!("Row {i} is not a sales record"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(build_dataset(rows))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing sales records.
///
/// Text columns may be any Arrow type with a display form (dates included);
/// the sales column may be any float or integer type.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
pub fn read_parquet<T: ChunkReader + 'static>(input: T) -> Result<SalesDataset> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(input)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let manufacturer = column(&batch, MANUFACTURER)?;
        let model = column(&batch, MODEL)?;
        let sales = column(&batch, SALES_IN_THOUSANDS)?;
        let vehicle_type = column(&batch, VEHICLE_TYPE)?;
        let launch = column(&batch, LATEST_LAUNCH)?;

        for row in 0..batch.num_rows() {
            rows.push(RawSale {
                manufacturer: string_cell(manufacturer, row),
                model: string_cell(model, row),
                sales_in_thousands: float_cell(sales, row),
                vehicle_type: string_cell(vehicle_type, row),
                latest_launch: string_cell(launch, row),
            });
        }
    }

    Ok(build_dataset(rows))
}

// -- Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &'static str) -> Result<&'a ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| LoadError::MissingColumn(name))?;
    Ok(batch.column(idx))
}

fn string_cell(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    array_value_to_string(col.as_ref(), row).ok()
}

fn float_cell(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| f64::from(a.value(row))),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| f64::from(a.value(row))),
        _ => string_cell(col, row).and_then(|s| s.trim().parse().ok()),
    }
}
