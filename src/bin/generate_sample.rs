use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use car_sales_dashboard::config::DEFAULT_DATA_PATH;
use car_sales_dashboard::data::model::{
    CarSale, LATEST_LAUNCH, MANUFACTURER, MODEL, SALES_IN_THOUSANDS, VEHICLE_TYPE,
};
use chrono::{Duration, NaiveDate};
use clap::Parser;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Write a synthetic car sales table for trying out the dashboard.
#[derive(Debug, Parser)]
struct Args {
    /// Output file; `.parquet` writes Parquet, anything else CSV
    #[arg(default_value = DEFAULT_DATA_PATH)]
    output: PathBuf,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// (manufacturer, [(model, vehicle type)])
const CATALOG: &[(&str, &[(&str, &str)])] = &[
    (
        "Acura",
        &[
            ("Integra", "Passenger"),
            ("TL", "Passenger"),
            ("RL", "Passenger"),
            ("MDX", "Car"),
        ],
    ),
    (
        "Audi",
        &[
            ("A4", "Passenger"),
            ("A6", "Passenger"),
            ("A8", "Passenger"),
        ],
    ),
    (
        "BMW",
        &[
            ("323i", "Passenger"),
            ("328i", "Passenger"),
            ("528i", "Passenger"),
        ],
    ),
    (
        "Chevrolet",
        &[
            ("Cavalier", "Passenger"),
            ("Malibu", "Passenger"),
            ("Impala", "Passenger"),
            ("Silverado", "Car"),
            ("Blazer", "Car"),
        ],
    ),
    (
        "Dodge",
        &[
            ("Neon", "Passenger"),
            ("Intrepid", "Passenger"),
            ("Ram Pickup", "Car"),
            ("Durango", "Car"),
            ("Caravan", "Car"),
        ],
    ),
    (
        "Ford",
        &[
            ("Escort", "Passenger"),
            ("Focus", "Passenger"),
            ("Taurus", "Passenger"),
            ("Explorer", "Car"),
            ("F-Series", "Car"),
            ("Ranger", "Car"),
        ],
    ),
    (
        "Honda",
        &[
            ("Civic", "Passenger"),
            ("Accord", "Passenger"),
            ("CR-V", "Car"),
            ("Odyssey", "Car"),
        ],
    ),
    (
        "Jeep",
        &[
            ("Wrangler", "Car"),
            ("Cherokee", "Car"),
            ("Grand Cherokee", "Car"),
        ],
    ),
    (
        "Nissan",
        &[
            ("Sentra", "Passenger"),
            ("Altima", "Passenger"),
            ("Maxima", "Passenger"),
            ("Pathfinder", "Car"),
            ("Frontier", "Car"),
        ],
    ),
    (
        "Toyota",
        &[
            ("Corolla", "Passenger"),
            ("Camry", "Passenger"),
            ("Avalon", "Passenger"),
            ("Tacoma", "Car"),
            ("Sienna", "Car"),
            ("RAV4", "Car"),
            ("4Runner", "Car"),
        ],
    ),
    (
        "Volkswagen",
        &[
            ("Golf", "Passenger"),
            ("Jetta", "Passenger"),
            ("Passat", "Passenger"),
            ("Beetle", "Passenger"),
        ],
    ),
];

fn generate(rng: &mut StdRng) -> Vec<CarSale> {
    let first_launch = NaiveDate::from_ymd_opt(2008, 1, 1).unwrap_or_default();

    CATALOG
        .iter()
        .flat_map(|(maker, models)| {
            models
                .iter()
                .map(move |(model, kind)| (*maker, *model, *kind))
        })
        .map(|(maker, model, kind)| {
            // Skewed like real sales: a few best sellers, a long tail.
            let sales = (rng.gen_range(0.0_f64..5.7).exp() * 1000.0).round() / 1000.0;
            let launch = first_launch + Duration::days(rng.gen_range(0..5 * 365));
            // A few rows without a launch date, which the loader drops.
            let launch = if rng.gen_bool(0.03) {
                String::new()
            } else {
                launch.format("%-m/%-d/%Y").to_string()
            };
            CarSale::new(maker, model, sales, kind, launch)
        })
        .collect()
}

fn write_csv(path: &Path, sales: &[CarSale]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    for sale in sales {
        writer.serialize(sale).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, sales: &[CarSale]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new(MANUFACTURER, DataType::Utf8, false),
        Field::new(MODEL, DataType::Utf8, false),
        Field::new(SALES_IN_THOUSANDS, DataType::Float64, false),
        Field::new(VEHICLE_TYPE, DataType::Utf8, false),
        Field::new(LATEST_LAUNCH, DataType::Utf8, true),
    ]));

    let launches: Vec<Option<&str>> = sales
        .iter()
        .map(|s| Some(s.latest_launch.as_str()).filter(|l| !l.is_empty()))
        .collect();

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(
                sales.iter().map(|s| s.manufacturer.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(
                sales.iter().map(|s| s.model.as_str()),
            )),
            Arc::new(Float64Array::from_iter_values(
                sales.iter().map(|s| s.sales_in_thousands),
            )),
            Arc::new(StringArray::from_iter_values(
                sales.iter().map(|s| s.vehicle_type.as_str()),
            )),
            Arc::new(StringArray::from(launches)),
        ],
    )
    .context("building record batch")?;

    let file = File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)
        .context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut rng = StdRng::seed_from_u64(args.seed);
    let sales = generate(&mut rng);

    if let Some(dir) = args.output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }

    let is_parquet = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"));
    if is_parquet {
        write_parquet(&args.output, &sales)?;
    } else {
        write_csv(&args.output, &sales)?;
    }

    log::info!("Wrote {} records to {}", sales.len(), args.output.display());
    println!("Wrote {} records to {}", sales.len(), args.output.display());
    Ok(())
}
