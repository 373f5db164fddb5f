/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, drop incomplete rows → SalesDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ SalesDataset  │  Vec<CarSale>, selector options
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  manufacturer ∧ vehicle type → subset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ aggregate, stats  │  group-by sums, metrics, correlation, histogram
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   view    │  DashboardView handed to the UI / text report
///   └──────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
pub mod view;
