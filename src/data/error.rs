//! Schema-level failures raised while loading a sales file.

use thiserror::Error;

/// Errors that describe a file the loader cannot interpret.
///
/// I/O and parse failures are wrapped with `anyhow` context by the loader;
/// this type covers the cases the loader detects itself.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    /// Extension is not one of csv / json / parquet / pq.
    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    /// A required source column is absent.
    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),

    /// JSON input whose root is not an array of records.
    #[error("Expected top-level JSON array of records")]
    NotAnArray,
}
