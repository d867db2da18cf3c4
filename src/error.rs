//! Error types for the aggregation engine and report tool

use thiserror::Error;

/// Main error type for loading, parsing and exporting
#[derive(Error, Debug)]
pub enum EngineError {
    /// Period key could not be parsed into a year and month
    #[error("Invalid period key: {0:?}")]
    InvalidPeriod(String),

    /// Failed to read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse or serialize JSON
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to write CSV
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Document is valid JSON but not a GeoJSON FeatureCollection
    #[error("Not a GeoJSON FeatureCollection: {0}")]
    NotAFeatureCollection(String),

    /// Requested data is not available (nothing loaded, unknown period, ...)
    #[error("Missing data: {0}")]
    MissingData(String),
}

/// Type alias for Results using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;
