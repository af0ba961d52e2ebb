//! Error types for aforo

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("No data file configured (pass a CSV path or set data_path)")]
    MissingDataPath,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A logical field matched no column, neither by name nor by keyword.
    #[error("No column found for field {field}")]
    UnresolvedField { field: String },

    /// Row-level; the reshaper skips the row and counts it.
    #[error("Invalid period in row {row}: {reason}")]
    InvalidPeriod { row: usize, reason: String },

    #[error("File {path} is not valid {encoding}")]
    EncodingMismatch { encoding: String, path: String },

    #[error("Forecast unavailable: {0}")]
    ForecastUnavailable(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Excel export error: {0}")]
    Excel(String),
}

pub type Result<T> = std::result::Result<T, Error>;
