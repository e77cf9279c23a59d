// crates/sondeconv-core/src/error.rs

use std::path::PathBuf;

use sondeconv_parser::ParserError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Flight log parsing failed: {0}")]
    Parse(#[from] ParserError),

    #[error("line {line}: missing value in required column '{column}'")]
    MissingValue { line: u64, column: &'static str },

    #[error("line {line}: {source}")]
    Domain {
        line: u64,
        #[source]
        source: DomainError,
    },

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to move finished output into {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A derived quantity fell outside the region where its formula is defined.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DomainError {
    #[error("dew point is undefined at 0% relative humidity (logarithm of zero)")]
    ZeroHumidity,

    #[error("relative humidity {0}% is outside 0..=100")]
    HumidityOutOfRange(f64),

    #[error("dew point is not finite for air temperature {temperature} °C at {relative_humidity}% humidity")]
    NonFinite {
        temperature: f64,
        relative_humidity: f64,
    },
}

pub type Result<T> = std::result::Result<T, ConversionError>;
