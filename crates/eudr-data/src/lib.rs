//! Data loading for the EUDR restrictions dashboard
//!
//! Reads the restriction dataset from disk, loads the dashboard
//! configuration, and retrieves overlay documents over HTTP or from files.

pub mod config;
pub mod dataset;
pub mod fetch;

use eudr_core::{DatasetError, OverlayError};
use thiserror::Error;

// Re-exports
pub use config::DashboardConfig;
pub use dataset::{load_dataset, parse_csv, parse_json};
pub use fetch::{retrieve, spawn_retrievals, OverlayFetcher, OverlaySource, SourceLocation};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Unsupported dataset format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid record {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Overlay(#[from] OverlayError),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}
