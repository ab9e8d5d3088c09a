use std::string::FromUtf8Error;

use thiserror::Error;

use crate::store::{SatelliteId, StoreError};

#[derive(Debug, Error)]
pub enum BulkError {
    #[error("missing required headers: {}", .0.join(", "))]
    MissingHeaders(Vec<String>),
    #[error("unknown export format: {0}")]
    UnknownFormat(String),
    #[error("satellite {0} not found")]
    SatelliteNotFound(SatelliteId),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("export is not valid UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),
}

/// Why a single CSV data row was skipped.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("missing value for {0}")]
    Missing(&'static str),
    #[error("invalid {column} value {value:?}")]
    Invalid { column: &'static str, value: String },
    #[error("malformed record: {0}")]
    Malformed(String),
    #[error("{0}")]
    Rejected(#[from] StoreError),
}
