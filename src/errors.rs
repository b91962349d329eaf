// errors.rs
use thiserror::Error;

use crate::nlp::ClassifierError;

/// Errors originating from the SQLite store.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Open DB failed: {0}")]
    Open(String),
    #[error("Failed to apply schema: {0}")]
    Schema(String),
    #[error("Database Error: {0}")]
    Query(String),
}

impl From<rusqlite::Error> for DbError {
    fn from(e: rusqlite::Error) -> Self {
        DbError::Query(e.to_string())
    }
}

/// Errors raised while writing an export file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("XLSX error: {0}")]
    Xlsx(String),
}

/// Why a single listing was dropped from a run. The run itself carries on.
#[derive(Debug, Error)]
pub enum RecordFailure {
    #[error("classification failed: {0}")]
    Classification(#[from] ClassifierError),
    #[error("raw_json could not be serialized: {0}")]
    RawJson(#[from] serde_json::Error),
    #[error("persistence failed: {0}")]
    Persistence(#[from] DbError),
}
