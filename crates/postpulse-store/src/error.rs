use std::path::PathBuf;

use thiserror::Error;

/// Errors returned when reading or writing persisted artifacts.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid row {row} in {}: {reason}", .path.display())]
    InvalidRow {
        path: PathBuf,
        row: usize,
        reason: String,
    },
}
