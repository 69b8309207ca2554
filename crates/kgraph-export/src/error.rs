//! Error types for export operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that fail a single export call
#[derive(Error, Debug)]
pub enum ExportError {
    /// The format name is not one of the supported writers
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// The destination file could not be created or written
    #[error("Cannot write {path}: {source}")]
    Destination {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Writing to the output stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
