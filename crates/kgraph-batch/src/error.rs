//! Error types for batch operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a whole batch
///
/// Per-file problems never surface here; they are recorded in the file's
/// [`BatchResult`](crate::BatchResult).
#[derive(Error, Debug)]
pub enum BatchError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A file pattern that is not a valid glob
    #[error("Invalid file pattern '{pattern}': {source}")]
    Pattern {
        /// The pattern as given
        pattern: String,
        /// Parser error
        #[source]
        source: glob::PatternError,
    },

    /// Input or output directory problem
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Report or summary serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
