//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// LLM client could not be set up
    #[error("LLM error: {0}")]
    Llm(#[from] kgraph_llm::LlmError),

    /// Extraction failed
    #[error("Extraction failed: {0}")]
    Extraction(#[from] kgraph_extractor::ExtractorError),

    /// Filter arguments rejected
    #[error("Filter error: {0}")]
    Filter(#[from] kgraph_filter::FilterError),

    /// Export error outside the per-format outcomes
    #[error("Export error: {0}")]
    Export(#[from] kgraph_export::ExportError),

    /// Batch could not run
    #[error("Batch error: {0}")]
    Batch(#[from] kgraph_batch::BatchError),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] kgraph_neo4j::DatabaseError),
}
