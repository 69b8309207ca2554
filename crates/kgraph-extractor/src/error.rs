//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// The LLM response for a chunk held no usable JSON array
    #[error("Invalid response format for chunk {chunk}: {reason}")]
    InvalidFormat {
        /// Index of the chunk whose response failed
        chunk: usize,
        /// What was wrong with the response
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
