//! Error types for the Graph Filter

use thiserror::Error;

/// Invalid filter parameters, detected before any triple is examined
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// Both `only_original` and `only_inferred` were requested
    #[error("only-original and only-inferred are mutually exclusive")]
    ConflictingInferenceFlags,

    /// A confidence bound is NaN or outside [0.0, 1.0]
    #[error("confidence threshold {0} must be a number in [0.0, 1.0]")]
    InvalidConfidence(f64),

    /// The lower confidence bound exceeds the upper bound
    #[error("confidence range is empty: min {min} > max {max}")]
    EmptyConfidenceRange {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// The subgraph center entity is blank
    #[error("subgraph center entity must not be blank")]
    BlankCenter,
}
