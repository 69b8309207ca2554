//! kgraph Domain Layer
//!
//! Core data model and trait interfaces shared by every kgraph crate.
//!
//! ## Key Concepts
//!
//! - **Triple**: a `(subject, predicate, object)` relationship extracted from text,
//!   carrying an optional confidence and an original/inferred provenance flag
//! - **Effective confidence**: the explicit confidence or the documented default
//! - **Entity name normalization**: the single rule every name comparison uses
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture:
//! - Pure data and business rules only (serde is the one external dependency)
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions (`LlmProvider`, `TripleExtractor`)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod stats;
pub mod traits;
pub mod triple;

// Re-exports for convenience
pub use stats::GraphStats;
pub use traits::{LlmProvider, TripleExtractor};
pub use triple::{normalize_name, Triple, TripleError, DEFAULT_ORIGINAL_CONFIDENCE};
