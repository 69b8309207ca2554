//! kgraph Extractor
//!
//! Turns unstructured text into knowledge-graph triples with an LLM.
//!
//! # Architecture
//!
//! ```text
//! Text → word chunks → LLM (per chunk) → parser → standardization → inference → triples
//! ```
//!
//! # Key Features
//!
//! - **Word chunking**: fixed-size word windows with configurable overlap, each
//!   triple tagged with the index of the chunk it came from
//! - **Tolerant parsing**: the JSON array may arrive wrapped in a code fence or
//!   surrounded by prose; incomplete items are dropped, not fatal
//! - **Standardization**: entity names that differ only in case or spacing are
//!   collapsed onto the first spelling seen
//! - **Transitive inference**: `A -p-> B` and `B -p-> C` yield an inferred
//!   `A -p-> C`
//!
//! # Example Usage
//!
//! ```
//! use kgraph_extractor::{Extractor, ExtractorConfig};
//! use kgraph_domain::traits::TripleExtractor;
//! use kgraph_llm::MockProvider;
//!
//! let llm = MockProvider::new(
//!     r#"[{"subject": "James Watt", "predicate": "improved", "object": "steam engine"}]"#,
//! );
//! let extractor = Extractor::new(llm, ExtractorConfig::default());
//!
//! let triples = extractor.extract("James Watt improved the steam engine.").unwrap();
//! assert_eq!(triples.len(), 1);
//! assert_eq!(triples[0].chunk, Some(0));
//! ```

#![warn(missing_docs)]

mod chunking;
mod config;
mod error;
mod extractor;
mod parser;
mod prompt;
mod refine;


pub use chunking::chunk_words;
pub use config::{ChunkingConfig, ExtractorConfig, InferenceConfig, StandardizationConfig};
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use parser::parse_llm_response;
pub use refine::{infer_transitive, standardize};
