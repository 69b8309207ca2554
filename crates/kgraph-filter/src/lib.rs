//! kgraph Graph Filter
//!
//! Pure selection functions over an ordered triple sequence.
//!
//! Every function returns clones of input triples, in input order; none of
//! them creates or modifies a triple. Entity and relationship names are
//! compared after [`normalize_name`](kgraph_domain::normalize_name).
//!
//! # Filters
//!
//! - [`filter_by_entities`] / [`filter_by_relationships`]: name inclusion or exclusion
//! - [`filter_by_confidence`] / [`filter_by_confidence_range`]: effective-confidence thresholds
//! - [`filter_by_inference_status`]: originals or inferred triples only
//! - [`filter_by_chunk`]: triples from selected source chunks
//! - [`get_subgraph_around_entity`]: bounded-hop neighborhood of one entity
//! - [`FilterSpec`]: all of the above as a single validated pipeline
//!
//! # Examples
//!
//! ```
//! use kgraph_domain::Triple;
//! use kgraph_filter::{filter_by_confidence, get_subgraph_around_entity};
//!
//! let triples = vec![
//!     Triple::new("A", "relates", "B").with_confidence(0.9),
//!     Triple::new("B", "relates", "C").with_confidence(0.4).inferred(),
//! ];
//!
//! assert_eq!(filter_by_confidence(&triples, 0.5).unwrap().len(), 1);
//! assert_eq!(get_subgraph_around_entity(&triples, "B", 1).len(), 2);
//! ```

#![warn(missing_docs)]

mod error;
mod filters;
mod pipeline;
mod subgraph;

pub use error::FilterError;
pub use filters::{
    filter_by_chunk, filter_by_confidence, filter_by_confidence_range, filter_by_entities,
    filter_by_inference_status, filter_by_relationships,
};
pub use pipeline::{FilterSpec, SubgraphSpec};
pub use subgraph::get_subgraph_around_entity;
