//! kgraph Export Writers
//!
//! Serializes triple sequences to interchange formats.
//!
//! | Format | Extension | Purpose |
//! |--------|-----------|---------|
//! | `json` | `.json` | Structured record with statistics and metadata |
//! | `csv` | `.csv` | Tabular, one row per triple |
//! | `graphml` | `.graphml` | Graph interchange for analysis tools |
//! | `gexf` | `.gexf` | Visualization interchange (Gephi) |
//! | `turtle` | `.ttl` | RDF Turtle for semantic-web tooling |
//!
//! # Guarantees
//!
//! - **Deterministic**: identical triples in identical order produce identical
//!   bytes. The only varying content is the generation timestamp, which each
//!   format confines to one field or comment (none at all in CSV).
//! - **Tolerant**: malformed triples (blank fields, out-of-range confidence)
//!   are skipped and counted in [`WriteStats::skipped`]; they never fail an export.
//! - **Documented defaults**: a missing confidence is written as `1.0` for
//!   original triples and `0.5` for inferred ones; a missing chunk as `0`.
//!
//! # Examples
//!
//! ```
//! use kgraph_domain::Triple;
//! use kgraph_export::{writer_for, ExportFormat, ExportOptions};
//!
//! let triples = vec![Triple::new("James Watt", "improved", "steam engine")];
//! let mut out = Vec::new();
//! let stats = writer_for(ExportFormat::Csv)
//!     .write(&triples, &mut out, &ExportOptions::default())
//!     .unwrap();
//!
//! assert_eq!(stats.written, 1);
//! assert!(String::from_utf8(out).unwrap().starts_with("subject,predicate,object"));
//! ```

#![warn(missing_docs)]

mod error;
mod format;
mod multi;
mod options;
pub mod writers;

pub use error::ExportError;
pub use format::ExportFormat;
pub use multi::{export_multiple_formats, export_to_path, output_path, ExportOutcome, ExportReport};
pub use options::{export_confidence, ExportOptions, DEFAULT_INFERRED_CONFIDENCE};
pub use writers::json::read_triples_json;
pub use writers::{writer_for, TripleWriter, WriteStats};
