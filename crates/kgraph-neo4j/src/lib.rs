//! kgraph Neo4j Adapter
//!
//! Writes triples to Neo4j as `Entity` nodes joined by `RELATES_TO` edges and
//! runs a few read queries over the stored graph.
//!
//! # Architecture
//!
//! - [`cypher`]: statement builders; user values travel only as parameters
//! - [`CypherClient`]: async seam over the driver, implemented by
//!   [`BoltClient`] (`neo4rs`) and [`MockClient`]
//! - [`Neo4jAdapter`]: import and read helpers with retry on transient errors
//!
//! ## Retry policy
//!
//! | Error | Retried |
//! |-------|---------|
//! | `Connection` | yes, up to `max_retry_attempts` |
//! | `Timeout` | yes, up to `max_retry_attempts` |
//! | `Authentication` | no |
//! | `Query` | no |
//! | `NotConnected` | no |
//!
//! Delays double from `retry_delay_ms` (1x, 2x, 4x...).

#![warn(missing_docs)]

mod adapter;
mod client;
mod config;
pub mod cypher;
mod error;

pub use adapter::{
    EntityStatistics, GraphPath, ImportReport, Neighbor, NeighborRelationship, Neighborhood,
    Neo4jAdapter, RelationshipStatistics,
};
pub use client::{BoltClient, CypherClient, MockClient, Record};
pub use config::Neo4jConfig;
pub use cypher::Statement;
pub use error::{ClientError, ClientErrorKind, DatabaseError};
