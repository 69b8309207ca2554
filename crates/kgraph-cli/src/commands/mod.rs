//! Command implementations.
//!
//! Each command returns the number of items that failed (export formats,
//! batch files) so `main` can choose the exit status; hard errors are
//! returned as `Err`.

pub mod batch;
pub mod extract;
pub mod graph;
pub mod profile;

pub use self::batch::execute_batch;
pub use self::extract::execute_extract;
pub use self::graph::execute_graph;
pub use self::profile::execute_profile;
