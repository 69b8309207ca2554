//! kgraph CLI library.
//!
//! Argument parsing, configuration layering, built-in profiles, command
//! execution and output formatting for the `kgraph` binary.
//!
//! | Command   | Does |
//! |-----------|------|
//! | `extract` | One document (or saved triples) through filters to exports, optionally Neo4j |
//! | `batch`   | Every matching file in a directory, with a performance report |
//! | `profile` | List, show or write the built-in profiles |
//! | `graph`   | Statistics, shortest paths and neighborhoods from Neo4j |

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod profiles;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
