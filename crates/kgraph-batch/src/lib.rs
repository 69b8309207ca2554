//! kgraph Batch Processing
//!
//! Runs triple extraction over a directory of documents with a bounded worker
//! pool, exports each document's triples, and analyzes the run.
//!
//! # Overview
//!
//! - **Discovery**: non-recursive, case-sensitive glob match on file names
//! - **Worker pool**: `max_workers` tokio tasks draining a shared queue
//! - **Isolation**: a failing file is recorded and never stops the batch
//! - **Cancellation**: a [`CancellationToken`](tokio_util::sync::CancellationToken)
//!   stops dispatch; in-flight files finish
//! - **Analysis**: [`PerformanceAnalyzer`] and a markdown report
//!
//! ## Artifacts
//!
//! | File | Written when |
//! |------|--------------|
//! | `<stem>.<ext>` | per file and export format |
//! | `<stem>_<extension>.<ext>` | two input files share a stem |
//! | `batch_summary.json` | `write_summary` is set |
//! | `performance_report.md` | [`write_report`] is called |
//!
//! # Usage
//!
//! ```no_run
//! use kgraph_batch::{write_report, BatchConfig, BatchProcessor};
//! use kgraph_extractor::{Extractor, ExtractorConfig};
//! use kgraph_llm::MockProvider;
//! use std::path::Path;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = Extractor::new(MockProvider::default(), ExtractorConfig::default());
//!     let processor = BatchProcessor::new(extractor, BatchConfig::default());
//!     let output = Path::new("out");
//!
//!     let summary = processor
//!         .process_directory(Path::new("docs"), output, CancellationToken::new())
//!         .await?;
//!     write_report(&output.join("performance_report.md"), &summary, chrono::Utc::now())?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod analyzer;
mod config;
mod error;
mod processor;
mod result;

pub use analyzer::{
    render_markdown, write_report, PerformanceAnalyzer, PerformanceReport, QualityStats,
    ThroughputStats, TimingStats, REPORT_FILE,
};
pub use config::BatchConfig;
pub use error::BatchError;
pub use processor::{discover, write_summary, BatchProcessor, SUMMARY_FILE};
pub use result::{BatchResult, BatchSummary, ExportSummary, FileStatus, CANCELLED_MESSAGE};
