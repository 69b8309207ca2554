//! Per-file and per-batch outcomes

use kgraph_domain::GraphStats;
use kgraph_export::ExportOutcome;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Error recorded for files the workers never picked up
pub const CANCELLED_MESSAGE: &str = "cancelled before processing";

/// Outcome of one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Triples extracted and at least one export written
    Success,
    /// Anything else
    Failure,
}

/// One export format attempted for one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSummary {
    /// Format name as requested
    pub format: String,
    /// File written, on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Triples written
    #[serde(default)]
    pub written: usize,
    /// Failure reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ExportOutcome> for ExportSummary {
    fn from(outcome: ExportOutcome) -> Self {
        match outcome.result {
            Ok(report) => Self {
                format: outcome.requested,
                path: Some(report.path),
                written: report.written,
                error: None,
            },
            Err(e) => Self {
                format: outcome.requested,
                path: None,
                written: 0,
                error: Some(e.to_string()),
            },
        }
    }
}

impl ExportSummary {
    /// Whether the file was written
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of processing one input file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Input file
    pub file_path: PathBuf,
    /// Success or failure
    pub status: FileStatus,
    /// Triples extracted
    pub triples: usize,
    /// Wall time spent on this file
    pub duration_seconds: f64,
    /// Failure reason; always set on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Counts over the extracted triples
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<GraphStats>,
    /// One entry per requested format
    #[serde(default)]
    pub exports: Vec<ExportSummary>,
}

impl BatchResult {
    /// A failed file with `error` as the reason
    pub fn failure(file_path: PathBuf, error: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            file_path,
            status: FileStatus::Failure,
            triples: 0,
            duration_seconds: elapsed.as_secs_f64(),
            error: Some(error.into()),
            statistics: None,
            exports: Vec::new(),
        }
    }

    /// A file that was never dispatched
    pub fn cancelled(file_path: PathBuf) -> Self {
        Self::failure(file_path, CANCELLED_MESSAGE, Duration::ZERO)
    }

    /// Whether the file succeeded
    pub fn is_success(&self) -> bool {
        self.status == FileStatus::Success
    }

    /// Whether the file was skipped by cancellation
    pub fn is_cancelled(&self) -> bool {
        self.status == FileStatus::Failure && self.error.as_deref() == Some(CANCELLED_MESSAGE)
    }

    /// File name for display, falling back to the full path
    pub fn display_name(&self) -> String {
        self.file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_path.display().to_string())
    }
}

/// Aggregate of a batch run
///
/// `failed` counts every failure, cancelled files included;
/// `successful + failed == total_files` always holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Files discovered
    pub total_files: usize,
    /// Files that succeeded
    pub successful: usize,
    /// Files that failed
    pub failed: usize,
    /// Failed files that were never dispatched
    pub cancelled: usize,
    /// Wall time of the whole batch
    pub total_duration_seconds: f64,
    /// Per-file results in discovery order
    pub results: Vec<BatchResult>,
}

impl BatchSummary {
    /// Build the aggregate counts from ordered results
    pub fn from_results(results: Vec<BatchResult>, elapsed: Duration) -> Self {
        let successful = results.iter().filter(|r| r.is_success()).count();
        let cancelled = results.iter().filter(|r| r.is_cancelled()).count();
        Self {
            total_files: results.len(),
            successful,
            failed: results.len() - successful,
            cancelled,
            total_duration_seconds: elapsed.as_secs_f64(),
            results,
        }
    }

    /// Whether every file succeeded
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    /// Generate a summary report of the run
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Batch Summary".to_string(),
            "=============".to_string(),
            format!("Total files: {}", self.total_files),
            format!("Successful: {}", self.successful),
            format!("Failed: {}", self.failed),
        ];
        if self.cancelled > 0 {
            lines.push(format!("Cancelled: {}", self.cancelled));
        }
        lines.push(format!("Duration: {:.2}s", self.total_duration_seconds));
        lines.join("\n")
    }
}
