//! Performance analysis and markdown reporting for batch runs

use crate::error::BatchError;
use crate::result::BatchSummary;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// File name of the markdown performance report
pub const REPORT_FILE: &str = "performance_report.md";

/// Processing time over successful files, in seconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TimingStats {
    /// Fastest file
    pub min: f64,
    /// Slowest file
    pub max: f64,
    /// Average per file
    pub mean: f64,
    /// Sum over files
    pub total: f64,
}

/// Extraction volume over successful files
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct QualityStats {
    /// Average triples per file
    pub mean_triples: f64,
    /// Fewest triples in a file
    pub min_triples: usize,
    /// Most triples in a file
    pub max_triples: usize,
    /// Triples across all files
    pub total_triples: usize,
    /// Average distinct entities per file
    pub mean_entities: f64,
    /// Average distinct predicates per file
    pub mean_relationships: f64,
}

/// Rates derived from successful processing time
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ThroughputStats {
    /// Successful files per hour of processing
    pub files_per_hour: f64,
    /// Triples per minute of processing
    pub triples_per_minute: f64,
}

/// Derived metrics for one batch
///
/// With no successful file every metric is `0.0`; nothing is ever NaN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PerformanceReport {
    /// Files in the batch
    pub total_files: usize,
    /// Files that succeeded
    pub successful: usize,
    /// Files that failed
    pub failed: usize,
    /// `successful / total_files`, 0.0 for an empty batch
    pub success_rate: f64,
    /// Timing over successful files
    pub timing: TimingStats,
    /// Extraction volume over successful files
    pub quality: QualityStats,
    /// Rates over successful processing time
    pub throughput: ThroughputStats,
}

impl PerformanceReport {
    /// Whether any file succeeded
    pub fn has_data(&self) -> bool {
        self.successful > 0
    }
}

/// `numerator / denominator`, or 0.0 when the result would not be finite
fn ratio(numerator: f64, denominator: f64) -> f64 {
    let value = numerator / denominator;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Computes a [`PerformanceReport`] from a [`BatchSummary`]
pub struct PerformanceAnalyzer;

impl PerformanceAnalyzer {
    /// Analyze a finished batch
    ///
    /// # Examples
    ///
    /// ```
    /// use kgraph_batch::{BatchSummary, PerformanceAnalyzer};
    ///
    /// let report = PerformanceAnalyzer::analyze(&BatchSummary::default());
    /// assert!(!report.has_data());
    /// assert_eq!(report.success_rate, 0.0);
    /// assert_eq!(report.throughput.files_per_hour, 0.0);
    /// ```
    pub fn analyze(summary: &BatchSummary) -> PerformanceReport {
        let successes: Vec<_> = summary.results.iter().filter(|r| r.is_success()).collect();

        let mut report = PerformanceReport {
            total_files: summary.total_files,
            successful: successes.len(),
            failed: summary.total_files.saturating_sub(successes.len()),
            success_rate: ratio(successes.len() as f64, summary.total_files as f64),
            ..PerformanceReport::default()
        };
        if successes.is_empty() {
            return report;
        }

        let count = successes.len() as f64;
        let durations: Vec<f64> = successes.iter().map(|r| r.duration_seconds).collect();
        let total_time: f64 = durations.iter().sum();

        report.timing = TimingStats {
            min: durations.iter().copied().fold(f64::INFINITY, f64::min),
            max: durations.iter().copied().fold(0.0, f64::max),
            mean: ratio(total_time, count),
            total: total_time,
        };

        let total_triples: usize = successes.iter().map(|r| r.triples).sum();
        let entities: usize = successes
            .iter()
            .map(|r| r.statistics.map_or(0, |s| s.unique_entities))
            .sum();
        let relationships: usize = successes
            .iter()
            .map(|r| r.statistics.map_or(0, |s| s.unique_relationships))
            .sum();

        report.quality = QualityStats {
            mean_triples: ratio(total_triples as f64, count),
            min_triples: successes.iter().map(|r| r.triples).min().unwrap_or(0),
            max_triples: successes.iter().map(|r| r.triples).max().unwrap_or(0),
            total_triples,
            mean_entities: ratio(entities as f64, count),
            mean_relationships: ratio(relationships as f64, count),
        };

        report.throughput = ThroughputStats {
            files_per_hour: ratio(count, total_time / 3600.0),
            triples_per_minute: ratio(total_triples as f64, total_time / 60.0),
        };

        report
    }
}

/// Render the markdown performance report
///
/// `generated_at` is the only timestamp in the output. Without successful
/// files the metric lines read `n/a`.
pub fn render_markdown(
    summary: &BatchSummary,
    report: &PerformanceReport,
    generated_at: DateTime<Utc>,
) -> String {
    let metric = |value: f64, decimals: usize, unit: &str| {
        if report.has_data() {
            format!("{:.*}{}", decimals, value, unit)
        } else {
            "n/a".to_string()
        }
    };

    let mut out = String::new();
    let _ = writeln!(out, "# Batch Processing Performance Report");
    let _ = writeln!(
        out,
        "Generated: {}",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "## Summary");
    let _ = writeln!(out, "- Total files processed: {}", summary.total_files);
    let _ = writeln!(out, "- Successful: {}", summary.successful);
    let _ = writeln!(out, "- Failed: {}", summary.failed);
    if summary.cancelled > 0 {
        let _ = writeln!(out, "- Cancelled: {}", summary.cancelled);
    }
    let _ = writeln!(out, "- Success rate: {:.1}%", report.success_rate * 100.0);
    let _ = writeln!(out);

    let timing = &report.timing;
    let _ = writeln!(out, "## Performance Metrics");
    let _ = writeln!(out, "- Average processing time: {}", metric(timing.mean, 2, " seconds"));
    let _ = writeln!(out, "- Fastest file: {}", metric(timing.min, 2, " seconds"));
    let _ = writeln!(out, "- Slowest file: {}", metric(timing.max, 2, " seconds"));
    let _ = writeln!(out, "- Total processing time: {}", metric(timing.total, 2, " seconds"));
    let _ = writeln!(out);

    let quality = &report.quality;
    let _ = writeln!(out, "## Extraction Quality");
    let _ = writeln!(out, "- Average triples per file: {}", metric(quality.mean_triples, 1, ""));
    let _ = writeln!(
        out,
        "- Total triples extracted: {}",
        metric(quality.total_triples as f64, 0, "")
    );
    let _ = writeln!(out, "- Average entities per file: {}", metric(quality.mean_entities, 1, ""));
    let _ = writeln!(
        out,
        "- Average relationships per file: {}",
        metric(quality.mean_relationships, 1, "")
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "## Throughput");
    let _ = writeln!(
        out,
        "- Files per hour: {}",
        metric(report.throughput.files_per_hour, 1, "")
    );
    let _ = writeln!(
        out,
        "- Triples per minute: {}",
        metric(report.throughput.triples_per_minute, 1, "")
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "## File-by-File Results");
    for result in &summary.results {
        if result.is_success() {
            let _ = writeln!(
                out,
                "- {}: {} triples, {:.2}s",
                result.display_name(),
                result.triples,
                result.duration_seconds
            );
        } else {
            let _ = writeln!(
                out,
                "- {}: FAILED - {}",
                result.display_name(),
                result.error.as_deref().unwrap_or("Unknown error")
            );
        }
    }

    out
}

/// Analyze `summary` and write the markdown report to `path`
pub fn write_report(
    path: &Path,
    summary: &BatchSummary,
    generated_at: DateTime<Utc>,
) -> Result<PerformanceReport, BatchError> {
    let report = PerformanceAnalyzer::analyze(summary);
    fs::write(path, render_markdown(summary, &report, generated_at)).map_err(|source| {
        BatchError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    tracing::info!(path = %path.display(), "Performance report written");
    Ok(report)
}
