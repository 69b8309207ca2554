//! Export options and written defaults

use chrono::{DateTime, SecondsFormat, Utc};
use kgraph_domain::{Triple, DEFAULT_ORIGINAL_CONFIDENCE};

/// Confidence written for an inferred triple that carries none
pub const DEFAULT_INFERRED_CONFIDENCE: f64 = 0.5;

/// Confidence value a writer emits for `triple`
pub fn export_confidence(triple: &Triple) -> f64 {
    match triple.confidence {
        Some(c) => c,
        None if triple.inferred => DEFAULT_INFERRED_CONFIDENCE,
        None => DEFAULT_ORIGINAL_CONFIDENCE,
    }
}

/// Options shared by all writers
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Generation timestamp; `None` means the time of writing
    pub timestamp: Option<DateTime<Utc>>,

    /// Emit generation metadata (JSON `metadata`, XML comments, Turtle header)
    pub include_metadata: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            timestamp: None,
            include_metadata: true,
        }
    }
}

impl ExportOptions {
    /// Options with a fixed timestamp
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp: Some(timestamp),
            ..Self::default()
        }
    }

    /// Pin the timestamp so several writers share it
    pub fn resolved(&self) -> Self {
        Self {
            timestamp: Some(self.timestamp.unwrap_or_else(Utc::now)),
            include_metadata: self.include_metadata,
        }
    }

    /// RFC 3339 timestamp, second precision
    pub fn timestamp_rfc3339(&self) -> String {
        self.timestamp
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// Calendar date of the timestamp, `YYYY-MM-DD`
    pub fn timestamp_date(&self) -> String {
        self.timestamp
            .unwrap_or_else(Utc::now)
            .format("%Y-%m-%d")
            .to_string()
    }
}
