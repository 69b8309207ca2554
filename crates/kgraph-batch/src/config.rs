//! Configuration for batch runs

use serde::{Deserialize, Serialize};

/// Configuration for [`BatchProcessor`](crate::BatchProcessor)
///
/// # Examples
///
/// ```
/// use kgraph_batch::BatchConfig;
///
/// let config = BatchConfig::default();
/// assert_eq!(config.max_workers, 2);
/// assert_eq!(config.file_patterns, vec!["*.txt", "*.md"]);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Concurrent workers; 0 is treated as 1
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Glob patterns matched against file names
    #[serde(default = "default_file_patterns")]
    pub file_patterns: Vec<String>,

    /// Export format names written per file
    #[serde(default = "default_export_formats")]
    pub export_formats: Vec<String>,

    /// Write `batch_summary.json` to the output directory
    #[serde(default = "default_write_summary")]
    pub write_summary: bool,
}

fn default_max_workers() -> usize {
    2
}

fn default_file_patterns() -> Vec<String> {
    vec!["*.txt".to_string(), "*.md".to_string()]
}

fn default_export_formats() -> Vec<String> {
    vec!["json".to_string(), "csv".to_string()]
}

fn default_write_summary() -> bool {
    true
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            file_patterns: default_file_patterns(),
            export_formats: default_export_formats(),
            write_summary: default_write_summary(),
        }
    }
}

impl BatchConfig {
    /// Number of worker tasks actually spawned
    pub fn worker_count(&self) -> usize {
        self.max_workers.max(1)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.file_patterns.is_empty() {
            return Err("file_patterns must not be empty".to_string());
        }
        if let Some(blank) = self.file_patterns.iter().find(|p| p.trim().is_empty()) {
            return Err(format!("file pattern '{}' is blank", blank));
        }
        if self.export_formats.is_empty() {
            return Err("export_formats must not be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}
