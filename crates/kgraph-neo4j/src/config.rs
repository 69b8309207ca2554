//! Connection and import settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for [`Neo4jAdapter`](crate::Neo4jAdapter)
///
/// # Examples
///
/// ```
/// use kgraph_neo4j::Neo4jConfig;
///
/// let config = Neo4jConfig::default();
/// assert_eq!(config.uri, "bolt://localhost:7687");
/// assert_eq!(config.max_retry_attempts, 3);
/// assert!(!config.enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Neo4jConfig {
    /// Export to the database after extraction
    pub enabled: bool,

    /// Bolt URI
    pub uri: String,

    /// User name
    pub username: String,

    /// Password
    pub password: String,

    /// Database name
    pub database: String,

    /// Label stored on the import metadata node
    pub graph_name: String,

    /// Delete existing data before import
    pub clear_existing: bool,

    /// Attempts for transient failures, at least 1
    pub max_retry_attempts: u32,

    /// Delay before the first retry; doubles per retry
    pub retry_delay_ms: u64,

    /// Per-statement timeout
    pub query_timeout_secs: u64,

    /// Rows per `UNWIND` statement
    pub batch_size: usize,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            uri: "bolt://localhost:7687".to_string(),
            username: "neo4j".to_string(),
            password: "password".to_string(),
            database: "neo4j".to_string(),
            graph_name: "KnowledgeGraph".to_string(),
            clear_existing: false,
            max_retry_attempts: 3,
            retry_delay_ms: 1000,
            query_timeout_secs: 30,
            batch_size: 1000,
        }
    }
}

impl Neo4jConfig {
    /// `uri/database`, used in error messages
    pub fn target(&self) -> String {
        format!("{}/{}", self.uri, self.database)
    }

    /// Per-statement timeout as a `Duration`
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    /// Delay before retry number `retry` (1-based): 1x, 2x, 4x...
    pub fn retry_delay(&self, retry: u32) -> Duration {
        let factor = 1u64 << retry.saturating_sub(1).min(16);
        Duration::from_millis(self.retry_delay_ms.saturating_mul(factor))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.uri.trim().is_empty() {
            return Err("neo4j.uri must not be empty".to_string());
        }
        if self.max_retry_attempts == 0 {
            return Err("neo4j.max_retry_attempts must be at least 1".to_string());
        }
        if self.batch_size == 0 {
            return Err("neo4j.batch_size must be greater than 0".to_string());
        }
        if self.query_timeout_secs == 0 {
            return Err("neo4j.query_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delay_doubles() {
        let config = Neo4jConfig {
            retry_delay_ms: 100,
            ..Neo4jConfig::default()
        };
        assert_eq!(config.retry_delay(1), Duration::from_millis(100));
        assert_eq!(config.retry_delay(2), Duration::from_millis(200));
        assert_eq!(config.retry_delay(3), Duration::from_millis(400));
    }

    #[test]
    fn test_validate() {
        assert!(Neo4jConfig::default().validate().is_ok());
        let config = Neo4jConfig {
            max_retry_attempts: 0,
            ..Neo4jConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_target() {
        assert_eq!(Neo4jConfig::default().target(), "bolt://localhost:7687/neo4j");
    }
}
