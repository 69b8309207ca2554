//! Error types for database operations

use thiserror::Error;

/// Failure kinds reported by a [`CypherClient`](crate::CypherClient)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    /// Network or server unavailable
    Connection,
    /// Credentials rejected
    Authentication,
    /// No answer within the timeout
    Timeout,
    /// Statement rejected or result unreadable
    Query,
}

/// Error returned by a client for a single statement
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ClientError {
    /// What went wrong
    pub kind: ClientErrorKind,
    /// Driver message
    pub message: String,
}

impl ClientError {
    /// Create a client error
    pub fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Errors from adapter operations
///
/// Every variant names the operation and the `uri/database` target.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatabaseError {
    /// Server unreachable
    #[error("Connection failed during {operation} on {target} after {attempts} attempt(s): {message}")]
    Connection {
        /// Adapter operation
        operation: String,
        /// `uri/database`
        target: String,
        /// Attempts made
        attempts: u32,
        /// Driver message
        message: String,
    },

    /// Credentials rejected
    #[error("Authentication failed during {operation} on {target}: {message}")]
    Authentication {
        /// Adapter operation
        operation: String,
        /// `uri/database`
        target: String,
        /// Driver message
        message: String,
    },

    /// Statement timed out
    #[error("Timed out during {operation} on {target} after {attempts} attempt(s)")]
    Timeout {
        /// Adapter operation
        operation: String,
        /// `uri/database`
        target: String,
        /// Attempts made
        attempts: u32,
    },

    /// Statement or argument rejected
    #[error("Query failed during {operation} on {target}: {message}")]
    Query {
        /// Adapter operation
        operation: String,
        /// `uri/database`
        target: String,
        /// Driver or validation message
        message: String,
    },

    /// Adapter used after `close()`
    #[error("Not connected: {operation} on {target} needs an open connection")]
    NotConnected {
        /// Adapter operation
        operation: String,
        /// `uri/database`
        target: String,
    },
}

impl DatabaseError {
    /// Build from a client error observed on attempt `attempts`
    pub fn from_client(error: ClientError, operation: &str, target: &str, attempts: u32) -> Self {
        let operation = operation.to_string();
        let target = target.to_string();
        match error.kind {
            ClientErrorKind::Connection => Self::Connection {
                operation,
                target,
                attempts,
                message: error.message,
            },
            ClientErrorKind::Authentication => Self::Authentication {
                operation,
                target,
                message: error.message,
            },
            ClientErrorKind::Timeout => Self::Timeout {
                operation,
                target,
                attempts,
            },
            ClientErrorKind::Query => Self::Query {
                operation,
                target,
                message: error.message,
            },
        }
    }

    /// Whether retrying may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout { .. })
    }
}
