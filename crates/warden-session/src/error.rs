//! Error types for the durable session layer.
//!
//! Neither error reaches callers of [`SessionStore`](crate::SessionStore)
//! directly: persist failures are logged and counted, load failures collapse
//! into "no such session".

use std::time::Duration;

/// A durable write failed.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Underlying storage I/O failed.
    #[error("failed to write session '{id}': {source}")]
    Io {
        id: String,
        source: std::io::Error,
    },

    /// The record could not be serialized.
    #[error("failed to serialize session '{id}': {source}")]
    Serialize {
        id: String,
        source: serde_json::Error,
    },

    /// The write did not complete within the adapter's timeout.
    #[error("writing session '{id}' timed out after {timeout:?}")]
    Timeout { id: String, timeout: Duration },
}

/// A durable read failed.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// No record is stored under this identifier.
    #[error("session '{0}' not found in durable storage")]
    NotFound(String),

    /// A record exists but does not decode into a valid session.
    #[error("session '{id}' is malformed: {reason}")]
    Malformed { id: String, reason: String },

    /// Underlying storage I/O failed.
    #[error("failed to read session '{id}': {source}")]
    Io {
        id: String,
        source: std::io::Error,
    },

    /// The read did not complete within the adapter's timeout.
    #[error("reading session '{id}' timed out after {timeout:?}")]
    Timeout { id: String, timeout: Duration },
}

impl LoadError {
    /// Whether the record simply does not exist (as opposed to being unreadable).
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound(_))
    }
}

/// Result type for durable writes.
pub type PersistResult<T> = std::result::Result<T, PersistError>;

/// Result type for durable reads.
pub type LoadResult<T> = std::result::Result<T, LoadError>;
