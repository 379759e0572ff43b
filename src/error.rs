//! Error types for the lazytree core.
//!
//! `StorageError` covers the persisted snapshot, `ProviderError` covers child fetches and
//! `ApiError` is what the controller and CLI surface. Provider failures never
//! escape as errors; they are recorded on the failed node.

use thiserror::Error;

/// Persistence failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    #[error("Snapshot encoding failed: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("Stored value under key {key:?} is not valid UTF-8")]
    InvalidEncoding { key: String },

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Failures reported by a child data provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Failed to fetch children of {parent_id}: {reason}")]
    FetchFailed { parent_id: String, reason: String },
}

impl ProviderError {
    pub fn fetch_failed(parent_id: &str, reason: impl Into<String>) -> Self {
        Self::FetchFailed {
            parent_id: parent_id.to_string(),
            reason: reason.into(),
        }
    }

    /// Short reason suitable for display next to the failed node
    pub fn reason(&self) -> &str {
        match self {
            Self::FetchFailed { reason, .. } => reason,
        }
    }
}

/// Top-level error type for controller and CLI operations
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
