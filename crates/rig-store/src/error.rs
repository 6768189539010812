//! Error types for datastore harness operations.

use thiserror::Error;

/// The error type for datastore harness operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A document failed to serialize or deserialize.
    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing store reported a failure.
    #[error("datastore backend error: {0}")]
    Backend(String),

    /// A caller passed an argument the operation cannot work with.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// A specialized Result type for datastore harness operations.
pub type Result<T> = std::result::Result<T, StoreError>;
