//! Error types for pool operations.
//!
//! Three failure modes exist, and they travel very different paths:
//! creation failures are retried by the replenishment task (or surfaced
//! directly when pooling is disabled), close failures are logged and
//! swallowed because a driver being discarded cannot be recovered, and
//! acquisition fails only when the pool has shut down underneath the
//! caller.

use thiserror::Error;

/// A driver could not be created.
///
/// Carries a retryable classification: the replenishment task retries in
/// either case, but known-transient failures are logged at warn level
/// while unrecognized ones are logged as errors.
#[derive(Debug, Error)]
#[error("driver creation failed: {reason}")]
pub struct CreateError {
    /// Human-readable reason for the failure.
    reason: String,

    /// Whether this failure is a recognized transient condition.
    retryable: bool,

    /// Optional underlying error.
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CreateError {
    /// Creates a non-retryable (unrecognized) creation error.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            retryable: false,
            source: None,
        }
    }

    /// Creates a creation error for a recognized transient condition.
    pub fn transient(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            retryable: true,
            source: None,
        }
    }

    /// Attaches the underlying error.
    #[must_use]
    pub fn with_source(mut self, source: Box<dyn std::error::Error + Send + Sync>) -> Self {
        self.source = Some(source);
        self
    }

    /// Returns true if this failure is a recognized transient condition.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.retryable
    }
}

/// A driver could not be closed cleanly.
///
/// Terminal for that driver. The pool logs these and moves on; they never
/// reach callers of `release`.
#[derive(Debug, Error)]
#[error("driver close failed: {reason}")]
pub struct CloseError {
    /// Human-readable reason for the failure.
    reason: String,

    /// Optional underlying error.
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CloseError {
    /// Creates a close error.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            source: None,
        }
    }

    /// Attaches the underlying error.
    #[must_use]
    pub fn with_source(mut self, source: Box<dyn std::error::Error + Send + Sync>) -> Self {
        self.source = Some(source);
        self
    }
}

/// The error type for `DriverPool::acquire`.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The pool shut down while the caller was waiting for a driver.
    #[error("driver pool is shut down")]
    Closed,

    /// On-demand creation failed (pooling disabled).
    ///
    /// When pooling is enabled, creation failures never surface here;
    /// the replenishment task retries them and callers simply wait.
    #[error(transparent)]
    Creation(#[from] CreateError),
}

/// A specialized Result type for pool operations.
pub type Result<T> = std::result::Result<T, PoolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_error_classification() {
        assert!(CreateError::transient("browser exited early").is_retryable());
        assert!(!CreateError::new("binary not found").is_retryable());
    }

    #[test]
    fn create_error_display_includes_reason() {
        let err = CreateError::new("no DISPLAY available");
        assert!(err.to_string().contains("no DISPLAY available"));
    }

    #[test]
    fn pool_error_wraps_creation() {
        let err: PoolError = CreateError::new("boom").into();
        assert!(matches!(err, PoolError::Creation(_)));
    }
}
