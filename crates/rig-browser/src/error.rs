//! Error types for browser operations.

use std::time::Duration;
use thiserror::Error;

/// The error type for all browser operations.
///
/// Launch failures carry an optional source error because chromiumoxide
/// reports them through several distinct error paths (process spawn,
/// CDP handshake, config validation).
#[derive(Debug, Error)]
pub enum BrowserError {
    /// The Chrome process could not be launched.
    #[error("failed to launch browser: {reason}")]
    LaunchFailed {
        /// Why the launch failed.
        reason: String,
        /// Underlying error, when one exists.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The DevTools connection was lost or refused.
    #[error("devtools connection failed: {0}")]
    ConnectionFailed(String),

    /// Navigation to a URL failed.
    #[error("navigation to '{url}' failed: {reason}")]
    NavigationFailed {
        /// The URL that failed to load.
        url: String,
        /// Why navigation failed.
        reason: String,
    },

    /// A wait condition did not hold within its timeout.
    ///
    /// `page_url` records where the page was when the wait gave up,
    /// which is usually the first thing worth knowing about a stuck
    /// test step.
    #[error("wait for {condition} timed out after {timeout:?} (page: {page_url})")]
    WaitTimeout {
        /// The condition that was being waited for.
        condition: String,
        /// The configured timeout.
        timeout: Duration,
        /// Current page URL at the time of the timeout, best-effort.
        page_url: String,
    },

    /// In-page JavaScript evaluation failed.
    #[error("script evaluation failed: {0}")]
    Script(String),

    /// An operation was attempted on a browser that is already closed.
    #[error("browser is already closed")]
    AlreadyClosed,

    /// Errors surfaced directly by chromiumoxide.
    #[error("cdp error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),
}

/// A specialized Result type for browser operations.
pub type Result<T> = std::result::Result<T, BrowserError>;
