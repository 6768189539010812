//! Condition-polling primitives for UI test steps.
//!
//! UI tests spend most of their time waiting: for a page to finish
//! loading, for an element to appear, for a script-driven state change.
//! These helpers poll a condition at a fixed interval until it holds or
//! a timeout expires. The default timeout is short (five seconds) on the
//! theory that a test page which takes longer than that has already
//! failed in spirit.

use crate::error::{BrowserError, Result};
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Default timeout for wait operations (5 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default interval between condition checks (100ms).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Timeout and polling cadence for a wait operation.
#[derive(Debug, Clone, Copy)]
pub struct WaitConfig {
    /// Maximum time to wait for the condition to hold.
    pub timeout: Duration,

    /// Interval between condition checks.
    pub poll_interval: Duration,
}

impl WaitConfig {
    /// Creates a wait configuration.
    #[must_use]
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Uses a custom timeout with the default poll interval.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(timeout, DEFAULT_POLL_INTERVAL)
    }

    /// Adjusts the poll interval.
    #[must_use]
    pub fn poll_every(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_POLL_INTERVAL)
    }
}

/// Polls `condition` until it returns true or the timeout expires.
///
/// The timeout error produced here carries no page context; the
/// page-level wait methods fill in the current URL before surfacing it.
///
/// # Errors
///
/// Returns [`BrowserError::WaitTimeout`] when the timeout expires.
pub async fn wait_for<F, Fut>(condition: F, config: WaitConfig, description: &str) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = bool>,
{
    wait_for_result(
        || {
            let fut = condition();
            async move { Ok(fut.await) }
        },
        config,
        description,
    )
    .await
}

/// Polls a fallible condition until it returns `Ok(true)` or the timeout
/// expires.
///
/// A condition that returns an error keeps being polled; mid-navigation
/// evaluation failures are routine (the execution context is torn down
/// and rebuilt) and should not abort the wait.
///
/// # Errors
///
/// Returns [`BrowserError::WaitTimeout`] when the timeout expires.
pub async fn wait_for_result<F, Fut>(
    condition: F,
    config: WaitConfig,
    description: &str,
) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let start = Instant::now();

    loop {
        if matches!(condition().await, Ok(true)) {
            return Ok(());
        }

        if start.elapsed() >= config.timeout {
            return Err(BrowserError::WaitTimeout {
                condition: description.to_string(),
                timeout: config.timeout,
                page_url: String::from("-"),
            });
        }

        sleep(config.poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn holds_immediately() {
        let result = wait_for(|| async { true }, WaitConfig::default(), "always true").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn holds_after_a_few_polls() {
        let attempts = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&attempts);

        let result = wait_for(
            move || {
                let seen = Arc::clone(&seen);
                async move { seen.fetch_add(1, Ordering::SeqCst) >= 2 }
            },
            WaitConfig::new(Duration::from_secs(5), Duration::from_millis(10)),
            "third poll",
        )
        .await;

        assert!(result.is_ok());
        assert!(attempts.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn times_out_with_description() {
        let result = wait_for(
            || async { false },
            WaitConfig::new(Duration::from_millis(80), Duration::from_millis(10)),
            "never true",
        )
        .await;

        match result {
            Err(BrowserError::WaitTimeout { condition, .. }) => {
                assert_eq!(condition, "never true");
            }
            other => panic!("expected WaitTimeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn condition_errors_are_retried() {
        let attempts = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&attempts);

        let result = wait_for_result(
            move || {
                let seen = Arc::clone(&seen);
                async move {
                    if seen.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(BrowserError::Script("context destroyed".into()))
                    } else {
                        Ok(true)
                    }
                }
            },
            WaitConfig::new(Duration::from_secs(5), Duration::from_millis(10)),
            "recovers from errors",
        )
        .await;

        assert!(result.is_ok());
    }
}
