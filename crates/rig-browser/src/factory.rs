//! Factory adapter that plugs browsers into `rig-pool`.
//!
//! The pool knows nothing about browsers; this is where launch and close
//! errors get translated into the pool's creation/close error taxonomy,
//! including the retryable classification for launch failures we know to
//! be transient on busy CI hosts.

use crate::browser::{Browser, BrowserConfig};
use async_trait::async_trait;
use rig_pool::{CloseError, CreateError, DriverFactory};

/// Launch failure fragments observed to clear on retry: the previous
/// Chrome instance is still being reaped, or the DevTools port was not
/// up yet when the handshake timed out.
const TRANSIENT_LAUNCH_MARKERS: &[&str] = &["exited process", "timed out", "address in use"];

/// Creates and closes pooled [`Browser`] drivers from a fixed launch
/// configuration.
#[derive(Debug, Clone)]
pub struct BrowserDriverFactory {
    config: BrowserConfig,
}

impl BrowserDriverFactory {
    /// Creates a factory that launches browsers with `config`.
    #[must_use]
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    /// The launch configuration used for every pooled browser.
    #[must_use]
    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }
}

#[async_trait]
impl DriverFactory for BrowserDriverFactory {
    type Driver = Browser;

    async fn create(&self) -> Result<Browser, CreateError> {
        Browser::launch(self.config.clone())
            .await
            .map_err(|e| classify_launch_failure(&e.to_string()).with_source(Box::new(e)))
    }

    async fn close(&self, driver: Browser) -> Result<(), CloseError> {
        driver
            .close()
            .await
            .map_err(|e| CloseError::new("browser close failed").with_source(Box::new(e)))
    }
}

/// Maps a launch failure message onto the pool's retryable taxonomy.
fn classify_launch_failure(message: &str) -> CreateError {
    let lowered = message.to_lowercase();
    if TRANSIENT_LAUNCH_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
    {
        CreateError::transient(message)
    } else {
        CreateError::new(message)
    }
}
