//! Browser process lifecycle.
//!
//! `Browser` wraps a chromiumoxide Chrome session: launch with
//! test-friendly defaults, hand out pages, and close gracefully. Each
//! instance gets a unique user data directory so parallel sessions never
//! fight over Chrome's profile lock.

use crate::error::{BrowserError, Result};
use crate::page::Page;
use chromiumoxide::browser::{Browser as ChromeBrowser, BrowserConfig as ChromeBrowserConfig};
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// How much browser-side logging to request from Chrome.
///
/// Verbosity costs test throughput; quiet is the default and suites
/// should only turn logging up while chasing a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogVerbosity {
    /// Fatal messages only.
    #[default]
    Quiet,
    /// Warnings and above, written to Chrome's log.
    Warnings,
    /// Everything, including verbose module logging.
    Verbose,
}

impl LogVerbosity {
    fn chrome_args(self) -> Vec<String> {
        match self {
            LogVerbosity::Quiet => vec!["--log-level=3".to_string()],
            LogVerbosity::Warnings => {
                vec!["--enable-logging".to_string(), "--log-level=1".to_string()]
            }
            LogVerbosity::Verbose => vec!["--enable-logging".to_string(), "--v=1".to_string()],
        }
    }
}

/// Launch options for a test browser.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run without a visible window (default: true).
    pub headless: bool,

    /// Window size (default: 1920x1080).
    pub window_size: (u32, u32),

    /// Browser log verbosity.
    pub verbosity: LogVerbosity,

    /// Additional Chrome arguments.
    pub args: Vec<String>,

    /// Chrome executable path (None = auto-detect).
    pub binary: Option<PathBuf>,
}

impl BrowserConfig {
    /// Creates a config with headless defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the browser with a visible window. Useful when stepping
    /// through a failing scenario locally.
    #[must_use]
    pub fn visible(mut self) -> Self {
        self.headless = false;
        self
    }

    /// Sets the window size.
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    /// Sets browser log verbosity.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: LogVerbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Appends extra Chrome arguments.
    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.args.extend(args);
        self
    }

    /// Points at a specific Chrome binary instead of auto-detecting.
    #[must_use]
    pub fn with_binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary = Some(path.into());
        self
    }

    /// Builds the chromiumoxide launch configuration.
    fn to_chrome_config(&self) -> Result<ChromeBrowserConfig> {
        let mut config = ChromeBrowserConfig::builder();

        if self.headless {
            config = config.arg("--headless");
        }

        config = config.arg(format!(
            "--window-size={},{}",
            self.window_size.0, self.window_size.1
        ));

        for arg in self.verbosity.chrome_args() {
            config = config.arg(arg);
        }

        // A unique profile directory per instance; Chrome's
        // ProcessSingleton refuses to share one across processes.
        let profile_dir = std::env::temp_dir().join(format!("rig-browser-{}", uuid::Uuid::new_v4()));
        config = config.arg(format!("--user-data-dir={}", profile_dir.display()));

        for arg in &self.args {
            config = config.arg(arg.clone());
        }

        if let Some(binary) = &self.binary {
            config = config.chrome_executable(binary.clone());
        }

        config.build().map_err(|e| BrowserError::LaunchFailed {
            reason: format!("invalid launch configuration: {e}"),
            source: None,
        })
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_size: (1920, 1080),
            verbosity: LogVerbosity::default(),
            args: vec![
                // Required in containers without user namespaces; only
                // ever run trusted test content under this flag.
                "--no-sandbox".to_string(),
                // /dev/shm is tiny in most CI containers.
                "--disable-dev-shm-usage".to_string(),
            ],
            binary: None,
        }
    }
}

/// A running browser session.
///
/// Prefer explicit [`Browser::close`] at the end of a scenario; Drop
/// falls back to chromiumoxide killing the process, which works but
/// skips the graceful CDP goodbye.
pub struct Browser {
    inner: Arc<Mutex<Option<ChromeBrowser>>>,
}

impl Browser {
    /// Launches Chrome and establishes the DevTools connection.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::LaunchFailed`] if Chrome is missing, not
    /// executable, or dies during startup.
    pub async fn launch(config: BrowserConfig) -> Result<Self> {
        debug!(?config, "launching browser");

        let chrome_config = config.to_chrome_config()?;

        let (browser, mut handler) =
            ChromeBrowser::launch(chrome_config)
                .await
                .map_err(|e| BrowserError::LaunchFailed {
                    reason: "failed to launch Chrome process".to_string(),
                    source: Some(Box::new(e)),
                })?;

        // chromiumoxide needs someone pumping CDP events for the whole
        // session lifetime.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!("browser event handler error: {e}");
                }
            }
        });

        debug!("browser launched");

        Ok(Self {
            inner: Arc::new(Mutex::new(Some(browser))),
        })
    }

    /// Opens a fresh page (tab).
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::AlreadyClosed`] after `close`.
    pub async fn new_page(&self) -> Result<Page> {
        let guard = self.inner.lock().await;
        let browser = guard.as_ref().ok_or(BrowserError::AlreadyClosed)?;

        let chrome_page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::ConnectionFailed(e.to_string()))?;

        Ok(Page::new(chrome_page))
    }

    /// Closes the browser gracefully.
    ///
    /// # Errors
    ///
    /// Returns an error if the CDP close exchange fails; the process is
    /// still killed by Drop in that case.
    pub async fn close(self) -> Result<()> {
        let mut guard = self.inner.lock().await;

        if let Some(mut browser) = guard.take() {
            debug!("closing browser");
            browser
                .close()
                .await
                .map_err(|e| BrowserError::ConnectionFailed(e.to_string()))?;
        }

        Ok(())
    }

    /// True once `close` has run.
    pub async fn is_closed(&self) -> bool {
        self.inner.lock().await.is_none()
    }
}

impl std::fmt::Debug for Browser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Browser").finish_non_exhaustive()
    }
}
