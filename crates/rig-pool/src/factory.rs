//! The factory seam between the pool and the real driver implementation.
//!
//! The pool never constructs or destroys drivers itself; it delegates
//! both to a `DriverFactory`. This keeps the pool generic over whatever
//! the suite is pooling (browser sessions in practice) and makes the
//! concurrency contract testable with a stub factory.

use crate::error::{CloseError, CreateError};
use async_trait::async_trait;

/// Creates and closes pooled drivers.
///
/// Implementations are shared across the replenishment task, callers,
/// and detached close tasks, so they must be `Send + Sync`. Both
/// operations may be slow (launching a browser takes hundreds of
/// milliseconds); the pool arranges for neither to run on a caller's
/// critical path when pooling is enabled.
///
/// # Example Implementation
///
/// ```ignore
/// struct BrowserDriverFactory {
///     config: BrowserConfig,
/// }
///
/// #[async_trait]
/// impl DriverFactory for BrowserDriverFactory {
///     type Driver = Browser;
///
///     async fn create(&self) -> Result<Browser, CreateError> {
///         Browser::launch(self.config.clone())
///             .await
///             .map_err(|e| CreateError::new(e.to_string()))
///     }
///
///     async fn close(&self, driver: Browser) -> Result<(), CloseError> {
///         driver.close().await.map_err(|e| CloseError::new(e.to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait DriverFactory: Send + Sync + 'static {
    /// The pooled resource. Owned exclusively by whichever holder
    /// currently has it: the pool buffer, a caller, or a close task.
    type Driver: Send + 'static;

    /// Creates a new driver.
    ///
    /// # Errors
    ///
    /// Returns `CreateError` if the driver cannot be created. Mark
    /// recognized transient conditions with `CreateError::transient` so
    /// the replenishment task logs them at the right level.
    async fn create(&self) -> Result<Self::Driver, CreateError>;

    /// Closes a driver, releasing its underlying resources.
    ///
    /// # Errors
    ///
    /// Returns `CloseError` on failure. The pool logs and discards the
    /// error; a failed close of a driver being thrown away is not
    /// recoverable.
    async fn close(&self, driver: Self::Driver) -> Result<(), CloseError>;
}
