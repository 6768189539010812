//! # rig-browser
//!
//! Headless Chrome driver construction and UI wait helpers, built on
//! chromiumoxide.
//!
//! This crate owns the browser half of the test toolkit: launching and
//! closing Chrome with test-friendly defaults, navigating pages, and
//! waiting for the conditions UI test steps depend on (page load, element
//! presence, element visibility). It also provides the factory adapter
//! that plugs browsers into `rig-pool`, so suites can draw warm browser
//! sessions from a bounded pool instead of paying launch latency per test.
//!
//! ## Architecture
//!
//! - **Browser / BrowserConfig**: Process lifecycle and launch options
//! - **Page**: A tab with navigation, scripting, and wait helpers
//! - **wait**: Condition-polling primitives with configurable timeouts
//! - **BrowserDriverFactory**: `rig_pool::DriverFactory` implementation
//!
//! ## Example Usage
//!
//! ```ignore
//! use rig_browser::{Browser, BrowserConfig, WaitConfig};
//!
//! let browser = Browser::launch(BrowserConfig::default()).await?;
//! let page = browser.new_page().await?;
//! page.navigate("http://localhost:3000/start").await?;
//! page.wait_for_visible("#submit-button", WaitConfig::default()).await?;
//! browser.close().await?;
//! ```
//!
//! ## Pooled Usage
//!
//! ```ignore
//! use rig_browser::{BrowserConfig, BrowserDriverFactory};
//! use rig_pool::{DriverPool, PoolConfig};
//!
//! let factory = BrowserDriverFactory::new(BrowserConfig::default());
//! let pool = DriverPool::start(factory, PoolConfig::new().isolated(true));
//!
//! let browser = pool.acquire().await?;
//! // run a scenario...
//! pool.release(browser);
//! ```
//!
//! ## Testing Strategy
//!
//! Unit tests cover configuration and error classification without a
//! browser. Integration tests in `tests/` need Chrome installed and are
//! `#[ignore]`d by default; run them with `cargo test -- --ignored`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod browser;
pub mod error;
pub mod factory;
pub mod page;
pub mod wait;

// Re-export main types for convenience
pub use browser::{Browser, BrowserConfig, LogVerbosity};
pub use error::{BrowserError, Result};
pub use factory::BrowserDriverFactory;
pub use page::Page;
pub use wait::{DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, WaitConfig};
