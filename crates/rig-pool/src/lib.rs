//! # rig-pool
//!
//! A bounded, self-replenishing pool for expensive-to-create test drivers.
//!
//! End-to-end test suites burn a surprising amount of wall-clock time
//! launching and tearing down browser sessions. This crate keeps a small
//! buffer of ready drivers warm: a background replenishment task creates
//! drivers up to a fixed capacity, callers take the oldest ready driver,
//! and retired drivers are closed off the caller's execution path so test
//! steps never wait on teardown.
//!
//! ## Architecture
//!
//! - **DriverFactory**: Trait the pool uses to create and close drivers.
//!   The pool treats drivers as opaque; ownership transfers whole at each
//!   hand-off (pool to caller, caller to close task).
//! - **DriverPool**: Owns the bounded FIFO buffer, the single replenishment
//!   task, and the outstanding-close counter used for shutdown drain.
//! - **PoolConfig**: Capacity plus the pooling policy predicate.
//!
//! ## Example Usage
//!
//! ```ignore
//! use rig_pool::{DriverPool, PoolConfig};
//!
//! let pool = DriverPool::start(my_factory, PoolConfig::new().with_capacity(2));
//!
//! let driver = pool.acquire().await?;
//! // drive the test...
//! pool.release(driver);
//!
//! // At the end of the suite:
//! pool.shutdown().await;
//! ```
//!
//! ## Shutdown Guarantees
//!
//! `shutdown()` stops replenishment, closes every ready driver, and waits
//! (bounded, roughly ten seconds) for all asynchronous closes to finish.
//! It is best-effort: a close that hangs past the bound is logged and
//! abandoned rather than wedging the process.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod factory;
pub mod pool;

// Re-export main types for convenience
pub use config::PoolConfig;
pub use error::{CloseError, CreateError, PoolError, Result};
pub use factory::DriverFactory;
pub use pool::DriverPool;
