//! # rig-store
//!
//! Disposable document-store support for end-to-end tests.
//!
//! Test suites that run against a managed document database need two
//! things the production client does not give them: a way to wipe a
//! collection between scenarios (managed stores rarely offer collection
//! delete, so it has to happen in batches), and a way to wait out
//! eventual consistency when asserting that a write has landed.
//!
//! ## Architecture
//!
//! - **DocumentStore**: Minimal async trait over the backing store.
//!   Production suites implement it on top of their cloud client; the
//!   store is an external collaborator, not something this crate vendors.
//! - **TestStore**: The harness layer adding batched collection
//!   deletion, typed store/retrieve, and poll-for-object waits.
//! - **MemoryStore**: In-process implementation backing this crate's own
//!   tests and useful for dry-running step definitions.
//!
//! ## Example Usage
//!
//! ```ignore
//! use rig_store::{MemoryStore, TestStore};
//! use std::time::Duration;
//!
//! let store = TestStore::new(MemoryStore::new());
//! store.store_object("cases", "c-42", &case).await?;
//!
//! // Wait out eventual consistency before asserting downstream effects.
//! let found = store.wait_for_object("events", "c-42", Duration::from_secs(5)).await?;
//! assert!(found);
//!
//! // Scenario teardown.
//! store.delete_collection("cases").await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod harness;
pub mod memory;
pub mod store;

// Re-export main types for convenience
pub use error::{Result, StoreError};
pub use harness::{DELETION_BATCH_SIZE, TestStore};
pub use memory::MemoryStore;
pub use store::DocumentStore;
