//! The seam between the harness and the backing document store.
//!
//! Documents cross this boundary as `serde_json::Value` so the trait
//! stays object-safe; the typed conveniences live on `TestStore`.

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// An async document store organized as named collections of keyed
/// JSON documents.
///
/// Implementations wrap whatever the suite runs against: a managed
/// cloud document database in CI, or [`crate::MemoryStore`] locally.
/// All operations are keyed by collection name and document key;
/// neither may be empty.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores (or overwrites) a document.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the write fails.
    async fn store(&self, collection: &str, key: &str, document: &Value) -> Result<()>;

    /// Fetches a document, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the read fails.
    async fn retrieve(&self, collection: &str, key: &str) -> Result<Option<Value>>;

    /// Deletes a document. Deleting an absent document is not an error.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the delete fails.
    async fn delete(&self, collection: &str, key: &str) -> Result<()>;

    /// Lists up to `limit` document keys from a collection.
    ///
    /// This exists for batched deletion; no ordering is guaranteed
    /// beyond being stable enough that deleted keys stop appearing.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the listing fails.
    async fn keys(&self, collection: &str, limit: usize) -> Result<Vec<String>>;

    /// Names of all non-empty collections.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the listing fails.
    async fn collection_names(&self) -> Result<Vec<String>>;

    /// Finds documents whose field at `field_path` equals `value`.
    ///
    /// `field_path` addresses nested fields outside-in, e.g.
    /// `["contact", "postcode"]`.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the query fails.
    async fn search(&self, collection: &str, field_path: &[&str], value: &str)
    -> Result<Vec<Value>>;
}
