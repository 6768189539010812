//! The disposable-store harness: typed access, batched collection
//! deletion, and eventual-consistency waits.

use crate::error::{Result, StoreError};
use crate::store::DocumentStore;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::debug;

/// Documents deleted per batch when wiping a collection.
///
/// Managed stores cap both query size and write batch size; 100 sits
/// comfortably under the usual limits.
pub const DELETION_BATCH_SIZE: usize = 100;

/// Interval between existence checks while waiting for a document.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Test-suite wrapper around a [`DocumentStore`].
///
/// Adds what teardown and assertions need on top of raw document access:
/// typed store/retrieve, collection wipes, and polling waits for
/// eventually-consistent writes.
pub struct TestStore<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> TestStore<S> {
    /// Wraps a backing store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The wrapped backing store.
    pub fn backing(&self) -> &S {
        &self.store
    }

    /// Serializes and stores a document.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if `value` does not serialize, or
    /// the backend's error if the write fails.
    pub async fn store_object<T: Serialize + Sync>(
        &self,
        collection: &str,
        key: &str,
        value: &T,
    ) -> Result<()> {
        let document = serde_json::to_value(value)?;
        self.store.store(collection, key, &document).await
    }

    /// Fetches and deserializes a document, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the stored document does not
    /// deserialize to `T`, or the backend's error if the read fails.
    pub async fn retrieve_object<T: DeserializeOwned>(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<T>> {
        match self.store.retrieve(collection, key).await? {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => Ok(None),
        }
    }

    /// Deletes a single document.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the delete fails.
    pub async fn delete_object(&self, collection: &str, key: &str) -> Result<()> {
        self.store.delete(collection, key).await
    }

    /// Names of all non-empty collections.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the listing fails.
    pub async fn collection_names(&self) -> Result<Vec<String>> {
        self.store.collection_names().await
    }

    /// Finds and deserializes documents matching a field value.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if a matching document does not
    /// deserialize to `T`, or the backend's error if the query fails.
    pub async fn search<T: DeserializeOwned>(
        &self,
        collection: &str,
        field_path: &[&str],
        value: &str,
    ) -> Result<Vec<T>> {
        let documents = self.store.search(collection, field_path, value).await?;
        documents
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
            .collect()
    }

    /// Deletes every document in a collection, returning how many went.
    ///
    /// There is no native collection delete on managed document stores,
    /// so this lists and deletes in batches of [`DELETION_BATCH_SIZE`],
    /// stopping after the first short batch.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if a list or delete fails; documents
    /// already deleted stay deleted.
    pub async fn delete_collection(&self, collection: &str) -> Result<u64> {
        let mut total_deleted: u64 = 0;

        loop {
            let batch = self.store.keys(collection, DELETION_BATCH_SIZE).await?;
            let batch_size = batch.len();

            for key in batch {
                self.store.delete(collection, &key).await?;
            }

            total_deleted += batch_size as u64;
            debug!(collection, batch_size, total_deleted, "deleted batch");

            if batch_size < DELETION_BATCH_SIZE {
                break;
            }
        }

        Ok(total_deleted)
    }

    /// Waits for a document to appear, polling until `timeout` elapses.
    ///
    /// Returns true as soon as the document exists, false if the timeout
    /// expires first. Use this to absorb eventual consistency between a
    /// write and the assertions that depend on it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidArgument`] if `collection` or `key`
    /// is empty, or the backend's error if a poll fails.
    pub async fn wait_for_object(
        &self,
        collection: &str,
        key: &str,
        timeout: Duration,
    ) -> Result<bool> {
        if collection.is_empty() || key.is_empty() {
            return Err(StoreError::InvalidArgument(
                "collection and key must be provided".to_string(),
            ));
        }

        let start = Instant::now();
        loop {
            if self.store.retrieve(collection, key).await?.is_some() {
                return Ok(true);
            }

            if start.elapsed() >= timeout {
                debug!(collection, key, ?timeout, "document never appeared");
                return Ok(false);
            }

            sleep(WAIT_POLL_INTERVAL.min(timeout)).await;
        }
    }
}
