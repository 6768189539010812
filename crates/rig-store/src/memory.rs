//! In-process document store.
//!
//! Backs the harness tests and local dry runs. Collections are ordered
//! maps so key listings are deterministic, which keeps the batched
//! deletion loop honest (deleted keys cannot reappear in a later batch).

use crate::error::Result;
use crate::store::DocumentStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::BTreeMap;

type Collections = BTreeMap<String, BTreeMap<String, Value>>;

/// An in-memory [`DocumentStore`].
///
/// Thread-safe and cheap; every operation takes a short lock. Empty
/// collections disappear, matching how managed document stores report
/// collection names.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<Collections>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of documents across all collections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.collections.lock().values().map(BTreeMap::len).sum()
    }

    /// True when no documents exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn store(&self, collection: &str, key: &str, document: &Value) -> Result<()> {
        self.collections
            .lock()
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), document.clone());
        Ok(())
    }

    async fn retrieve(&self, collection: &str, key: &str) -> Result<Option<Value>> {
        Ok(self
            .collections
            .lock()
            .get(collection)
            .and_then(|docs| docs.get(key))
            .cloned())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<()> {
        let mut collections = self.collections.lock();
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(key);
            if docs.is_empty() {
                collections.remove(collection);
            }
        }
        Ok(())
    }

    async fn keys(&self, collection: &str, limit: usize) -> Result<Vec<String>> {
        Ok(self
            .collections
            .lock()
            .get(collection)
            .map(|docs| docs.keys().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn collection_names(&self) -> Result<Vec<String>> {
        Ok(self.collections.lock().keys().cloned().collect())
    }

    async fn search(
        &self,
        collection: &str,
        field_path: &[&str],
        value: &str,
    ) -> Result<Vec<Value>> {
        Ok(self
            .collections
            .lock()
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| field_matches(doc, field_path, value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Walks `field_path` into a document and compares the leaf against
/// `value`. Strings compare directly; other scalars compare by their
/// JSON rendering, so `"42"` matches the number 42.
fn field_matches(document: &Value, field_path: &[&str], value: &str) -> bool {
    let mut current = document;
    for segment in field_path {
        match current.get(segment) {
            Some(next) => current = next,
            None => return false,
        }
    }

    match current.as_str() {
        Some(s) => s == value,
        None => current.to_string() == value,
    }
}
