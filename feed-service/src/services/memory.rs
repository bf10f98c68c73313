//! In-process document store for local development and tests.

use super::store::{validate_key, DocumentStore, StoreError};
use crate::models::Document;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

type CollectionMap = HashMap<String, Map<String, Value>>;

/// Cloneable handle; clones share the same collections and counters.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, CollectionMap>>>,
    fetches: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `fields` under `id`, replacing any previous document. Non-object
    /// values are stored as an empty document.
    pub async fn insert(&self, collection: &str, id: &str, fields: Value) {
        let fields = match fields {
            Value::Object(map) => map,
            other => {
                tracing::warn!(
                    collection = %collection,
                    id = %id,
                    "Ignoring non-object document body: {}",
                    other
                );
                Map::new()
            }
        };

        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
    }

    /// Simulate a backend outage; every call fails with `Unavailable` while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `get_document` calls served so far, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "in-memory store is marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_document(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.ensure_available()?;
        validate_key(collection, id)?;

        let collections = self.collections.read().await;
        let fields = collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned()
            .ok_or_else(|| {
                tracing::warn!(collection = %collection, id = %id, "Document not found");
                StoreError::not_found(collection, id)
            })?;

        Ok(Document::from_store(id, fields))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.ensure_available()
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
