use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use sentryops_branch::{DocumentStore, StoreError};

/// In-memory document store: named collections of JSON documents keyed by id.
///
/// Writes can be made to fail (`set_fail_writes`) to exercise the fail-loud
/// persistence paths.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, HashMap<String, serde_json::Value>>>,
    fail_writes: RwLock<bool>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.write().expect("store lock poisoned") = fail;
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn list(&self, collection: &str) -> Result<Vec<serde_json::Value>, StoreError> {
        Ok(self
            .collections
            .read()
            .expect("store lock poisoned")
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    // Re-inserting an id overwrites, matching the managed store's upsert.
    async fn insert(
        &self,
        collection: &str,
        id: &str,
        document: serde_json::Value,
    ) -> Result<(), StoreError> {
        if *self.fail_writes.read().expect("store lock poisoned") {
            return Err(StoreError::Write("write rejected".to_string()));
        }
        self.collections
            .write()
            .expect("store lock poisoned")
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn unknown_collection_lists_empty() {
        let store = InMemoryDocumentStore::new();
        assert!(store.list("nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_then_list_round_trips_and_overwrites_by_id() {
        let store = InMemoryDocumentStore::new();
        store.insert("rows", "a", json!({"v": 1})).await.unwrap();
        store.insert("rows", "a", json!({"v": 2})).await.unwrap();
        store.insert("rows", "b", json!({"v": 3})).await.unwrap();

        let docs = store.list("rows").await.unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs.contains(&json!({"v": 2})));
    }

    #[tokio::test]
    async fn injected_write_failure_is_reported() {
        let store = InMemoryDocumentStore::new();
        store.set_fail_writes(true);
        let err = store.insert("rows", "a", json!({})).await.unwrap_err();
        assert!(matches!(err, StoreError::Write(_)));
    }
}
