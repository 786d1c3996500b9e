use std::collections::HashMap;
use std::sync::RwLock;

use sentryops_core::KvStore;

/// In-memory key-value storage.
///
/// Stands in for browser local storage. Not persisted across processes.
#[derive(Debug, Default)]
pub struct InMemoryKv {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for InMemoryKv {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().expect("kv lock poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .write()
            .expect("kv lock poisoned")
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.write().expect("kv lock poisoned").remove(key);
    }
}
