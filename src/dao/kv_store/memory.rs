//! In-process backend used by tests and the `memory` storage setting.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::{self, BoxFuture};

use crate::dao::{kv_store::KeyValueStore, storage::StorageResult};

/// Process-local store; contents vanish with the process.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>> {
        let value = self.entries.get(key).map(|entry| entry.value().clone());
        Box::pin(future::ready(Ok(value)))
    }

    fn put(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<()>> {
        self.entries.insert(key.to_string(), value);
        Box::pin(future::ready(Ok(())))
    }

    fn remove(&self, key: &str) -> BoxFuture<'static, StorageResult<()>> {
        self.entries.remove(key);
        Box::pin(future::ready(Ok(())))
    }

    fn keys(&self) -> BoxFuture<'static, StorageResult<Vec<String>>> {
        let keys = self
            .entries
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        Box::pin(future::ready(Ok(keys)))
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(future::ready(Ok(())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a").await.unwrap(), None);

        store.put("a", "1".into()).await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));

        store.remove("a").await.unwrap();
        store.remove("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.put("k", "v".into()).await.unwrap();
        assert_eq!(other.keys().await.unwrap(), vec!["k".to_string()]);
    }
}
