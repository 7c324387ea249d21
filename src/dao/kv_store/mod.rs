#[cfg(feature = "couch-store")]
pub mod couchdb;
pub mod file;
pub mod memory;

use futures::future::BoxFuture;

use crate::dao::storage::StorageResult;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Opaque persistent string-to-string map backing the query engine.
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`.
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>>;
    /// Insert or overwrite `key`. Returns once the write is durable for the backend.
    fn put(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<()>>;
    /// Removing a key that is not present succeeds.
    fn remove(&self, key: &str) -> BoxFuture<'static, StorageResult<()>>;
    /// Every key currently stored, in no particular order.
    fn keys(&self) -> BoxFuture<'static, StorageResult<Vec<String>>>;
    /// Cheap reachability probe.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
