//! Single-file backend: the whole map lives in one JSON object on disk.

use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::future::BoxFuture;
use tokio::{fs, sync::Mutex};
use tracing::{debug, info};

use crate::dao::{
    kv_store::KeyValueStore,
    storage::{StorageError, StorageResult},
};

/// Store persisting every key into a single JSON object on disk.
#[derive(Clone)]
pub struct FileStore {
    inner: Arc<Inner>,
}

struct Inner {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// A missing file yields an empty store; the file is only created on the
    /// first mutation.
    pub async fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|source| {
                StorageError::unavailable(format!("creating `{}`", parent.display()), source)
            })?;
        }

        let entries = match fs::read_to_string(&path).await {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str::<BTreeMap<String, String>>(&contents)
                .map_err(|source| {
                    StorageError::corrupt(format!("parsing `{}`", path.display()), source)
                })?,
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(StorageError::unavailable(
                    format!("reading `{}`", path.display()),
                    err,
                ));
            }
        };

        info!(path = %path.display(), keys = entries.len(), "opened file store");

        Ok(Self {
            inner: Arc::new(Inner {
                path,
                entries: Mutex::new(entries),
            }),
        })
    }

    /// Backing file location.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }
}

impl Inner {
    /// Rewrite the backing file through a temporary sibling so readers never
    /// observe a half-written map.
    async fn flush(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        let payload = serde_json::to_vec_pretty(entries)
            .map_err(|source| StorageError::corrupt("encoding store".into(), source))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, payload).await.map_err(|source| {
            StorageError::unavailable(format!("writing `{}`", tmp.display()), source)
        })?;
        fs::rename(&tmp, &self.path).await.map_err(|source| {
            StorageError::unavailable(format!("replacing `{}`", self.path.display()), source)
        })?;

        debug!(path = %self.path.display(), keys = entries.len(), "flushed file store");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>> {
        let inner = self.inner.clone();
        let key = key.to_string();
        Box::pin(async move { Ok(inner.entries.lock().await.get(&key).cloned()) })
    }

    fn put(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        let key = key.to_string();
        Box::pin(async move {
            let mut entries = inner.entries.lock().await;
            let previous = entries.insert(key.clone(), value);
            if let Err(err) = inner.flush(&entries).await {
                // Keep memory and disk in agreement when the write fails.
                match previous {
                    Some(previous) => entries.insert(key, previous),
                    None => entries.remove(&key),
                };
                return Err(err);
            }
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        let key = key.to_string();
        Box::pin(async move {
            let mut entries = inner.entries.lock().await;
            let Some(previous) = entries.remove(&key) else {
                return Ok(());
            };
            if let Err(err) = inner.flush(&entries).await {
                entries.insert(key, previous);
                return Err(err);
            }
            Ok(())
        })
    }

    fn keys(&self) -> BoxFuture<'static, StorageResult<Vec<String>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.entries.lock().await.keys().cloned().collect()) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let dir = match inner.path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            fs::metadata(&dir).await.map(|_| ()).map_err(|source| {
                StorageError::unavailable(format!("inspecting `{}`", dir.display()), source)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nested/query_file.json"))
            .await
            .unwrap();
        assert!(store.keys().await.unwrap().is_empty());
        assert!(!store.path().exists());
        store.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn contents_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query_file.json");

        let store = FileStore::open(&path).await.unwrap();
        store.put("counter", "2".into()).await.unwrap();
        store.put("team_list", "[1,2]".into()).await.unwrap();
        store.remove("team_list").await.unwrap();
        drop(store);

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(reopened.get("counter").await.unwrap().as_deref(), Some("2"));
        assert_eq!(reopened.get("team_list").await.unwrap(), None);
    }

    #[tokio::test]
    async fn failed_writes_leave_memory_and_disk_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query_file.json");

        let store = FileStore::open(&path).await.unwrap();
        store.put("counter", "1".into()).await.unwrap();
        store.put("team_list", "[1]".into()).await.unwrap();

        // A directory occupying the temporary sibling makes every flush fail.
        std::fs::create_dir(dir.path().join("query_file.json.tmp")).unwrap();

        let err = store.put("counter", "2".into()).await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable { .. }));
        assert!(store.put("game_list", "[3]".into()).await.is_err());
        assert!(store.remove("team_list").await.is_err());

        assert_eq!(store.get("counter").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("game_list").await.unwrap(), None);
        assert_eq!(store.get("team_list").await.unwrap().as_deref(), Some("[1]"));

        let reopened = FileStore::open(&path).await.unwrap();
        let mut keys = reopened.keys().await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["counter", "team_list"]);
        assert_eq!(reopened.get("counter").await.unwrap().as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn malformed_file_is_reported_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query_file.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = FileStore::open(&path).await.err().unwrap();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }
}
