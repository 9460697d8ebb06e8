//! # Key-Value Backends
//!
//! String-keyed, string-valued storage in the shape of browser local storage.
//!
//! ## Backends
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       KeyValueStore trait                               │
//! │              get_item(key) -> Option<String>                            │
//! │              set_item(key, value)                                       │
//! │                      │                                                  │
//! │         ┌────────────┴─────────────┐                                    │
//! │         ▼                          ▼                                    │
//! │  MemoryKeyValueStore        FileKeyValueStore                           │
//! │  HashMap behind a Mutex     <data_dir>/<key>.json                       │
//! │  (tests, CLI dry runs)      (durable, one file per key)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Neither backend offers compare-and-swap: a read followed by a write is
//! two independent operations, so concurrent read-modify-write cycles can
//! overwrite each other.

use std::collections::HashMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Minimal local-storage style interface.
pub trait KeyValueStore {
    /// Returns the stored value, or `None` if the key was never written.
    fn get_item(&self, key: &str) -> impl Future<Output = StoreResult<Option<String>>> + Send;

    /// Replaces the value stored under `key`.
    fn set_item(&self, key: &str, value: String) -> impl Future<Output = StoreResult<()>> + Send;
}

// =============================================================================
// In-Memory Backend
// =============================================================================

/// In-process store. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    async fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.items.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> StoreResult<()> {
        self.items.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}

// =============================================================================
// File Backend
// =============================================================================

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a uniquely named temporary sibling first and are renamed into
/// place, so a reader sees either the old or the new blob and concurrent
/// writers never share a temporary file.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileKeyValueStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

/// Keys must be non-empty ASCII letters, digits, `-`, `_` or `.`, and must
/// not start with `.`. Every key is then also a safe file name.
pub fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        && !key.starts_with('.');
    if !valid {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

impl KeyValueStore for FileKeyValueStore {
    async fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(?path, "No stored value");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn set_item(&self, key: &str, value: String) -> StoreResult<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let tmp = path.with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()));
        tokio::fs::write(&tmp, value.as_bytes()).await?;
        if let Err(err) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err.into());
        }

        debug!(?path, bytes = value.len(), "Stored value");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get_item("orders").await.unwrap(), None);

        store.set_item("orders", "[]".to_string()).await.unwrap();
        assert_eq!(store.get_item("orders").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_state() {
        let a = MemoryKeyValueStore::new();
        let b = a.clone();
        a.set_item("k", "v".to_string()).await.unwrap();
        assert_eq!(b.get_item("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_file_store_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("not-created-yet"));
        assert_eq!(store.get_item("orders").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");

        FileKeyValueStore::new(&data_dir)
            .set_item("orders", "[1]".to_string())
            .await
            .unwrap();
        FileKeyValueStore::new(&data_dir)
            .set_item("orders", "[1,2]".to_string())
            .await
            .unwrap();

        let reopened = FileKeyValueStore::new(&data_dir);
        assert_eq!(
            reopened.get_item("orders").await.unwrap().as_deref(),
            Some("[1,2]")
        );
        assert_eq!(file_names(&data_dir), vec!["orders.json"]);
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_last_one_wins_without_errors() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_path_buf();

        let writers: Vec<_> = (0..16)
            .map(|n| {
                let store = FileKeyValueStore::new(&data_dir);
                tokio::spawn(async move { store.set_item("orders", format!("[{n}]")).await })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap().unwrap();
        }

        let stored = FileKeyValueStore::new(&data_dir)
            .get_item("orders")
            .await
            .unwrap()
            .unwrap();
        let value: Vec<u32> = serde_json::from_str(&stored).unwrap();
        assert_eq!(value.len(), 1);
        assert_eq!(file_names(&data_dir), vec!["orders.json"]);
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let store = FileKeyValueStore::new("/tmp/storefront");
        assert!(store.path_for("orders").is_ok());
        assert!(store.path_for("orders-v2").is_ok());

        assert!(matches!(store.path_for(""), Err(StoreError::InvalidKey(_))));
        assert!(store.path_for("../orders").is_err());
        assert!(store.path_for("a/b").is_err());
        assert!(store.path_for(".hidden").is_err());
        assert!(store.path_for(" orders").is_err());
        assert!(store.path_for("a b").is_err());
    }
}
