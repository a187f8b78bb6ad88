//! File-backed preference store
//!
//! A single JSON file, loaded on open and written through on every
//! mutation. Gives the console memory between runs without dragging in a
//! database.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::{PreferenceStore, StoreError};

pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, creating it lazily on first write. A file
    /// that no longer parses is treated as empty rather than fatal; the
    /// preferences in it are a cache, not a system of record.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|_| {
                tracing::warn!(path = %path.display(), "preference file is corrupt, starting over");
                HashMap::new()
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

fn storage_key(namespace: &str, key: &str) -> String {
    format!("{namespace}.{key}")
}

#[async_trait]
impl PreferenceStore for FileStore {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().unwrap();
        Ok(entries.get(&storage_key(namespace, key)).cloned())
    }

    async fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().unwrap();
        entries.insert(storage_key(namespace, key), value.to_string());
        self.persist(&entries)
    }

    async fn remove(&self, namespace: &str, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().unwrap();
        if entries.remove(&storage_key(namespace, key)).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn survives_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let store = FileStore::open(&path).unwrap();
        store.set("console", "token", "abc").await.unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("console", "token").await.unwrap(),
            Some("abc".to_string())
        );
    }

    #[tokio::test]
    async fn corrupt_files_start_over() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{{{{").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("console", "token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/prefs.json");

        let store = FileStore::open(&path).unwrap();
        store.set("console", "token", "abc").await.unwrap();
        assert!(path.exists());
    }
}
