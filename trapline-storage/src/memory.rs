//! In-memory preference store for tests and ephemeral sessions

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::{PreferenceStore, StoreError};

pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn storage_key(namespace: &str, key: &str) -> String {
    format!("{namespace}.{key}")
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().unwrap();
        Ok(entries.get(&storage_key(namespace, key)).cloned())
    }

    async fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().unwrap();
        entries.insert(storage_key(namespace, key), value.to_string());
        Ok(())
    }

    async fn remove(&self, namespace: &str, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().unwrap();
        entries.remove(&storage_key(namespace, key));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let store = MemoryStore::new();
        store.set("console", "token", "abc").await.unwrap();
        assert_eq!(
            store.get("console", "token").await.unwrap(),
            Some("abc".to_string())
        );

        store.remove("console", "token").await.unwrap();
        assert_eq!(store.get("console", "token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn namespaces_do_not_collide() {
        let store = MemoryStore::new();
        store.set("console", "zones", "a").await.unwrap();
        store.set("nav", "zones", "b").await.unwrap();
        assert_eq!(
            store.get("console", "zones").await.unwrap(),
            Some("a".to_string())
        );
        assert_eq!(store.get("nav", "zones").await.unwrap(), Some("b".to_string()));
    }

    #[tokio::test]
    async fn toggle_flips_membership() {
        let store = MemoryStore::new();
        assert!(store.toggle("console", "hidden", "a.example.net").await.unwrap());
        assert!(store.toggle("console", "hidden", "b.example.net").await.unwrap());
        assert!(!store.toggle("console", "hidden", "a.example.net").await.unwrap());

        let raw = store.get("console", "hidden").await.unwrap().unwrap();
        let members: Vec<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(members, vec!["b.example.net"]);
    }

    #[tokio::test]
    async fn toggle_recovers_from_a_corrupt_set() {
        let store = MemoryStore::new();
        store.set("console", "hidden", "not json").await.unwrap();
        assert!(store.toggle("console", "hidden", "a.example.net").await.unwrap());
    }
}
