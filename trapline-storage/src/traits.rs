//! The storage trait all preference backends implement

use async_trait::async_trait;

use crate::StoreError;

/// A namespaced key-value store for operator preferences.
///
/// Values are opaque strings; the typed layer above decides what they
/// mean. `namespace` and `key` together address an entry, so unrelated
/// consumers can share a backend without colliding.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Read the value stored under `namespace`/`key`.
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `namespace`/`key`, replacing any previous value.
    async fn set(&self, namespace: &str, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove the entry under `namespace`/`key`, if any.
    async fn remove(&self, namespace: &str, key: &str) -> Result<(), StoreError>;

    /// Toggle `member` in the string set stored under `namespace`/`key`
    /// and return whether it is present afterwards. A missing or corrupt
    /// set starts over empty.
    async fn toggle(&self, namespace: &str, key: &str, member: &str) -> Result<bool, StoreError> {
        let mut members: Vec<String> = match self.get(namespace, key).await? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            None => Vec::new(),
        };

        let present = match members.iter().position(|m| m == member) {
            Some(index) => {
                members.remove(index);
                false
            }
            None => {
                members.push(member.to_string());
                true
            }
        };

        self.set(namespace, key, &serde_json::to_string(&members)?)
            .await?;
        Ok(present)
    }
}
