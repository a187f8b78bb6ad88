//! Typed preference accessors
//!
//! What the console actually remembers: the last fetched zone list, the
//! bearer token, which zones the operator hid, and the order they pinned.

use trapline_core::Zone;

use crate::{PreferenceStore, StoreError};

const NS: &str = "console";
const KEY_ZONES: &str = "zones";
const KEY_TOKEN: &str = "token";
const KEY_HIDDEN: &str = "hidden-zones";
const KEY_ORDER: &str = "zone-order";

/// Operator preferences layered over any [`PreferenceStore`].
pub struct ConsolePrefs<S> {
    store: S,
}

impl<S: PreferenceStore> ConsolePrefs<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The zone list from the last successful fetch. A corrupt cache is
    /// reset to empty instead of failing the caller.
    pub async fn zones(&self) -> Result<Vec<Zone>, StoreError> {
        match self.store.get(NS, KEY_ZONES).await? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(zones) => Ok(zones),
                Err(_) => {
                    tracing::error!("zone cache is corrupt, resetting");
                    self.set_zones(&[]).await?;
                    Ok(Vec::new())
                }
            },
            None => Ok(Vec::new()),
        }
    }

    pub async fn set_zones(&self, zones: &[Zone]) -> Result<(), StoreError> {
        self.store
            .set(NS, KEY_ZONES, &serde_json::to_string(zones)?)
            .await
    }

    pub async fn token(&self) -> Result<Option<String>, StoreError> {
        self.store.get(NS, KEY_TOKEN).await
    }

    pub async fn set_token(&self, token: &str) -> Result<(), StoreError> {
        self.store.set(NS, KEY_TOKEN, token).await
    }

    /// Toggle a zone in the hidden set; returns whether it is hidden now.
    pub async fn toggle_hidden(&self, fqdn: &str) -> Result<bool, StoreError> {
        self.store.toggle(NS, KEY_HIDDEN, fqdn).await
    }

    pub async fn hidden_zones(&self) -> Result<Vec<String>, StoreError> {
        Ok(match self.store.get(NS, KEY_HIDDEN).await? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            None => Vec::new(),
        })
    }

    /// Explicit display order for zones. Zones not listed sort after the
    /// listed ones; consumers decide how.
    pub async fn zone_order(&self) -> Result<Vec<String>, StoreError> {
        Ok(match self.store.get(NS, KEY_ORDER).await? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            None => Vec::new(),
        })
    }

    pub async fn set_zone_order(&self, fqdns: &[String]) -> Result<(), StoreError> {
        self.store
            .set(NS, KEY_ORDER, &serde_json::to_string(fqdns)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn zone(fqdn: &str) -> Zone {
        Zone {
            fqdn: fqdn.to_string(),
            domain: "example.net".to_string(),
        }
    }

    #[tokio::test]
    async fn zone_cache_round_trips() {
        let prefs = ConsolePrefs::new(MemoryStore::new());
        assert!(prefs.zones().await.unwrap().is_empty());

        prefs.set_zones(&[zone("a.example.net")]).await.unwrap();
        let zones = prefs.zones().await.unwrap();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].fqdn, "a.example.net");
    }

    #[tokio::test]
    async fn corrupt_zone_cache_resets() {
        let store = MemoryStore::new();
        store.set("console", "zones", "][").await.unwrap();

        let prefs = ConsolePrefs::new(store);
        assert!(prefs.zones().await.unwrap().is_empty());
        // and the store itself was repaired
        assert!(prefs.zones().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn hidden_zones_toggle() {
        let prefs = ConsolePrefs::new(MemoryStore::new());
        assert!(prefs.toggle_hidden("a.example.net").await.unwrap());
        assert_eq!(prefs.hidden_zones().await.unwrap(), vec!["a.example.net"]);
        assert!(!prefs.toggle_hidden("a.example.net").await.unwrap());
        assert!(prefs.hidden_zones().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn token_and_order_persist() {
        let prefs = ConsolePrefs::new(MemoryStore::new());
        assert_eq!(prefs.token().await.unwrap(), None);
        prefs.set_token("bearer-123").await.unwrap();
        assert_eq!(prefs.token().await.unwrap(), Some("bearer-123".to_string()));

        let order = vec!["b.example.net".to_string(), "a.example.net".to_string()];
        prefs.set_zone_order(&order).await.unwrap();
        assert_eq!(prefs.zone_order().await.unwrap(), order);
    }
}
