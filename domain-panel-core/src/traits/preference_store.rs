//! Preference storage abstract Trait
//!
//! Models a key/value area shared by several independent contexts. A write made
//! by one context is announced to every *other* context, the way a browser
//! `storage` event only fires in tabs other than the writer.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::CoreResult;

/// 变更通道容量，超出后慢速订阅者会收到一次全量重同步通知
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Identity of one consumer of a shared preference area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(Uuid);

impl ContextId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A change made to the shared area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    /// Changed key; `None` means "anything may have changed, re-read".
    pub key: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    /// Context that made the change.
    pub origin: ContextId,
}

impl StorageChange {
    fn resync(origin: ContextId) -> Self {
        Self {
            key: None,
            old_value: None,
            new_value: None,
            origin,
        }
    }
}

/// Preference storage Trait
///
/// Persists small string preferences and reports changes made by other contexts.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Read a value
    ///
    /// # Arguments
    /// * `key` - Preference key
    async fn get(&self, key: &str) -> CoreResult<Option<String>>;

    /// Write a value (last write wins)
    ///
    /// # Arguments
    /// * `key` - Preference key
    /// * `value` - New value
    async fn set(&self, key: &str, value: &str) -> CoreResult<()>;

    /// Delete a value
    ///
    /// # Arguments
    /// * `key` - Preference key
    async fn remove(&self, key: &str) -> CoreResult<()>;

    /// Subscribe to changes made by other contexts.
    ///
    /// Changes made through `self` are never delivered to the returned stream.
    fn external_changes(&self) -> StorageEvents;
}

/// Fan-out of storage changes between the contexts of one area.
#[derive(Debug, Clone)]
pub struct ChangeHub {
    tx: broadcast::Sender<StorageChange>,
}

impl ChangeHub {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Announce a change. Having no listener is not an error.
    pub fn publish(&self, change: StorageChange) {
        let _ = self.tx.send(change);
    }

    /// Listen on behalf of `context`; its own changes are filtered out.
    #[must_use]
    pub fn subscribe(&self, context: ContextId) -> StorageEvents {
        StorageEvents {
            rx: self.tx.subscribe(),
            context,
        }
    }
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Stream of changes made by other contexts.
#[derive(Debug)]
pub struct StorageEvents {
    rx: broadcast::Receiver<StorageChange>,
    context: ContextId,
}

impl StorageEvents {
    /// Next external change, or `None` once every writer is gone.
    ///
    /// A listener that fell behind receives one change with `key: None`.
    pub async fn recv(&mut self) -> Option<StorageChange> {
        loop {
            match self.rx.recv().await {
                Ok(change) if change.origin == self.context => {}
                Ok(change) => return Some(change),
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!(
                        "Preference listener {} skipped {skipped} change(s), resyncing",
                        self.context
                    );
                    return Some(StorageChange::resync(self.context));
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

/// In-memory preference area
///
/// Default implementation, available on all platforms. Every context opened
/// on the same area sees the same values.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPreferences {
    values: Arc<RwLock<HashMap<String, String>>>,
    hub: ChangeHub,
}

impl InMemoryPreferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new context on this area.
    #[must_use]
    pub fn open_context(&self) -> InMemoryPreferenceStore {
        InMemoryPreferenceStore {
            area: self.clone(),
            context: ContextId::new(),
        }
    }
}

/// One context's handle on an [`InMemoryPreferences`] area.
#[derive(Debug, Clone)]
pub struct InMemoryPreferenceStore {
    area: InMemoryPreferences,
    context: ContextId,
}

impl InMemoryPreferenceStore {
    /// Create a store on a fresh, private area.
    #[must_use]
    pub fn new() -> Self {
        InMemoryPreferences::new().open_context()
    }

    #[must_use]
    pub fn context(&self) -> ContextId {
        self.context
    }

    fn announce(&self, key: &str, old_value: Option<String>, new_value: Option<String>) {
        if old_value == new_value {
            return;
        }
        self.area.hub.publish(StorageChange {
            key: Some(key.to_string()),
            old_value,
            new_value,
            origin: self.context,
        });
    }
}

impl Default for InMemoryPreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.area.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let old = self
            .area
            .values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        self.announce(key, old, Some(value.to_string()));
        Ok(())
    }

    async fn remove(&self, key: &str) -> CoreResult<()> {
        let old = self.area.values.write().await.remove(key);
        self.announce(key, old, None);
        Ok(())
    }

    fn external_changes(&self) -> StorageEvents {
        self.area.hub.subscribe(self.context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn contexts_share_values() {
        let area = InMemoryPreferences::new();
        let a = area.open_context();
        let b = area.open_context();

        a.set("inline", "1").await.unwrap();
        assert_eq!(b.get("inline").await.unwrap().as_deref(), Some("1"));

        b.remove("inline").await.unwrap();
        assert_eq!(a.get("inline").await.unwrap(), None);
    }

    #[tokio::test]
    async fn own_writes_are_not_delivered() {
        let area = InMemoryPreferences::new();
        let a = area.open_context();
        let b = area.open_context();
        let mut a_events = a.external_changes();
        let mut b_events = b.external_changes();

        a.set("inline", "1").await.unwrap();
        b.set("inline", "0").await.unwrap();

        let seen_by_b = b_events.recv().await.unwrap();
        assert_eq!(seen_by_b.key.as_deref(), Some("inline"));
        assert_eq!(seen_by_b.new_value.as_deref(), Some("1"));
        assert_eq!(seen_by_b.origin, a.context());

        let seen_by_a = a_events.recv().await.unwrap();
        assert_eq!(seen_by_a.old_value.as_deref(), Some("1"));
        assert_eq!(seen_by_a.new_value.as_deref(), Some("0"));
        assert_eq!(seen_by_a.origin, b.context());
    }

    #[tokio::test]
    async fn unchanged_value_is_silent() {
        let area = InMemoryPreferences::new();
        let a = area.open_context();
        let b = area.open_context();
        let mut events = b.external_changes();

        a.set("inline", "1").await.unwrap();
        a.set("inline", "1").await.unwrap();
        a.remove("missing").await.unwrap();
        a.set("inline", "0").await.unwrap();

        assert_eq!(events.recv().await.unwrap().new_value.as_deref(), Some("1"));
        assert_eq!(events.recv().await.unwrap().new_value.as_deref(), Some("0"));
    }

    #[tokio::test]
    async fn lagging_listener_gets_resync() {
        let area = InMemoryPreferences::new();
        let a = area.open_context();
        let b = area.open_context();
        let mut events = b.external_changes();

        for i in 0..(CHANGE_CHANNEL_CAPACITY + 10) {
            a.set("k", &i.to_string()).await.unwrap();
        }

        let first = events.recv().await.unwrap();
        assert_eq!(first.key, None);
    }

    #[tokio::test]
    async fn closed_when_area_dropped() {
        let store = InMemoryPreferenceStore::new();
        let mut events = store.external_changes();
        drop(store);
        assert_eq!(events.recv().await, None);
    }
}
