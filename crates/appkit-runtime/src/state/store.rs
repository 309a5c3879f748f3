use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, trace};

use super::value::{timestamp_now, GlobalStateValue};

pub type ListenerId = u64;

type Listener = Arc<dyn Fn(&str) + Send + Sync>;

/// Broadcast to subscribers whenever a write is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    pub key: String,
}

pub struct GlobalStateStore {
    entries: RwLock<HashMap<String, GlobalStateValue>>,
    listeners: RwLock<Vec<(ListenerId, Listener)>>,
    next_listener: AtomicU64,
    changes: broadcast::Sender<StateChange>,
}

impl GlobalStateStore {
    /// `capacity` bounds how far a broadcast subscriber may lag before it
    /// starts missing changes.
    pub fn new(capacity: usize) -> Self {
        let (changes, _) = broadcast::channel(capacity.max(1));
        Self {
            entries: RwLock::new(HashMap::new()),
            listeners: RwLock::new(Vec::new()),
            next_listener: AtomicU64::new(1),
            changes,
        }
    }

    pub fn get(&self, key: &str) -> Option<GlobalStateValue> {
        self.read_entries().get(key).cloned()
    }

    /// Typed read. `Ok(None)` when the key has never been written.
    pub fn get_as<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<GlobalStateValue<T>>, serde_json::Error> {
        self.get(key).map(|value| value.decode()).transpose()
    }

    /// Read `key`, creating it with `default_data` if absent.
    pub fn get_or_init(&self, key: &str, default_data: Value) -> GlobalStateValue {
        let (value, created) = {
            let mut entries = self.write_entries();
            match entries.entry(key.to_string()) {
                Entry::Occupied(entry) => (entry.get().clone(), false),
                Entry::Vacant(entry) => (entry.insert(GlobalStateValue::now(default_data)).clone(), true),
            }
        };

        if created {
            debug!(key, "global state initialized with default");
            self.notify(key);
        }
        value
    }

    /// Last-write-wins write. Returns whether `value` was applied.
    pub fn set(&self, key: &str, value: GlobalStateValue) -> bool {
        let applied = {
            let mut entries = self.write_entries();
            match entries.entry(key.to_string()) {
                Entry::Occupied(mut entry) => {
                    if value.supersedes(entry.get()) {
                        entry.insert(value);
                        true
                    } else {
                        false
                    }
                }
                Entry::Vacant(entry) => {
                    if value.updated_at.is_finite() {
                        entry.insert(value);
                        true
                    } else {
                        false
                    }
                }
            }
        };

        if applied {
            debug!(key, "global state updated");
            self.notify(key);
        } else {
            trace!(key, "stale global state write ignored");
        }
        applied
    }

    /// Stamp `data` with the current time and write it.
    pub fn set_data<T: Serialize>(&self, key: &str, data: &T) -> Result<bool, serde_json::Error> {
        let value = GlobalStateValue::now(serde_json::to_value(data)?);
        Ok(self.set(key, value))
    }

    /// Read-modify-write of `key` under one write lock. `f` sees the current
    /// value and returns the new data, which is always applied: it is stamped
    /// now, or one microsecond past the current stamp if that lies ahead.
    ///
    /// `f` runs with the store locked and must not touch the store.
    pub fn update<F>(&self, key: &str, f: F) -> GlobalStateValue
    where
        F: FnOnce(Option<&GlobalStateValue>) -> Value,
    {
        let value = {
            let mut entries = self.write_entries();
            let current = entries.get(key);
            let data = f(current);
            let now = timestamp_now();
            let updated_at = match current {
                Some(current) if current.updated_at >= now => current.updated_at + 0.001,
                _ => now,
            };
            let value = GlobalStateValue::new(data, updated_at);
            entries.insert(key.to_string(), value.clone());
            value
        };

        debug!(key, "global state updated in place");
        self.notify(key);
        value
    }

    /// Snapshot of every entry.
    pub fn get_all(&self) -> HashMap<String, GlobalStateValue> {
        self.read_entries().clone()
    }

    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }

    /// Register a callback invoked with the key of every applied write.
    pub fn on_change<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    pub fn off_change(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.changes.subscribe()
    }

    // Called with no store lock held, so listeners may read or write the store.
    fn notify(&self, key: &str) {
        let listeners: Vec<Listener> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(key);
        }

        let _ = self.changes.send(StateChange {
            key: key.to_string(),
        });
    }

    fn read_entries(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, GlobalStateValue>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, GlobalStateValue>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for GlobalStateStore {
    fn default() -> Self {
        Self::new(256)
    }
}

impl std::fmt::Debug for GlobalStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalStateStore")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}
