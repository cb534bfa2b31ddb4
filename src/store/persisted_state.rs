//! In-memory state mirrored into a durable key-value slot.
//!
//! [`PersistedState`] starts from a caller-supplied default and only trusts
//! the durable slot after [`PersistedState::hydrate`] has consulted it. The
//! first mutation hydrates implicitly, so a write never lands on a slot that
//! was not read. Write failures are logged and swallowed; the in-memory value
//! stays authoritative for the session.

use std::sync::{Arc, OnceLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::watch;

use crate::store::kv_store::KeyValueStore;
use crate::types::errors::StoreError;

/// A value kept in sync with one slot of a [`KeyValueStore`].
pub struct PersistedState<T> {
    storage_key: String,
    default: T,
    store: Arc<dyn KeyValueStore>,
    persist: bool,
    value: watch::Sender<T>,
    hydrated: OnceLock<()>,
}

impl<T> PersistedState<T>
where
    T: Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(storage_key: impl Into<String>, default: T, store: Arc<dyn KeyValueStore>) -> Self {
        let (value, _) = watch::channel(default.clone());
        Self {
            storage_key: storage_key.into(),
            default,
            store,
            persist: true,
            value,
            hydrated: OnceLock::new(),
        }
    }

    /// Turns durable reads and writes on or off. With persistence off the
    /// state still hydrates (to the default) and behaves as plain memory.
    pub fn with_persistence(mut self, enabled: bool) -> Self {
        self.persist = enabled;
        self
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Whether the durable slot has been consulted at least once.
    pub fn is_hydrated(&self) -> bool {
        self.hydrated.get().is_some()
    }

    /// Loads the durable slot into memory on first call; later calls are no-ops.
    ///
    /// Returns `true` when a stored value replaced the in-memory one. A missing,
    /// unreadable or malformed slot leaves the current value in place.
    pub fn hydrate(&self) -> bool {
        let mut loaded = false;
        self.hydrated.get_or_init(|| {
            loaded = self.load();
        });
        loaded
    }

    fn load(&self) -> bool {
        if !self.persist {
            return false;
        }
        let raw = match self.store.get(&self.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!(key = %self.storage_key, error = %e, "durable store unavailable, using in-memory state");
                return false;
            }
        };
        match serde_json::from_str::<T>(&raw).map_err(|e| StoreError::Serialization(e.to_string())) {
            Ok(stored) => {
                self.value.send_if_modified(|current| {
                    let changed = *current != stored;
                    *current = stored;
                    changed
                });
                true
            }
            Err(e) => {
                tracing::warn!(key = %self.storage_key, error = %e, "ignoring malformed persisted state");
                false
            }
        }
    }

    fn write_through(&self, value: &T) {
        if !self.persist {
            return;
        }
        let result = serde_json::to_string(value)
            .map_err(|e| StoreError::Serialization(e.to_string()))
            .and_then(|json| self.store.set(&self.storage_key, &json));
        if let Err(e) = result {
            tracing::warn!(key = %self.storage_key, error = %e, "failed to persist state, keeping it in memory");
        }
    }

    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Runs `f` against the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.value.borrow())
    }

    /// Replaces the value.
    pub fn set(&self, value: T) -> bool {
        self.update(move |_| value)
    }

    /// Replaces the value with `f(previous)`.
    ///
    /// `f` runs while the value is locked, so concurrent updates fold over
    /// each other instead of overwriting. Subscribers are only notified when
    /// the value actually changed; the return value tells whether it did.
    /// An unhydrated state hydrates first, so `f` sees the stored value.
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&T) -> T,
    {
        self.hydrate();
        self.value.send_if_modified(|current| {
            let next = f(current);
            self.write_through(&next);
            if next == *current {
                return false;
            }
            *current = next;
            true
        })
    }

    /// Restores the default value and clears the durable slot.
    pub fn reset(&self) {
        self.hydrate();
        self.value.send_if_modified(|current| {
            if self.persist {
                if let Err(e) = self.store.remove(&self.storage_key) {
                    tracing::warn!(key = %self.storage_key, error = %e, "failed to clear persisted state");
                }
            }
            let changed = *current != self.default;
            *current = self.default.clone();
            changed
        });
    }

    /// Subscribes to value changes.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.value.subscribe()
    }
}
