//! A value mirrored into a [`KeyValueStore`] on every change.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::PopcornError;
use crate::storage::KeyValueStore;

/// In-memory value whose durable copy under `key` always matches it.
///
/// Mutations write through before returning, so a later read of the store
/// in the same process sees the latest value.
pub struct Persisted<T> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    value: T,
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned + PartialEq,
{
    /// Read the stored value under `key`, falling back to `initial` when it is
    /// missing or unreadable, then write the result back.
    pub fn load(
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        initial: T,
    ) -> Result<Self, PopcornError> {
        let key = key.into();
        let value = match store.get(&key)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(key, error = %e, "Ignoring unreadable stored value");
                    initial
                }
            },
            None => initial,
        };

        let raw = serde_json::to_string(&value)?;
        store.set(&key, &raw)?;
        Ok(Self { store, key, value })
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value. Returns `false` (and skips the write) when it is unchanged.
    pub fn set(&mut self, value: T) -> Result<bool, PopcornError> {
        if value == self.value {
            return Ok(false);
        }
        let raw = serde_json::to_string(&value)?;
        self.store.set(&self.key, &raw)?;
        self.value = value;
        Ok(true)
    }

    /// Derive the next value from the current one.
    pub fn update(&mut self, f: impl FnOnce(&T) -> T) -> Result<bool, PopcornError> {
        let next = f(&self.value);
        self.set(next)
    }
}
