//! Session store: a small persistent key-value cache.
//!
//! SYSTEM CONTEXT
//! ==============
//! The dashboard keeps three things across runs: the last signed-in user,
//! the theme mode, and whether the navigation drawer is open. Each lives
//! under a fixed key as a JSON value, the same way a browser app would keep
//! them in `localStorage`.
//!
//! Access is synchronous. A store is owned by exactly one flow or
//! preferences object at a time (`&mut` for writes), so there is no locking.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Key holding the cached [`crate::auth::UserInfo`].
pub const USER_INFO_CACHE_KEY: &str = "USER_INFO";
/// Key holding the [`crate::prefs::ThemeMode`] preference.
pub const THEME_CACHE_KEY: &str = "THEME";
/// Key holding the drawer-open flag.
pub const DRAWER_OPEN_FLAG_CACHE_KEY: &str = "DRAWER_OPEN_FLAG";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store json failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value backend for persisted session state.
pub trait KeyValueStore {
    /// Raw value stored under `key`.
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot persist the change. The
    /// previous value is kept in that case.
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot persist the change.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Load a typed value for `key`. Missing or undecodable entries yield `None`.
pub fn load_json<T: DeserializeOwned, S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_value(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring undecodable store entry");
            None
        }
    }
}

/// Load a typed value for `key`, falling back to `default`.
pub fn load_or<T: DeserializeOwned, S: KeyValueStore + ?Sized>(store: &S, key: &str, default: T) -> T {
    load_json(store, key).unwrap_or(default)
}

/// Serialize `value` and store it under `key`.
///
/// # Errors
///
/// Returns [`StoreError`] if serialization or the backend write fails.
pub fn save_json<T: Serialize + ?Sized, S: KeyValueStore + ?Sized>(
    store: &mut S,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_value(value)?;
    store.set(key, raw)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
