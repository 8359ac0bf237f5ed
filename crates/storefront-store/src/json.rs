//! # Typed JSON Access
//!
//! Turns the string boundary of [`KeyValueStore`] into typed load/save.
//!
//! `load` never fails: a missing, unreadable, or unparsable value gives back
//! the caller's default, exactly like a first visit to the storefront.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::{StoreError, StoreResult};
use crate::kv::KeyValueStore;

/// Reads and parses the value under `key`.
///
/// `Ok(None)` when nothing is stored; errors for I/O and parse failures.
pub fn try_load<T, S>(store: &S, key: &str) -> StoreResult<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(text) = store.get(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| StoreError::Deserialize {
            key: key.to_string(),
            source,
        })
}

/// Reads the value under `key`, falling back to `default`.
pub fn load<T, S>(store: &S, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match try_load(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(e) => {
            warn!(key = %key, error = %e, "Discarding stored value, using default");
            default
        }
    }
}

/// Serializes `value` and writes it under `key`.
pub fn save<T, S>(store: &mut S, key: &str, value: &T) -> StoreResult<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let text = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, text)
}
