//! # Key-Value Store Trait
//!
//! The raw boundary: string keys mapping to string values, the same shape as
//! browser local storage. Typed access lives in [`crate::json`].

use crate::error::{StoreError, StoreResult};

/// Longest key a backend has to accept.
pub const MAX_KEY_LEN: usize = 128;

/// String key-value storage.
///
/// Implementations replace any prior value on `set` and treat removing a
/// missing key as success. No atomicity or versioning is promised.
pub trait KeyValueStore: Send {
    /// Reads the value under `key`, `None` if nothing was stored.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes `value` under `key`, replacing what was there.
    fn set(&mut self, key: &str, value: String) -> StoreResult<()>;

    /// Deletes the value under `key`.
    fn remove(&mut self, key: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

/// Checks that `key` is usable as a file name.
///
/// ## Rules
/// - Must not be empty or blank
/// - At most [`MAX_KEY_LEN`] bytes
/// - No path separators, no `.` / `..`
pub fn validate_key(key: &str) -> StoreResult<()> {
    if key.trim().is_empty() {
        return Err(StoreError::invalid_key(key, "must not be empty"));
    }

    if key.len() > MAX_KEY_LEN {
        return Err(StoreError::invalid_key(
            key,
            format!("must be at most {} bytes", MAX_KEY_LEN),
        ));
    }

    if key.contains(['/', '\\']) {
        return Err(StoreError::invalid_key(
            key,
            "must not contain path separators",
        ));
    }

    if key == "." || key == ".." {
        return Err(StoreError::invalid_key(key, "must not be a relative path"));
    }

    Ok(())
}
