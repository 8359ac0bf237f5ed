//! # JSON File Store
//!
//! Persists each key as `<dir>/<key>.json`, the desktop analogue of browser
//! local storage. Values survive process restarts.
//!
//! ## Layout
//! ```text
//! ~/.local/share/storefront/
//! └── shopping-cart.json     [{"id":1,"quantity":2}]
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::kv::{validate_key, KeyValueStore};

/// File extension of every stored value.
const EXTENSION: &str = "json";

/// Directory-backed key-value store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        info!(dir = %dir.display(), "Opened JSON file store");
        Ok(JsonFileStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds the value for `key`.
    pub fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.{}", key, EXTENSION)))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    fn set(&mut self, key: &str, value: String) -> StoreResult<()> {
        let path = self.path_for(key)?;
        debug!(path = %path.display(), bytes = value.len(), "Writing value to file");
        fs::write(&path, value).map_err(|e| StoreError::io(path, e))
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(tmp.path()).unwrap();

        assert_eq!(store.get("shopping-cart").unwrap(), None);
        store
            .set("shopping-cart", r#"[{"id":1,"quantity":2}]"#.to_string())
            .unwrap();

        let on_disk = fs::read_to_string(tmp.path().join("shopping-cart.json")).unwrap();
        assert_eq!(on_disk, r#"[{"id":1,"quantity":2}]"#);

        let reopened = JsonFileStore::open(tmp.path()).unwrap();
        assert_eq!(
            reopened.get("shopping-cart").unwrap().as_deref(),
            Some(r#"[{"id":1,"quantity":2}]"#)
        );
    }

    #[test]
    fn test_open_creates_nested_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        let store = JsonFileStore::open(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested.as_path());
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(tmp.path()).unwrap();
        store.remove("never-written").unwrap();

        store.set("k", "1".to_string()).unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(tmp.path()).unwrap();

        let err = store.set("../escape", "x".to_string()).unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey { .. }));
        assert!(store.get("").is_err());
    }
}
