//! # Cart Configuration
//!
//! Where and under which key the cart is persisted.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`STOREFRONT_*`)
//! 2. Builder calls in code
//! 3. Defaults (this file)
//!
//! ## Environment Variables
//! - `STOREFRONT_CART_KEY`: storage key (default `shopping-cart`)
//! - `STOREFRONT_DATA_DIR`: directory of the JSON file store
//! - `STOREFRONT_CART_PERSIST`: `true`/`false`/`1`/`0`; `false` keeps the
//!   cart in memory only

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use storefront_core::DEFAULT_STORAGE_KEY;
use storefront_store::{validate_key, JsonFileStore, KeyValueStore, MemoryStore};
use tracing::info;

use crate::error::{ConfigError, ConfigResult};

pub const ENV_CART_KEY: &str = "STOREFRONT_CART_KEY";
pub const ENV_DATA_DIR: &str = "STOREFRONT_DATA_DIR";
pub const ENV_PERSIST: &str = "STOREFRONT_CART_PERSIST";

/// Fallback data directory when the platform has no home directory.
const FALLBACK_DATA_DIR: &str = ".storefront";

/// Cart persistence configuration.
///
/// Also readable from a JSON settings file; missing fields take their
/// defaults, so `{"storageKey": "kiosk-cart"}` is a complete config.
///
/// ## Example
/// ```rust,ignore
/// let config = CartConfig::default()
///     .storage_key("guest-cart")
///     .data_dir("./data");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CartConfig {
    /// Key the lines are stored under.
    pub storage_key: String,

    /// Directory of the JSON file store.
    ///
    /// ## Platform-Specific Defaults
    /// - **Linux**: `~/.local/share/storefront`
    /// - **macOS**: `~/Library/Application Support/com.storefront.storefront`
    /// - **Windows**: `%APPDATA%\storefront\storefront\data`
    pub data_dir: PathBuf,

    /// Whether the cart outlives the session.
    pub persist: bool,
}

impl Default for CartConfig {
    fn default() -> Self {
        CartConfig {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: default_data_dir(),
            persist: true,
        }
    }
}

impl CartConfig {
    /// Builds a configuration from the process environment and defaults.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from any variable lookup.
    ///
    /// `from_env` passes `std::env::var`; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = CartConfig::default();

        if let Some(key) = lookup(ENV_CART_KEY) {
            validate_key(&key)
                .map_err(|e| ConfigError::invalid(ENV_CART_KEY, &key, e.to_string()))?;
            config.storage_key = key;
        }

        if let Some(dir) = lookup(ENV_DATA_DIR) {
            if dir.trim().is_empty() {
                return Err(ConfigError::invalid(ENV_DATA_DIR, &dir, "must not be empty"));
            }
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(flag) = lookup(ENV_PERSIST) {
            config.persist = parse_flag(&flag).ok_or_else(|| {
                ConfigError::invalid(ENV_PERSIST, &flag, "expected true or false")
            })?;
        }

        Ok(config)
    }

    /// Sets the storage key.
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Sets the data directory.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Sets whether the cart is persisted.
    pub fn persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Opens the store this configuration points at.
    ///
    /// A JSON file store under `data_dir`, or a fresh in-memory store when
    /// persistence is off.
    pub fn open_store(&self) -> ConfigResult<Box<dyn KeyValueStore>> {
        validate_key(&self.storage_key)?;

        if !self.persist {
            info!("Cart persistence disabled, using in-memory store");
            return Ok(Box::new(MemoryStore::new()));
        }

        Ok(Box::new(JsonFileStore::open(&self.data_dir)?))
    }
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "storefront", "storefront")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
