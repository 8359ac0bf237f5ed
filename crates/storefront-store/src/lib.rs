//! # storefront-store: Persistence Layer
//!
//! This crate provides the key-value boundary the cart is persisted through.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Store Layers                                         │
//! │                                                                         │
//! │  load::<T>(store, key, default)   save::<T>(store, key, &value)         │
//! │       │  (json.rs: typed, JSON text)          │                         │
//! │       ▼                                       ▼                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  trait KeyValueStore  (get / set / remove on strings)           │   │
//! │  └──────────────┬──────────────────────────────┬───────────────────┘   │
//! │                 ▼                              ▼                        │
//! │         MemoryStore                     JsonFileStore                   │
//! │   (tests, ephemeral sessions)    (<dir>/<key>.json, survives restarts)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use storefront_store::{load, save, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//! save(&mut store, "shopping-cart", &vec![1, 2, 3]).unwrap();
//!
//! let restored: Vec<i32> = load(&store, "shopping-cart", Vec::new());
//! assert_eq!(restored, vec![1, 2, 3]);
//! ```

pub mod error;
pub mod file;
pub mod json;
pub mod kv;
pub mod memory;

pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use json::{load, save, try_load};
pub use kv::{validate_key, KeyValueStore};
pub use memory::MemoryStore;
