//! # storefront-cart: Cart State for the Storefront UI
//!
//! The state container UI components share. It tracks which products are
//! in the cart, how many of each, and whether the cart panel is open, and
//! writes the lines through a key-value store so they survive a reload.
//!
//! ## Application Wiring
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session Start                                    │
//! │                                                                         │
//! │  init_tracing() ──► CartConfig::from_env() ──► CartHandle::from_config()│
//! │                                                      │                  │
//! │                         ┌────────────────────────────┼──────────┐       │
//! │                         ▼                            ▼          ▼       │
//! │                   Product grid                  Nav badge   Cart drawer │
//! │                   increase/decrease             summary()   lines()     │
//! │                                                 subscribe() close_panel │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use storefront_cart::{CartHandle, CartStateManager};
//! use storefront_core::ProductId;
//! use storefront_store::MemoryStore;
//!
//! let cart = CartHandle::new(CartStateManager::new(MemoryStore::new()));
//! let shirt = ProductId::new(1);
//!
//! cart.increase(shirt);
//! cart.increase(shirt);
//! cart.decrease(shirt);
//!
//! assert_eq!(cart.get_quantity(shirt), 1);
//! assert_eq!(cart.total_quantity(), 1);
//! ```

pub mod config;
pub mod error;
pub mod handle;
pub mod manager;

pub use config::CartConfig;
pub use error::{ConfigError, ConfigResult};
pub use handle::CartHandle;
pub use manager::{CartStateManager, Subscriber, SubscriptionId};

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=storefront_cart=trace` - Trace for the cart crate only
/// - Default: INFO, DEBUG for the storefront crates
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,storefront_cart=debug,storefront_store=debug")
    });

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::ProductId;
    use storefront_store::MemoryStore;

    #[test]
    fn test_init_tracing_twice() {
        init_tracing();
        init_tracing();

        let cart = CartHandle::new(CartStateManager::new(MemoryStore::new()));
        cart.increase(ProductId::new(1));
        assert_eq!(cart.total_quantity(), 1);
    }
}
