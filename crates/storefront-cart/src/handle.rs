//! # Shared Cart Handle
//!
//! One cart, many components. The product grid, the navigation badge, and
//! the cart drawer all hold a clone of the same [`CartHandle`].
//!
//! ## Thread Safety
//! The manager is wrapped in `Arc<Mutex<T>>`:
//! - `Arc`: every clone of the handle points at the same cart
//! - `Mutex`: mutations are applied one at a time, in dispatch order
//!
//! A poisoned lock is recovered rather than propagated.
//!
//! ## Notification Order
//! ```text
//! handle.increase(id)
//!   ├── lock manager ── mutate ── persist ── snapshot ── unlock
//!   └── call subscribers(&snapshot)      ◄── handle is free again
//! ```
//! Subscribers registered on the handle run after the lock is released, so
//! they may read or mutate the cart through any clone of the handle.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use storefront_core::{CartLine, CartSnapshot, CartSummary, ProductId};
use tokio::sync::watch;

use crate::config::CartConfig;
use crate::error::ConfigResult;
use crate::manager::{CartStateManager, SubscriptionId};

type SharedSubscriber = Arc<dyn Fn(&CartSnapshot) + Send + Sync>;

#[derive(Default)]
struct Subscribers {
    next: u64,
    entries: Vec<(SubscriptionId, SharedSubscriber)>,
}

/// Cloneable read/write handle to the session's cart.
///
/// Callbacks passed to [`CartHandle::subscribe`] run once the handle is
/// unlocked. Closures passed to [`CartHandle::with_cart`] and
/// [`CartHandle::with_cart_mut`] run with it locked and must not use the
/// handle themselves.
#[derive(Clone)]
pub struct CartHandle {
    manager: Arc<Mutex<CartStateManager>>,
    subscribers: Arc<Mutex<Subscribers>>,
}

impl CartHandle {
    pub fn new(manager: CartStateManager) -> Self {
        CartHandle {
            manager: Arc::new(Mutex::new(manager)),
            subscribers: Arc::new(Mutex::new(Subscribers::default())),
        }
    }

    /// Builds the manager from `config` and wraps it.
    pub fn from_config(config: &CartConfig) -> ConfigResult<Self> {
        CartStateManager::from_config(config).map(CartHandle::new)
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let badge = cart.with_cart(|m| m.summary());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartStateManager) -> R,
    {
        f(&self.lock())
    }

    /// Executes a function with write access to the cart.
    ///
    /// Handle subscribers are notified once afterwards with the final
    /// state, however many mutations `f` made.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CartStateManager) -> R,
    {
        let (result, changed) = {
            let mut manager = self.lock();
            let before = manager.version();
            let result = f(&mut manager);
            let changed = (manager.version() != before).then(|| manager.snapshot());
            (result, changed)
        };

        if let Some(snapshot) = changed {
            self.notify(&snapshot);
        }
        result
    }

    fn lock(&self) -> MutexGuard<'_, CartStateManager> {
        self.manager.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn subscribers(&self) -> MutexGuard<'_, Subscribers> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, snapshot: &CartSnapshot) {
        let callbacks: Vec<SharedSubscriber> = self
            .subscribers()
            .entries
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in callbacks {
            callback(snapshot);
        }
    }

    // Queries

    pub fn get_quantity(&self, id: ProductId) -> u32 {
        self.lock().get_quantity(id)
    }

    pub fn total_quantity(&self) -> u64 {
        self.lock().total_quantity()
    }

    pub fn is_open(&self) -> bool {
        self.lock().is_open()
    }

    /// Copy of the current lines.
    pub fn lines(&self) -> Vec<CartLine> {
        self.lock().lines().to_vec()
    }

    pub fn snapshot(&self) -> CartSnapshot {
        self.lock().snapshot()
    }

    pub fn summary(&self) -> CartSummary {
        self.lock().summary()
    }

    // Mutations

    pub fn open_panel(&self) {
        self.with_cart_mut(CartStateManager::open_panel);
    }

    pub fn close_panel(&self) {
        self.with_cart_mut(CartStateManager::close_panel);
    }

    pub fn toggle_panel(&self) {
        self.with_cart_mut(CartStateManager::toggle_panel);
    }

    pub fn increase(&self, id: ProductId) {
        self.with_cart_mut(|m| m.increase(id));
    }

    pub fn decrease(&self, id: ProductId) {
        self.with_cart_mut(|m| m.decrease(id));
    }

    pub fn remove(&self, id: ProductId) {
        self.with_cart_mut(|m| m.remove(id));
    }

    pub fn clear(&self) {
        self.with_cart_mut(CartStateManager::clear);
    }

    // Observers

    /// Registers `callback` to run after every mutation made through the
    /// handle, in registration order.
    ///
    /// The callback runs with the handle unlocked and may call back into it.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&CartSnapshot) + Send + Sync + 'static,
    {
        let mut subscribers = self.subscribers();
        let id = SubscriptionId(subscribers.next);
        subscribers.next += 1;
        subscribers.entries.push((id, Arc::new(callback)));
        id
    }

    /// Removes a subscriber. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers();
        let before = subscribers.entries.len();
        subscribers.entries.retain(|(sid, _)| *sid != id);
        subscribers.entries.len() != before
    }

    pub fn watch(&self) -> watch::Receiver<CartSnapshot> {
        self.lock().watch()
    }
}

impl fmt::Debug for CartHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartHandle")
            .field("manager", &*self.lock())
            .field("subscribers", &self.subscribers().entries.len())
            .finish()
    }
}
