//! # Cart State Manager
//!
//! Owns the in-memory cart and keeps the store and the UI in step with it.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Mutation Flow                                   │
//! │                                                                         │
//! │  UI Action              Manager                    Side Effects         │
//! │  ─────────              ───────                    ────────────         │
//! │                                                                         │
//! │  "+" button ──────────► increase(id) ─┐                                 │
//! │  "-" button ──────────► decrease(id) ─┤                                 │
//! │  "Remove" ────────────► remove(id) ───┤                                 │
//! │  "Empty cart" ────────► clear() ──────┤                                 │
//! │                                       ▼                                 │
//! │                    lines = cart::<op>(&lines, id)   (pure)              │
//! │                                       │                                 │
//! │                                       ├──► save(store, key, &lines)     │
//! │                                       │                                 │
//! │                                       └──► subscribers(&snapshot)       │
//! │                                            watch channel                │
//! │                                                                         │
//! │  Cart icon ───────────► open_panel() / close_panel()                    │
//! │                         (notify on change, never persisted)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Policy
//! A failed save is logged and otherwise ignored: the shopper keeps the cart
//! they see, it just may not survive a reload.

use std::fmt;

use storefront_core::cart;
use storefront_core::validation::normalize_lines;
use storefront_core::{
    CartLine, CartSnapshot, CartState, CartSummary, ProductId, DEFAULT_STORAGE_KEY,
};
use storefront_store::{load, save, KeyValueStore};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::CartConfig;
use crate::error::ConfigResult;

/// Callback invoked with the new cart after every mutation.
pub type Subscriber = Box<dyn Fn(&CartSnapshot) + Send>;

/// Token returned by [`CartStateManager::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// The cart for one storefront session.
pub struct CartStateManager {
    state: CartState,
    store: Box<dyn KeyValueStore>,
    storage_key: String,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
    snapshots: watch::Sender<CartSnapshot>,
    version: u64,
}

impl CartStateManager {
    /// Loads the cart stored under the default key.
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self::with_key(Box::new(store), DEFAULT_STORAGE_KEY)
    }

    /// Loads the cart stored under `storage_key`.
    ///
    /// Missing or unparsable data gives an empty cart. Lines that break the
    /// cart invariants are repaired.
    pub fn with_key(store: Box<dyn KeyValueStore>, storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();

        let raw: Vec<CartLine> = load(store.as_ref(), &storage_key, Vec::new());
        let normalized = normalize_lines(raw);
        if !normalized.is_clean() {
            warn!(
                key = %storage_key,
                dropped = normalized.dropped,
                merged = normalized.merged,
                "Repaired stored cart lines"
            );
        }

        let state = CartState::new(normalized.lines);
        info!(
            key = %storage_key,
            items = state.item_count(),
            total_quantity = state.total_quantity(),
            "Loaded cart"
        );

        let (snapshots, _) = watch::channel(state.snapshot());

        CartStateManager {
            state,
            store,
            storage_key,
            subscribers: Vec::new(),
            next_subscription: 0,
            snapshots,
            version: 0,
        }
    }

    /// Opens the configured store and loads the cart from it.
    pub fn from_config(config: &CartConfig) -> ConfigResult<Self> {
        let store = config.open_store()?;
        Ok(Self::with_key(store, config.storage_key.clone()))
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Quantity of `id` in the cart, 0 if absent.
    pub fn get_quantity(&self, id: ProductId) -> u32 {
        self.state.get_quantity(id)
    }

    /// Sum of all line quantities; drives the cart badge.
    pub fn total_quantity(&self) -> u64 {
        self.state.total_quantity()
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Lines in insertion order, for rendering the cart panel.
    pub fn lines(&self) -> &[CartLine] {
        self.state.lines()
    }

    pub fn item_count(&self) -> usize {
        self.state.item_count()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn snapshot(&self) -> CartSnapshot {
        self.state.snapshot()
    }

    pub fn summary(&self) -> CartSummary {
        self.state.summary()
    }

    /// Number of change notifications sent so far.
    ///
    /// Bumped once per mutation that notifies subscribers; an unchanged
    /// panel toggle leaves it alone.
    pub fn version(&self) -> u64 {
        self.version
    }

    // =========================================================================
    // Panel
    // =========================================================================

    pub fn open_panel(&mut self) {
        self.set_panel(true);
    }

    pub fn close_panel(&mut self) {
        self.set_panel(false);
    }

    pub fn toggle_panel(&mut self) {
        let open = !self.state.is_open();
        self.set_panel(open);
    }

    fn set_panel(&mut self, open: bool) {
        if self.state.is_open() == open {
            return;
        }
        debug!(open, "Cart panel visibility changed");
        self.state.set_panel_open(open);
        self.notify();
    }

    // =========================================================================
    // Line Mutations
    // =========================================================================

    /// Adds one unit of `id`, inserting a line if needed.
    pub fn increase(&mut self, id: ProductId) {
        let lines = cart::increase(self.state.lines(), id);
        self.commit(lines);
        debug!(product_id = %id, quantity = self.get_quantity(id), "Increased cart quantity");
    }

    /// Removes one unit of `id`; the line goes away at zero.
    ///
    /// A product that is not in the cart is left alone.
    pub fn decrease(&mut self, id: ProductId) {
        let lines = cart::decrease(self.state.lines(), id);
        self.commit(lines);
        debug!(product_id = %id, quantity = self.get_quantity(id), "Decreased cart quantity");
    }

    /// Drops the line for `id`.
    pub fn remove(&mut self, id: ProductId) {
        let lines = cart::remove(self.state.lines(), id);
        self.commit(lines);
        debug!(product_id = %id, "Removed product from cart");
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.commit(Vec::new());
        debug!("Cleared cart");
    }

    fn commit(&mut self, lines: Vec<CartLine>) {
        self.state.replace_lines(lines);
        self.persist();
        self.notify();
    }

    fn persist(&mut self) {
        if let Err(e) = save(self.store.as_mut(), &self.storage_key, self.state.lines()) {
            warn!(key = %self.storage_key, error = %e, "Failed to persist cart");
        }
    }

    // =========================================================================
    // Subscribers
    // =========================================================================

    /// Registers `callback` to run after every mutation.
    ///
    /// Callbacks run synchronously in registration order, before the
    /// mutating call returns. Behind a [`crate::CartHandle`] they would run
    /// with the handle locked; use [`crate::CartHandle::subscribe`] there.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&CartSnapshot) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a subscriber. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Receiver that always holds the latest snapshot.
    pub fn watch(&self) -> watch::Receiver<CartSnapshot> {
        self.snapshots.subscribe()
    }

    fn notify(&mut self) {
        self.version += 1;
        let snapshot = self.state.snapshot();
        for (_, callback) in &self.subscribers {
            callback(&snapshot);
        }
        self.snapshots.send_replace(snapshot);
    }
}

impl fmt::Debug for CartStateManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStateManager")
            .field("state", &self.state)
            .field("storage_key", &self.storage_key)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use storefront_store::{MemoryStore, StoreError, StoreResult};

    const KEY: &str = "shopping-cart";

    fn id(raw: i64) -> ProductId {
        ProductId::new(raw)
    }

    fn line(raw: i64, quantity: u32) -> CartLine {
        CartLine {
            id: id(raw),
            quantity,
        }
    }

    /// Store that records every write so tests can count saves.
    #[derive(Clone, Default)]
    struct RecordingStore {
        inner: MemoryStore,
        writes: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingStore {
        fn writes(&self) -> Vec<String> {
            self.writes.lock().unwrap().clone()
        }
    }

    impl KeyValueStore for RecordingStore {
        fn get(&self, key: &str) -> StoreResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: String) -> StoreResult<()> {
            self.writes.lock().unwrap().push(value.clone());
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> StoreResult<()> {
            self.inner.remove(key)
        }
    }

    /// Store whose writes always fail.
    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> StoreResult<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, key: &str, _value: String) -> StoreResult<()> {
            Err(StoreError::InvalidKey {
                key: key.to_string(),
                reason: "read-only".to_string(),
            })
        }

        fn remove(&mut self, _key: &str) -> StoreResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_absent_product_has_zero_quantity() {
        let cart = CartStateManager::new(MemoryStore::new());
        assert_eq!(cart.get_quantity(id(1)), 0);
        assert_eq!(cart.get_quantity(id(-5)), 0);
        assert_eq!(cart.total_quantity(), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_increase_decrease_scenario() {
        let mut cart = CartStateManager::new(MemoryStore::new());

        cart.increase(id(1));
        assert_eq!(cart.lines(), &[line(1, 1)]);
        assert_eq!(cart.total_quantity(), 1);

        cart.increase(id(1));
        assert_eq!(cart.lines(), &[line(1, 2)]);
        assert_eq!(cart.total_quantity(), 2);

        cart.decrease(id(1));
        assert_eq!(cart.lines(), &[line(1, 1)]);
        assert_eq!(cart.total_quantity(), 1);

        cart.decrease(id(1));
        assert!(cart.lines().is_empty());
        assert_eq!(cart.total_quantity(), 0);
    }

    #[test]
    fn test_decrease_absent_leaves_state_unchanged() {
        let mut cart = CartStateManager::new(MemoryStore::new());
        cart.increase(id(2));
        let before = cart.snapshot();

        cart.decrease(id(3));
        assert_eq!(cart.snapshot(), before);
    }

    #[test]
    fn test_remove_regardless_of_quantity() {
        let mut cart = CartStateManager::new(MemoryStore::new());
        for _ in 0..5 {
            cart.increase(id(7));
        }
        cart.increase(id(8));

        cart.remove(id(7));
        assert_eq!(cart.get_quantity(id(7)), 0);
        assert_eq!(cart.lines(), &[line(8, 1)]);

        cart.remove(id(7));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_total_is_sum_after_every_mutation() {
        let mut cart = CartStateManager::new(MemoryStore::new());
        let ops: [(char, i64); 9] = [
            ('+', 1),
            ('+', 2),
            ('+', 1),
            ('-', 2),
            ('+', 3),
            ('r', 1),
            ('-', 9),
            ('+', 3),
            ('-', 3),
        ];

        for (op, raw) in ops {
            match op {
                '+' => cart.increase(id(raw)),
                '-' => cart.decrease(id(raw)),
                _ => cart.remove(id(raw)),
            }
            let sum: u64 = cart.lines().iter().map(|l| u64::from(l.quantity)).sum();
            assert_eq!(cart.total_quantity(), sum);
            assert!(cart.lines().iter().all(|l| l.quantity >= 1));
        }
        assert_eq!(cart.lines(), &[line(3, 1)]);
    }

    #[test]
    fn test_panel_open_close() {
        let mut cart = CartStateManager::new(MemoryStore::new());
        assert!(!cart.is_open());

        cart.open_panel();
        cart.open_panel();
        assert!(cart.is_open());

        cart.close_panel();
        assert!(!cart.is_open());

        cart.toggle_panel();
        assert!(cart.summary().panel_open);
    }

    #[test]
    fn test_every_line_mutation_is_persisted() {
        let store = RecordingStore::default();
        let mut cart = CartStateManager::new(store.clone());

        cart.increase(id(1));
        cart.increase(id(1));
        cart.decrease(id(4));
        cart.remove(id(1));
        cart.open_panel();

        let writes = store.writes();
        assert_eq!(
            writes,
            vec![
                r#"[{"id":1,"quantity":1}]"#.to_string(),
                r#"[{"id":1,"quantity":2}]"#.to_string(),
                r#"[{"id":1,"quantity":2}]"#.to_string(),
                "[]".to_string(),
            ]
        );
    }

    #[test]
    fn test_state_survives_reload() {
        let store = MemoryStore::new();
        {
            let mut cart = CartStateManager::new(store.clone());
            cart.increase(id(10));
            cart.increase(id(20));
            cart.increase(id(20));
            cart.open_panel();
        }

        let reloaded = CartStateManager::new(store);
        assert_eq!(reloaded.lines(), &[line(10, 1), line(20, 2)]);
        assert_eq!(reloaded.total_quantity(), 3);
        assert!(!reloaded.is_open());
    }

    #[test]
    fn test_malformed_store_gives_empty_cart() {
        let store = MemoryStore::with_entry(KEY, "not json at all");
        let mut cart = CartStateManager::new(store.clone());
        assert!(cart.is_empty());

        cart.increase(id(1));
        assert_eq!(store.raw(KEY).as_deref(), Some(r#"[{"id":1,"quantity":1}]"#));
    }

    #[test]
    fn test_stored_lines_are_repaired() {
        let store = MemoryStore::with_entry(
            KEY,
            r#"[{"id":1,"quantity":0},{"id":2,"quantity":1},{"id":2,"quantity":4}]"#,
        );
        let cart = CartStateManager::new(store);
        assert_eq!(cart.lines(), &[line(2, 5)]);
    }

    #[test]
    fn test_custom_key() {
        let store = MemoryStore::new();
        let mut cart = CartStateManager::with_key(Box::new(store.clone()), "guest-cart");
        cart.increase(id(1));

        assert_eq!(cart.storage_key(), "guest-cart");
        assert!(store.raw("guest-cart").is_some());
        assert!(store.raw(KEY).is_none());
    }

    #[test]
    fn test_failed_save_keeps_memory_state() {
        let mut cart = CartStateManager::new(FailingStore);
        cart.increase(id(1));
        cart.increase(id(1));
        assert_eq!(cart.get_quantity(id(1)), 2);
    }

    #[test]
    fn test_subscribers_notified_in_order() {
        let mut cart = CartStateManager::new(MemoryStore::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&seen);
        cart.subscribe(move |s| first.lock().unwrap().push(("first", s.total_quantity)));
        let second = Arc::clone(&seen);
        let second_id =
            cart.subscribe(move |s| second.lock().unwrap().push(("second", s.total_quantity)));

        cart.increase(id(1));
        assert!(cart.unsubscribe(second_id));
        assert!(!cart.unsubscribe(second_id));
        cart.increase(id(1));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![("first", 1), ("second", 1), ("first", 2)]
        );
    }

    #[test]
    fn test_panel_notifies_only_on_change() {
        let mut cart = CartStateManager::new(MemoryStore::new());
        let count = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&count);
        cart.subscribe(move |_| *counter.lock().unwrap() += 1);

        cart.open_panel();
        cart.open_panel();
        cart.close_panel();
        cart.close_panel();

        assert_eq!(*count.lock().unwrap(), 2);
    }

    #[test]
    fn test_version_counts_notifications() {
        let mut cart = CartStateManager::new(MemoryStore::new());
        assert_eq!(cart.version(), 0);

        cart.increase(id(1));
        cart.decrease(id(2));
        assert_eq!(cart.version(), 2);

        cart.close_panel();
        assert_eq!(cart.version(), 2);
        cart.open_panel();
        assert_eq!(cart.version(), 3);
    }

    #[test]
    fn test_clear() {
        let store = MemoryStore::new();
        let mut cart = CartStateManager::new(store.clone());
        cart.increase(id(1));
        cart.increase(id(2));

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(store.raw(KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn test_from_config() {
        let tmp = tempfile::tempdir().unwrap();
        let config = CartConfig::default().data_dir(tmp.path());

        {
            let mut cart = CartStateManager::from_config(&config).unwrap();
            cart.increase(id(42));
        }

        let cart = CartStateManager::from_config(&config).unwrap();
        assert_eq!(cart.get_quantity(id(42)), 1);
    }

    #[tokio::test]
    async fn test_watch_sees_latest_snapshot() {
        let mut cart = CartStateManager::new(MemoryStore::new());
        let mut rx = cart.watch();
        assert_eq!(rx.borrow().total_quantity, 0);

        cart.increase(id(3));
        cart.increase(id(3));
        rx.changed().await.unwrap();

        let latest = rx.borrow_and_update().clone();
        assert_eq!(latest.lines, vec![line(3, 2)]);
        assert_eq!(latest.total_quantity, 2);
    }
}
