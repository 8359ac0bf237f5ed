//! # storefront-core: Pure Cart Logic for the Storefront
//!
//! This crate holds the cart's data model and every cart transition as a
//! pure function. Nothing here touches storage or the UI.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Storefront Cart Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web UI (product grid, cart drawer)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CartHandle                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    storefront-cart                              │   │
//! │  │    CartStateManager: persist + notify after each mutation       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────────┐  ┌────────────────────┐     │   │
//! │  │   │   types   │  │     cart      │  │    validation      │     │   │
//! │  │   │ ProductId │  │  increase()   │  │  normalize_lines() │     │   │
//! │  │   │ CartLine  │  │  decrease()   │  │                    │     │   │
//! │  │   └───────────┘  └───────────────┘  └────────────────────┘     │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `ProductId` and `CartLine`
//! - [`cart`] - Pure line transitions, `CartState`, snapshots
//! - [`validation`] - Normalization of lines read back from storage
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::cart;
//! use storefront_core::ProductId;
//!
//! let id = ProductId::new(1);
//! let lines = cart::increase(&[], id);
//! let lines = cart::increase(&lines, id);
//! assert_eq!(cart::quantity_of(&lines, id), 2);
//!
//! let lines = cart::decrease(&lines, id);
//! assert_eq!(cart::total_quantity(&lines), 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartState, CartSnapshot, CartSummary};
pub use error::{CartError, CartResult};
pub use types::{CartLine, ProductId};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key the cart lines are persisted under.
///
/// Shared by the store and the state manager so a reload finds the lines
/// written by the previous session.
pub const DEFAULT_STORAGE_KEY: &str = "shopping-cart";
