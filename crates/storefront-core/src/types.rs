//! # Domain Types
//!
//! The two value types every other layer is built from.
//!
//! ## Persisted Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  key "shopping-cart"                                                    │
//! │                                                                         │
//! │  [                                                                      │
//! │    { "id": 3, "quantity": 2 },      ◄── CartLine                        │
//! │    { "id": 7, "quantity": 1 }                                           │
//! │  ]                                                                      │
//! │                                                                         │
//! │  `id` is a bare JSON number (ProductId is serde-transparent)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CartError;

// =============================================================================
// Product Id
// =============================================================================

/// Identifier of a product in the storefront catalog.
///
/// Any integer is accepted, including negative ones; the catalog owns the
/// meaning of ids and the cart does not second-guess it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    #[inline]
    pub const fn new(id: i64) -> Self {
        ProductId(id)
    }

    /// Returns the raw integer id.
    #[inline]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        ProductId(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = CartError;

    /// Parses an id from text such as a route segment (`"/store/42"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(ProductId)
            .map_err(|e| CartError::InvalidProductId {
                input: s.to_string(),
                reason: e.to_string(),
            })
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One product's entry in the cart.
///
/// ## Invariants (held by the transitions in [`crate::cart`])
/// - At most one line per `id`
/// - `quantity >= 1`; a line that would drop to zero is removed instead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    /// Product this line refers to.
    #[ts(type = "number")]
    pub id: ProductId,

    /// How many units are in the cart.
    pub quantity: u32,
}

impl CartLine {
    /// Creates a line holding a single unit, as added by the first click.
    #[inline]
    pub const fn single(id: ProductId) -> Self {
        CartLine { id, quantity: 1 }
    }
}
