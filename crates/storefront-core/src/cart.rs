//! # Cart Transitions
//!
//! Every cart mutation as a pure function `(lines, id) -> lines`.
//!
//! ## Transition Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation     Line absent              Line present (qty = n)          │
//! │  ──────────    ─────────────────────    ───────────────────────────     │
//! │  increase      append {id, 1}           n + 1, same position            │
//! │  decrease      unchanged                n = 1 → line removed            │
//! │                                         n > 1 → n - 1, same position    │
//! │  remove        unchanged                line removed                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The state manager replaces its lines with the returned vector, so the
//! old lines are never observed half-updated.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{CartLine, ProductId};

// =============================================================================
// Queries
// =============================================================================

/// Quantity of `id` in `lines`, or 0 when the product is not in the cart.
pub fn quantity_of(lines: &[CartLine], id: ProductId) -> u32 {
    lines
        .iter()
        .find(|line| line.id == id)
        .map_or(0, |line| line.quantity)
}

/// Sum of all line quantities.
pub fn total_quantity(lines: &[CartLine]) -> u64 {
    lines.iter().map(|line| u64::from(line.quantity)).sum()
}

// =============================================================================
// Transitions
// =============================================================================

/// Adds one unit of `id`.
///
/// Saturates at `u32::MAX` instead of wrapping.
pub fn increase(lines: &[CartLine], id: ProductId) -> Vec<CartLine> {
    if !lines.iter().any(|line| line.id == id) {
        let mut next = lines.to_vec();
        next.push(CartLine::single(id));
        return next;
    }

    lines
        .iter()
        .map(|line| {
            if line.id == id {
                CartLine {
                    quantity: line.quantity.saturating_add(1),
                    ..*line
                }
            } else {
                *line
            }
        })
        .collect()
}

/// Takes one unit of `id` away, dropping the line when it was the last one.
///
/// Decreasing a product that is not in the cart leaves the lines untouched.
pub fn decrease(lines: &[CartLine], id: ProductId) -> Vec<CartLine> {
    if quantity_of(lines, id) <= 1 {
        return remove(lines, id);
    }

    lines
        .iter()
        .map(|line| {
            if line.id == id {
                CartLine {
                    quantity: line.quantity - 1,
                    ..*line
                }
            } else {
                *line
            }
        })
        .collect()
}

/// Drops the line for `id`, whatever its quantity.
pub fn remove(lines: &[CartLine], id: ProductId) -> Vec<CartLine> {
    lines.iter().filter(|line| line.id != id).copied().collect()
}

// =============================================================================
// Cart State
// =============================================================================

/// In-memory cart: ordered lines plus the panel visibility flag.
///
/// `total_quantity` is never stored; it is recomputed from the lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    lines: Vec<CartLine>,
    panel_open: bool,
}

impl CartState {
    /// Creates a state from previously stored lines with the panel closed.
    pub fn new(lines: Vec<CartLine>) -> Self {
        CartState {
            lines,
            panel_open: false,
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Replaces the lines wholesale with the result of a transition.
    pub fn replace_lines(&mut self, lines: Vec<CartLine>) {
        self.lines = lines;
    }

    pub fn get_quantity(&self, id: ProductId) -> u32 {
        quantity_of(&self.lines, id)
    }

    pub fn total_quantity(&self) -> u64 {
        total_quantity(&self.lines)
    }

    /// Number of distinct products in the cart.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.panel_open
    }

    pub fn set_panel_open(&mut self, open: bool) {
        self.panel_open = open;
    }

    /// Copies the current state into a value that can outlive the borrow.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            lines: self.lines.clone(),
            total_quantity: self.total_quantity(),
            panel_open: self.panel_open,
        }
    }

    pub fn summary(&self) -> CartSummary {
        CartSummary::from(self)
    }
}

// =============================================================================
// Views for the UI
// =============================================================================

/// Full cart view handed to subscribers after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    #[ts(type = "number")]
    pub total_quantity: u64,
    pub panel_open: bool,
}

/// Compact view for the cart badge in the navigation bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartSummary {
    #[ts(type = "number")]
    pub item_count: usize,
    #[ts(type = "number")]
    pub total_quantity: u64,
    pub panel_open: bool,
}

impl From<&CartState> for CartSummary {
    fn from(state: &CartState) -> Self {
        CartSummary {
            item_count: state.item_count(),
            total_quantity: state.total_quantity(),
            panel_open: state.is_open(),
        }
    }
}
