//! # Validation Module
//!
//! Restores the cart invariants on lines that came back from storage.
//!
//! Lines produced by [`crate::cart`] always hold the invariants, but stored
//! JSON can be edited by hand or written by an older build. Anything that
//! parses is accepted and repaired rather than discarded:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Stored                         Normalized                              │
//! │  ─────────────────────────      ─────────────────────────               │
//! │  {id: 1, quantity: 0}           (dropped)                               │
//! │  {id: 2, quantity: 1}           {id: 2, quantity: 3}  ◄── merged        │
//! │  {id: 2, quantity: 2}           (folded into first)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::types::CartLine;

/// Result of [`normalize_lines`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedLines {
    /// Lines satisfying the cart invariants, in first-seen order.
    pub lines: Vec<CartLine>,

    /// Lines dropped because their quantity was zero.
    pub dropped: usize,

    /// Lines folded into an earlier line with the same id.
    pub merged: usize,
}

impl NormalizedLines {
    /// Whether normalization had to change anything.
    pub fn is_clean(&self) -> bool {
        self.dropped == 0 && self.merged == 0
    }
}

/// Drops zero-quantity lines and merges duplicate ids into the first one.
pub fn normalize_lines(raw: Vec<CartLine>) -> NormalizedLines {
    let mut out = NormalizedLines::default();

    for line in raw {
        if line.quantity == 0 {
            out.dropped += 1;
            continue;
        }

        match out.lines.iter_mut().find(|l| l.id == line.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
                out.merged += 1;
            }
            None => out.lines.push(line),
        }
    }

    out
}
