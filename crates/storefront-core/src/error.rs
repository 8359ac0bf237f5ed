//! # Error Types
//!
//! Domain error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core (this file)                                           │
//! │  └── CartError     - Malformed domain input (product ids)              │
//! │                                                                         │
//! │  storefront-store                                                      │
//! │  └── StoreError    - Read/write/serialize failures                     │
//! │                                                                         │
//! │  storefront-cart                                                       │
//! │  └── ConfigError   - Bad environment configuration                     │
//! │                                                                         │
//! │  Cart mutations never fail: a missing line is a no-op or an insert.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Cart domain errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Text could not be parsed as a product id.
    ///
    /// ## When This Occurs
    /// - A route parameter or data attribute is not an integer
    #[error("Invalid product id '{input}': {reason}")]
    InvalidProductId { input: String, reason: String },
}

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CartError::InvalidProductId {
            input: "abc".to_string(),
            reason: "invalid digit found in string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid product id 'abc': invalid digit found in string"
        );
    }
}
