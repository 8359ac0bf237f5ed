//! # Setup Error Type
//!
//! Cart operations themselves never fail. The only errors this crate
//! returns come from building a manager: bad configuration, or a store that
//! cannot be opened.

use storefront_store::StoreError;
use thiserror::Error;

/// Errors raised while configuring or opening the cart.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be used.
    #[error("Invalid value '{value}' for {var}: {reason}")]
    InvalidValue {
        var: String,
        value: String,
        reason: String,
    },

    /// The configured store could not be opened.
    #[error("Cart store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

impl ConfigError {
    pub(crate) fn invalid(var: &str, value: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            var: var.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results with ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigError::invalid(
            "STOREFRONT_CART_PERSIST",
            "maybe",
            "expected true or false",
        );
        assert_eq!(
            err.to_string(),
            "Invalid value 'maybe' for STOREFRONT_CART_PERSIST: expected true or false"
        );
    }
}
