//! Cart error types.

use thiserror::Error;

/// Errors raised while turning raw request input into cart operations.
///
/// The cart operations themselves never fail; these only surface when a
/// caller builds a token or quantity from untrusted input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The session token was absent or empty.
    #[error("Session token is missing or empty")]
    InvalidToken,

    /// A line item quantity was zero.
    #[error("Invalid quantity {quantity}: must be at least 1")]
    InvalidQuantity { quantity: u32 },
}

/// Convenience type alias for cart results.
pub type Result<T> = std::result::Result<T, CartError>;
