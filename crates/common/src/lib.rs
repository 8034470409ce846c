//! Identifier types shared by the cart, flash-sale, catalog and API crates.

pub mod types;

pub use types::{EmptySessionToken, ProductId, SessionToken};
