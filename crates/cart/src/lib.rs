//! Session-scoped shopping carts.
//!
//! This crate owns the per-session cart state of the storefront:
//! - [`SessionStore`] maps session tokens to carts with per-token locking
//! - [`CartService`] exposes add, view and checkout on top of the store
//! - [`TokenIssuer`] hands out the opaque tokens the store is keyed by

pub mod error;
pub mod item;
pub mod service;
pub mod store;
pub mod token;

pub use common::{ProductId, SessionToken};
pub use error::{CartError, Result};
pub use item::{Cart, CartLineItem};
pub use service::{CartService, parse_quantity, parse_token};
pub use store::{CartGuard, SessionStore};
pub use token::TokenIssuer;
