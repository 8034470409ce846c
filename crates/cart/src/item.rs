//! Cart and line item types.

use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use common::{ProductId, SessionToken};
use serde::{Deserialize, Serialize};

/// A single entry in a cart.
///
/// Adding the same product twice produces two line items; nothing is merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub quantity: NonZeroU32,
}

impl CartLineItem {
    /// Creates a new line item.
    pub fn new(product_id: impl Into<ProductId>, quantity: NonZeroU32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// The cart held for one session token.
#[derive(Debug, Clone)]
pub struct Cart {
    token: SessionToken,
    items: Vec<CartLineItem>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Cart {
    /// Creates an empty cart for the given token.
    pub fn new(token: SessionToken) -> Self {
        let now = Utc::now();
        Self {
            token,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a line item, preserving insertion order.
    pub fn push(&mut self, item: CartLineItem) {
        self.items.push(item);
        self.updated_at = Utc::now();
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Consumes the cart, returning its items in insertion order.
    pub fn into_items(self) -> Vec<CartLineItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the last mutation (or creation if never mutated).
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
