//! Cart service providing add, view and checkout over the session store.

use std::num::NonZeroU32;

use common::{ProductId, SessionToken};

use crate::error::{CartError, Result};
use crate::item::CartLineItem;
use crate::store::SessionStore;

/// Builds a session token from optional raw request input.
pub fn parse_token(raw: Option<&str>) -> Result<SessionToken> {
    raw.and_then(SessionToken::parse)
        .ok_or(CartError::InvalidToken)
}

/// Validates a raw line item quantity.
pub fn parse_quantity(quantity: u32) -> Result<NonZeroU32> {
    NonZeroU32::new(quantity).ok_or(CartError::InvalidQuantity { quantity })
}

/// Service for session carts.
///
/// Every operation runs under the per-token lock of the underlying
/// [`SessionStore`]; none of them block on I/O and none of them fail.
#[derive(Debug, Clone, Default)]
pub struct CartService {
    store: SessionStore,
}

impl CartService {
    /// Creates a new cart service over the given store.
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying session store.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Appends a line item to the token's cart, creating the cart if needed.
    ///
    /// Returns the number of line items in the cart after the append.
    #[tracing::instrument(skip(self), fields(token = %token, product_id = %product_id))]
    pub fn add_to_cart(
        &self,
        token: &SessionToken,
        product_id: ProductId,
        quantity: NonZeroU32,
    ) -> usize {
        let mut cart = self.store.get_or_create_cart(token);
        cart.push(CartLineItem::new(product_id, quantity));
        let len = cart.len();
        drop(cart);

        metrics::counter!("cart_items_added_total").increment(1);
        tracing::debug!(items = len, "item added to cart");
        len
    }

    /// Returns the token's current items. An absent token yields an empty cart.
    pub fn view_cart(&self, token: Option<&SessionToken>) -> Vec<CartLineItem> {
        match token {
            Some(token) => self.store.snapshot_cart(token),
            None => Vec::new(),
        }
    }

    /// Removes the token's cart and returns its items as the finalized order.
    ///
    /// A second checkout on the same token returns an empty list.
    #[tracing::instrument(skip(self), fields(token = token.map(SessionToken::as_str)))]
    pub fn checkout(&self, token: Option<&SessionToken>) -> Vec<CartLineItem> {
        let Some(token) = token else {
            return Vec::new();
        };

        let items = self.store.remove_cart(token);
        metrics::counter!("cart_checkouts_total").increment(1);
        tracing::info!(items = items.len(), "checkout completed");
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(s: &str) -> SessionToken {
        SessionToken::parse(s).unwrap()
    }

    fn qty(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_parse_token_rejects_missing_and_blank() {
        assert_eq!(parse_token(None), Err(CartError::InvalidToken));
        assert_eq!(parse_token(Some("")), Err(CartError::InvalidToken));
        assert_eq!(parse_token(Some("tok1")).unwrap().as_str(), "tok1");
    }

    #[test]
    fn test_parse_quantity_rejects_zero() {
        assert_eq!(
            parse_quantity(0),
            Err(CartError::InvalidQuantity { quantity: 0 })
        );
        assert_eq!(parse_quantity(3).unwrap().get(), 3);
    }

    #[test]
    fn test_add_returns_running_item_count() {
        let service = CartService::default();
        let t = token("tok1");
        assert_eq!(service.add_to_cart(&t, "p1".into(), qty(1)), 1);
        assert_eq!(service.add_to_cart(&t, "p1".into(), qty(1)), 2);
    }

    #[test]
    fn test_checkout_then_checkout_again_is_empty() {
        let service = CartService::default();
        let t = token("tok1");
        service.add_to_cart(&t, "p1".into(), qty(2));
        service.add_to_cart(&t, "p2".into(), qty(1));

        assert_eq!(
            service.checkout(Some(&t)),
            vec![
                CartLineItem::new("p1", qty(2)),
                CartLineItem::new("p2", qty(1)),
            ]
        );
        assert!(service.checkout(Some(&t)).is_empty());
        assert!(!service.store().contains(&t));
    }

    #[test]
    fn test_missing_token_yields_empty_results() {
        let service = CartService::default();
        service.add_to_cart(&token("tok1"), "p1".into(), qty(1));

        assert!(service.view_cart(None).is_empty());
        assert!(service.checkout(None).is_empty());
        assert_eq!(service.store().active_sessions(), 1);
    }

    #[test]
    fn test_view_does_not_mutate() {
        let service = CartService::default();
        let t = token("tok1");
        service.add_to_cart(&t, "p1".into(), qty(1));

        let first = service.view_cart(Some(&t));
        let second = service.view_cart(Some(&t));
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }
}
