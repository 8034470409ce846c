//! Session store: token → cart with per-token locking.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use common::SessionToken;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use dashmap::mapref::one::RefMut;

use crate::item::{Cart, CartLineItem};

/// Exclusive handle to one session's cart.
///
/// Holding the guard locks the shard that owns the token. Do not call back
/// into the store while a guard is alive.
pub type CartGuard<'a> = RefMut<'a, SessionToken, Cart>;

/// Process-lifetime map from session token to cart.
///
/// Backed by a sharded map, so sessions on different shards never contend
/// and every operation on a single token happens under that token's shard
/// lock. This makes same-token operations linearizable: a snapshot sees a
/// cart either fully before or fully after a concurrent append, and a
/// removal cannot race an append into a detached cart.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    carts: Arc<DashMap<SessionToken, Cart>>,
}

impl SessionStore {
    /// Creates an empty session store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cart for `token`, creating an empty one if absent.
    pub fn get_or_create_cart(&self, token: &SessionToken) -> CartGuard<'_> {
        match self.carts.entry(token.clone()) {
            Entry::Occupied(entry) => entry.into_ref(),
            Entry::Vacant(entry) => {
                tracing::debug!(%token, "creating cart");
                metrics::gauge!("cart_active_sessions").increment(1.0);
                entry.insert(Cart::new(token.clone()))
            }
        }
    }

    /// Returns a point-in-time copy of the items for `token`.
    pub fn snapshot_cart(&self, token: &SessionToken) -> Vec<CartLineItem> {
        self.carts
            .get(token)
            .map(|cart| cart.items().to_vec())
            .unwrap_or_default()
    }

    /// Detaches the cart for `token` and returns its items.
    pub fn remove_cart(&self, token: &SessionToken) -> Vec<CartLineItem> {
        match self.carts.remove(token) {
            Some((_, cart)) => {
                metrics::gauge!("cart_active_sessions").decrement(1.0);
                cart.into_items()
            }
            None => Vec::new(),
        }
    }

    /// Returns true if a cart exists for `token`.
    pub fn contains(&self, token: &SessionToken) -> bool {
        self.carts.contains_key(token)
    }

    /// Returns the number of carts currently held.
    pub fn active_sessions(&self) -> usize {
        self.carts.len()
    }

    /// Removes carts not touched within `max_idle`. Returns the count removed.
    ///
    /// A window reaching past the representable time range removes nothing.
    pub fn sweep_idle(&self, max_idle: TimeDelta) -> usize {
        let Some(cutoff) = Utc::now().checked_sub_signed(max_idle) else {
            return 0;
        };
        let mut removed = 0usize;
        self.carts.retain(|_, cart| {
            let keep = cart.updated_at() >= cutoff;
            if !keep {
                removed += 1;
            }
            keep
        });

        if removed > 0 {
            metrics::gauge!("cart_active_sessions").decrement(removed as f64);
            metrics::counter!("cart_sessions_swept_total").increment(removed as u64);
            tracing::info!(removed, "swept idle carts");
        }
        removed
    }
}
