//! Per-product stock counter.

use std::sync::atomic::{AtomicU32, Ordering};

use common::ProductId;
use serde::Serialize;

/// Outcome of a single admission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Admission {
    /// One unit was taken from stock.
    Granted,
    /// No stock was left (or the product has none configured).
    Denied,
}

impl Admission {
    pub fn is_granted(&self) -> bool {
        matches!(self, Admission::Granted)
    }

    /// Stable lowercase label, used for metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Admission::Granted => "granted",
            Admission::Denied => "denied",
        }
    }
}

impl std::fmt::Display for Admission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a flash-sale product's stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Available,
    /// Terminal.
    SoldOut,
}

/// Bounded stock for one flash-sale product.
#[derive(Debug)]
pub struct FlashSaleStock {
    product_id: ProductId,
    initial: u32,
    remaining: AtomicU32,
}

impl FlashSaleStock {
    /// Creates a stock counter holding `units`.
    pub fn new(product_id: impl Into<ProductId>, units: u32) -> Self {
        Self {
            product_id: product_id.into(),
            initial: units,
            remaining: AtomicU32::new(units),
        }
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Takes one unit if any remain.
    ///
    /// The check and the decrement are one atomic step; two callers racing
    /// on the last unit cannot both see it.
    pub fn try_grant(&self) -> Admission {
        match self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
        {
            Ok(previous) => {
                debug_assert!(previous > 0 && previous <= self.initial);
                Admission::Granted
            }
            Err(_) => Admission::Denied,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining.load(Ordering::Acquire)
    }

    pub fn initial(&self) -> u32 {
        self.initial
    }

    /// Units handed out so far.
    pub fn granted(&self) -> u32 {
        self.initial - self.remaining()
    }

    pub fn status(&self) -> StockStatus {
        if self.remaining() > 0 {
            StockStatus::Available
        } else {
            StockStatus::SoldOut
        }
    }
}
