//! Flash-sale admission control.
//!
//! Each limited-stock product owns an independent atomic counter. A grant is
//! a single compare-and-decrement, so the number of units handed out never
//! exceeds the configured stock no matter how requests interleave.
//!
//! Per product the stock moves from [`StockStatus::Available`] to
//! [`StockStatus::SoldOut`] and never back; there is no restock.

pub mod controller;
pub mod stock;

pub use common::ProductId;
pub use controller::FlashSaleController;
pub use stock::{Admission, FlashSaleStock, StockStatus};
