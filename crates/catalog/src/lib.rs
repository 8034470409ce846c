//! Static product catalog served by the storefront.

pub mod product;

pub use common::ProductId;
pub use product::{Catalog, Product};
