//! Admission controller over all flash-sale products.

use std::collections::HashMap;
use std::sync::Arc;

use common::ProductId;

use crate::stock::{Admission, FlashSaleStock, StockStatus};

/// Metric label shared by every product without flash-sale stock.
pub const UNCONFIGURED_LABEL: &str = "unconfigured";

/// Grants or denies single units of limited-stock products.
///
/// The product table is fixed at construction and only read afterwards, so
/// a grant touches nothing but that product's atomic counter. Cloning the
/// controller shares the same counters.
#[derive(Debug, Clone, Default)]
pub struct FlashSaleController {
    products: Arc<HashMap<ProductId, FlashSaleStock>>,
}

impl FlashSaleController {
    /// Creates a controller from `(product, units)` pairs.
    ///
    /// A product listed more than once keeps the last value.
    pub fn new<I, P>(stock: I) -> Self
    where
        I: IntoIterator<Item = (P, u32)>,
        P: Into<ProductId>,
    {
        let products = stock
            .into_iter()
            .map(|(id, units)| {
                let id = id.into();
                (id.clone(), FlashSaleStock::new(id, units))
            })
            .collect();

        Self {
            products: Arc::new(products),
        }
    }

    /// Tries to take one unit of `product_id`.
    ///
    /// Products without configured stock are always denied.
    #[tracing::instrument(skip(self), fields(product_id = %product_id))]
    pub fn try_grant_unit(&self, product_id: &ProductId) -> Admission {
        let (admission, label) = match self.products.get(product_id) {
            Some(stock) => (stock.try_grant(), product_id.to_string()),
            None => {
                tracing::debug!("no flash-sale stock configured");
                (Admission::Denied, UNCONFIGURED_LABEL.to_string())
            }
        };

        // Only configured ids become label values.
        metrics::counter!(
            "flash_sale_admissions_total",
            "product" => label,
            "outcome" => admission.as_str(),
        )
        .increment(1);
        tracing::debug!(%admission, "flash-sale admission");
        admission
    }

    /// Remaining units, or `None` for products without flash-sale stock.
    pub fn remaining(&self, product_id: &ProductId) -> Option<u32> {
        self.products.get(product_id).map(FlashSaleStock::remaining)
    }

    pub fn status(&self, product_id: &ProductId) -> Option<StockStatus> {
        self.products.get(product_id).map(FlashSaleStock::status)
    }

    /// Returns the stock counter for a product.
    pub fn stock(&self, product_id: &ProductId) -> Option<&FlashSaleStock> {
        self.products.get(product_id)
    }

    /// Configured flash-sale products, sorted by id.
    pub fn products(&self) -> Vec<&ProductId> {
        let mut ids: Vec<_> = self.products.keys().collect();
        ids.sort();
        ids
    }
}
