//! Product type and the in-memory catalog.

use common::ProductId;
use serde::Serialize;

/// A catalog product. Prices are in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price_cents: i64,
    pub category: String,
}

impl Product {
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price_cents: i64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price_cents,
            category: category.into(),
        }
    }
}

/// Read-only product list.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Creates a catalog from an explicit product list.
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Looks up a product by id.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Case-insensitive substring search on product names, in catalog order.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.to_lowercase();
        self.products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

impl Default for Catalog {
    /// The demo storefront's five products.
    fn default() -> Self {
        Self::new(vec![
            Product::new("1", "Laptop", 99_999, "Electronics"),
            Product::new("2", "Smartphone", 69_999, "Electronics"),
            Product::new("3", "Headphones", 19_999, "Audio"),
            Product::new("4", "Book", 2_999, "Books"),
            Product::new("5", "T-Shirt", 1_999, "Clothing"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_by_id() {
        let catalog = Catalog::default();
        let laptop = catalog.get(&ProductId::from(1u64)).unwrap();
        assert_eq!(laptop.name, "Laptop");
        assert_eq!(laptop.price_cents, 99_999);
        assert!(catalog.get(&ProductId::new("42")).is_none());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = Catalog::default();
        let names: Vec<_> = catalog
            .search("PHONE")
            .into_iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Smartphone", "Headphones"]);
    }

    #[test]
    fn test_search_without_match_is_empty() {
        assert!(Catalog::default().search("pizza").is_empty());
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let catalog = Catalog::default();
        assert_eq!(catalog.search("").len(), catalog.products().len());
    }

    #[test]
    fn test_product_json_shape() {
        let catalog = Catalog::default();
        let json = serde_json::to_value(catalog.get(&ProductId::new("4")).unwrap()).unwrap();
        assert_eq!(json["id"], "4");
        assert_eq!(json["category"], "Books");
        assert_eq!(json["price_cents"], 2999);
    }
}
