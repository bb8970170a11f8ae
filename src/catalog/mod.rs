//! Catalog
//!
//! The read-only product catalog the cart prices against.

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use slotmap::SlotMap;
use thiserror::Error;
use tracing::debug;

use crate::products::{Product, ProductId, ProductKey};

pub mod query;

pub use query::{ProductQuery, SortOrder};

/// Pseudo-category that matches every product.
pub const ALL_CATEGORIES: &str = "All";

/// Ratings at or above this are featured on the home page.
pub const FEATURED_MIN_RATING: f64 = 4.7;

/// Related products shown on a product page by default.
pub const DEFAULT_RELATED_COUNT: usize = 4;

/// Errors related to catalog construction.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// Two products share an id.
    #[error("Product {0} is already in the catalog")]
    DuplicateProduct(ProductId),

    /// A product's currency differs from the catalog currency (product, product currency, catalog currency).
    #[error("Product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),
}

/// Read-only product lookup used by the cart ledger.
pub trait ProductLookup {
    /// Currency every product in the catalog is priced in.
    fn currency(&self) -> &'static Currency;

    /// Find a product by id.
    fn product_by_id(&self, id: ProductId) -> Option<&Product>;

    /// All products in a category, in catalog order.
    fn products_by_category(&self, category: &str) -> Vec<&Product>;
}

/// Catalog
#[derive(Debug)]
pub struct Catalog {
    products: SlotMap<ProductKey, Product>,
    ids: FxHashMap<ProductId, ProductKey>,
    currency: &'static Currency,
}

impl Catalog {
    /// Create an empty catalog priced in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            products: SlotMap::with_key(),
            ids: FxHashMap::default(),
            currency,
        }
    }

    /// Create a catalog from a list of products, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] on duplicate ids or mixed currencies.
    pub fn with_products(
        products: impl IntoIterator<Item = Product>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new(currency);

        for product in products {
            catalog.insert(product)?;
        }

        Ok(catalog)
    }

    /// Add a product to the end of the catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the id is taken or the currency differs.
    pub fn insert(&mut self, product: Product) -> Result<ProductKey, CatalogError> {
        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(CatalogError::CurrencyMismatch(
                product.id,
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if self.ids.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id));
        }

        let id = product.id;
        let key = self.products.insert(product);

        self.ids.insert(id, key);

        debug!(product = %id, "added product to catalog");

        Ok(key)
    }

    /// Iterate over the products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        // Products are never removed, so slot order is insertion order.
        self.products.values()
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Highly rated products, in catalog order.
    pub fn featured(&self) -> Vec<&Product> {
        self.iter()
            .filter(|product| product.rating >= FEATURED_MIN_RATING)
            .collect()
    }

    /// Up to `count` other products from the same category, in catalog order.
    pub fn related(&self, product: &Product, count: usize) -> Vec<&Product> {
        self.iter()
            .filter(|other| other.category == product.category && other.id != product.id)
            .take(count)
            .collect()
    }

    /// `"All"` followed by each distinct category in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories = vec![ALL_CATEGORIES];

        for product in self.iter() {
            if !categories.contains(&product.category.as_str()) {
                categories.push(product.category.as_str());
            }
        }

        categories
    }

    /// Filter and sort the catalog for a listing page.
    pub fn query(&self, query: &ProductQuery) -> Vec<&Product> {
        query.apply(self.iter())
    }
}

impl ProductLookup for Catalog {
    fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn product_by_id(&self, id: ProductId) -> Option<&Product> {
        self.ids.get(&id).and_then(|key| self.products.get(*key))
    }

    fn products_by_category(&self, category: &str) -> Vec<&Product> {
        self.iter()
            .filter(|product| product.category == category)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{GBP, USD},
    };
    use testresult::TestResult;

    use super::*;

    fn product(id: u32, category: &str, rating: f64) -> Product {
        Product {
            category: category.to_string(),
            rating,
            ..Product::new(ProductId::new(id), format!("Product {id}"), Money::from_minor(1_000, USD))
        }
    }

    fn test_catalog() -> Result<Catalog, CatalogError> {
        Catalog::with_products(
            [
                product(1, "Electronics", 4.8),
                product(2, "Furniture", 4.6),
                product(3, "Electronics", 4.5),
                product(4, "Electronics", 4.9),
                product(5, "Home Decor", 4.7),
                product(6, "Electronics", 4.5),
                product(7, "Electronics", 4.0),
            ],
            USD,
        )
    }

    fn ids(products: &[&Product]) -> Vec<u32> {
        products.iter().map(|product| product.id.get()).collect()
    }

    #[test]
    fn insert_rejects_duplicate_ids() -> TestResult {
        let mut catalog = test_catalog()?;

        let result = catalog.insert(product(1, "Kitchen", 3.0));

        assert_eq!(result, Err(CatalogError::DuplicateProduct(ProductId::new(1))));
        assert_eq!(catalog.len(), 7);

        Ok(())
    }

    #[test]
    fn insert_rejects_currency_mismatch() {
        let mut catalog = Catalog::new(USD);

        let result = catalog.insert(Product::new(ProductId::new(9), "Tea", Money::from_minor(300, GBP)));

        assert_eq!(
            result,
            Err(CatalogError::CurrencyMismatch(
                ProductId::new(9),
                GBP.iso_alpha_code,
                USD.iso_alpha_code
            ))
        );
        assert!(catalog.is_empty());
    }

    #[test]
    fn product_by_id_finds_products() -> TestResult {
        let catalog = test_catalog()?;

        let found = catalog
            .product_by_id(ProductId::new(4))
            .map(|product| product.name.as_str());

        assert_eq!(found, Some("Product 4"));
        assert!(catalog.product_by_id(ProductId::new(99)).is_none());

        Ok(())
    }

    #[test]
    fn products_by_category_keeps_catalog_order() -> TestResult {
        let catalog = test_catalog()?;

        assert_eq!(ids(&catalog.products_by_category("Electronics")), vec![1, 3, 4, 6, 7]);
        assert!(catalog.products_by_category("Garden").is_empty());

        Ok(())
    }

    #[test]
    fn featured_uses_rating_threshold() -> TestResult {
        let catalog = test_catalog()?;

        assert_eq!(ids(&catalog.featured()), vec![1, 4, 5]);

        Ok(())
    }

    #[test]
    fn related_excludes_self_and_caps_count() -> TestResult {
        let catalog = test_catalog()?;
        let watch = catalog
            .product_by_id(ProductId::new(3))
            .ok_or("missing product 3")?;

        assert_eq!(ids(&catalog.related(watch, DEFAULT_RELATED_COUNT)), vec![1, 4, 6, 7]);
        assert_eq!(ids(&catalog.related(watch, 2)), vec![1, 4]);

        Ok(())
    }

    #[test]
    fn categories_start_with_all_in_first_seen_order() -> TestResult {
        let catalog = test_catalog()?;

        assert_eq!(
            catalog.categories(),
            vec!["All", "Electronics", "Furniture", "Home Decor"]
        );

        Ok(())
    }
}
