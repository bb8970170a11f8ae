//! Fixtures
//!
//! YAML fixture sets: a product catalog, an optional seeded cart and optional
//! pricing rules, each stored under `<base>/<kind>/<set>.yml`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cart::{Cart, CartError},
    catalog::{Catalog, CatalogError},
    fixtures::{
        carts::{CartFixture, CartItemFixture},
        pricing::PricingFixture,
        products::ProductsFixture,
    },
    pricing::PricingRules,
    products::Product,
};

pub mod carts;
pub mod pricing;
pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file {}: {source}", path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,

        /// Underlying error
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Products could not be added to the catalog
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A seeded cart line was rejected
    #[error("Invalid seeded cart: {0}")]
    Cart(#[from] CartError),

    /// No products loaded yet
    #[error("No products loaded")]
    NoProducts,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Catalog built from the loaded products
    catalog: Option<Catalog>,

    /// Seeded cart lines, in the order they are added
    cart_items: Vec<CartItemFixture>,

    /// Pricing rules, defaults unless a pricing fixture was loaded
    pricing: PricingRules,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: None,
            cart_items: Vec::new(),
            pricing: PricingRules::default(),
        }
    }

    /// Load products from a YAML fixture file, appending them to the catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a product is invalid,
    /// or products clash with ones already loaded.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ProductsFixture = read_yaml(&self.path_for("products", name))?;

        for product_fixture in fixture.products {
            let product = Product::try_from(product_fixture)?;

            let catalog = self
                .catalog
                .get_or_insert_with(|| Catalog::new(product.price.currency()));

            catalog.insert(product)?;
        }

        let count = self.catalog.as_ref().map_or(0, Catalog::len);

        debug!(set = name, products = count, "loaded product fixtures");

        Ok(self)
    }

    /// Load a seeded cart from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: CartFixture = read_yaml(&self.path_for("carts", name))?;

        self.cart_items.extend(fixture.items);

        debug!(set = name, lines = self.cart_items.len(), "loaded cart fixture");

        Ok(self)
    }

    /// Load pricing rules from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds invalid amounts.
    pub fn load_pricing(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: PricingFixture = read_yaml(&self.path_for("pricing", name))?;

        self.pricing = PricingRules::try_from(fixture)?;

        debug!(set = name, "loaded pricing fixture");

        Ok(self)
    }

    /// Load a fixture set: products are required, the cart and pricing files
    /// with the same name are loaded when present.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn load_set(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        self.load_products(name)?;

        if self.path_for("pricing", name).is_file() {
            self.load_pricing(name)?;
        }

        if self.path_for("carts", name).is_file() {
            self.load_cart(name)?;
        }

        info!(
            set = name,
            base_path = %self.base_path.display(),
            "loaded fixture set"
        );

        Ok(self)
    }

    /// Load a complete fixture set from the default base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_set(name)?;

        Ok(fixture)
    }

    /// Get the catalog
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn catalog(&self) -> Result<&Catalog, FixtureError> {
        self.catalog.as_ref().ok_or(FixtureError::NoProducts)
    }

    /// Get the pricing rules
    pub fn pricing(&self) -> &PricingRules {
        &self.pricing
    }

    /// Create an empty cart priced with the loaded rules
    pub fn empty_cart(&self) -> Cart {
        Cart::with_rules(self.pricing.clone())
    }

    /// Create a cart seeded with the loaded cart lines
    ///
    /// # Errors
    ///
    /// Returns an error if no products are loaded or a seeded line is rejected by the ledger.
    pub fn cart(&self) -> Result<Cart, FixtureError> {
        let catalog = self.catalog()?;
        let mut cart = self.empty_cart();

        for item in &self.cart_items {
            cart.add(catalog, item.product_id(), item.quantity)?;
        }

        Ok(cart)
    }

    fn path_for(&self, kind: &str, name: &str) -> PathBuf {
        self.base_path.join(kind).join(format!("{name}.yml"))
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, FixtureError> {
    let contents = fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(serde_norway::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rusty_money::iso::USD;
    use tempfile::TempDir;
    use testresult::TestResult;

    use crate::{catalog::ProductLookup, products::ProductId};

    use super::*;

    const PRODUCTS: &str = "products:
  - id: 1
    name: Headphones
    price: 299.99 USD
    category: Electronics
  - id: 2
    name: Speaker
    price: 179.99 USD
    in_stock: false
";

    fn write_fixture(base: &Path, kind: &str, name: &str, contents: &str) -> TestResult {
        let dir = base.join(kind);

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    #[test]
    fn load_set_without_optional_files_uses_defaults() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(dir.path(), "products", "shop", PRODUCTS)?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_set("shop")?;

        let catalog = fixture.catalog()?;

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.currency(), USD);
        assert!(fixture.cart()?.is_empty());
        assert_eq!(fixture.pricing().coupon.code, "DISCOUNT20");

        Ok(())
    }

    #[test]
    fn seeded_cart_is_built_through_the_ledger() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(dir.path(), "products", "shop", PRODUCTS)?;
        write_fixture(dir.path(), "carts", "shop", "items:\n  - product: 1\n    quantity: 2\n")?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_set("shop")?;

        let cart = fixture.cart()?;

        assert_eq!(cart.quantity_of(ProductId::new(1)), Some(2));

        Ok(())
    }

    #[test]
    fn seeded_cart_rejects_out_of_stock_products() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(dir.path(), "products", "shop", PRODUCTS)?;
        write_fixture(dir.path(), "carts", "shop", "items:\n  - product: 2\n")?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_set("shop")?;

        assert!(matches!(
            fixture.cart(),
            Err(FixtureError::Cart(CartError::NotAvailable(id))) if id == ProductId::new(2)
        ));

        Ok(())
    }

    #[test]
    fn load_products_rejects_currency_mismatch() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(dir.path(), "products", "usd_set", PRODUCTS)?;
        write_fixture(
            dir.path(),
            "products",
            "gbp_set",
            "products:\n  - id: 3\n    name: Tea\n    price: 1.00 GBP\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_products("usd_set")?;

        let result = fixture.load_products("gbp_set");

        assert!(matches!(
            result,
            Err(FixtureError::Catalog(CatalogError::CurrencyMismatch(..)))
        ));

        Ok(())
    }

    #[test]
    fn load_products_rejects_duplicate_ids() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(dir.path(), "products", "shop", PRODUCTS)?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_products("shop")?;

        assert!(matches!(
            fixture.load_products("shop"),
            Err(FixtureError::Catalog(CatalogError::DuplicateProduct(_)))
        ));

        Ok(())
    }

    #[test]
    fn missing_product_file_reports_path() {
        let mut fixture = Fixture::with_base_path("/nonexistent");

        let result = fixture.load_products("missing");

        assert!(matches!(
            result,
            Err(FixtureError::Io { path, .. }) if path.ends_with("products/missing.yml")
        ));
    }

    #[test]
    fn catalog_requires_products() {
        let fixture = Fixture::default();

        assert!(matches!(fixture.catalog(), Err(FixtureError::NoProducts)));
        assert!(matches!(fixture.cart(), Err(FixtureError::NoProducts)));
    }
}
