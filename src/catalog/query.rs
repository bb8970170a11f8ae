//! Product listing queries

use std::cmp::Ordering;

use clap::ValueEnum;
use rust_decimal::Decimal;

use crate::{catalog::ALL_CATEGORIES, products::Product};

/// Default upper bound of the listing price filter.
const DEFAULT_MAX_PRICE: i64 = 1_500;

/// Listing sort order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// Best rated first.
    #[default]
    Featured,

    /// Cheapest effective price first.
    PriceLow,

    /// Most expensive effective price first.
    PriceHigh,

    /// Best rated first.
    Rating,

    /// Highest id first.
    Newest,
}

impl SortOrder {
    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOrder::Featured | SortOrder::Rating => b.rating.total_cmp(&a.rating),
            SortOrder::PriceLow => a.effective_price().cmp(&b.effective_price()),
            SortOrder::PriceHigh => b.effective_price().cmp(&a.effective_price()),
            SortOrder::Newest => b.id.cmp(&a.id),
        }
    }
}

/// Filters and sort order for a product listing.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductQuery {
    category: Option<String>,
    min_price: Decimal,
    max_price: Decimal,
    search: Option<String>,
    sort: SortOrder,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            category: None,
            min_price: Decimal::ZERO,
            max_price: Decimal::from(DEFAULT_MAX_PRICE),
            search: None,
            sort: SortOrder::default(),
        }
    }
}

impl ProductQuery {
    /// Only list products in `category`. `"All"` lists everything.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();

        self.category = (category != ALL_CATEGORIES).then_some(category);
        self
    }

    /// Only list products whose effective price lies in `[min, max]`.
    #[must_use]
    pub fn with_price_range(mut self, min: Decimal, max: Decimal) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Only list products whose name, description or tags contain `search`.
    #[must_use]
    pub fn with_search(mut self, search: &str) -> Self {
        let search = search.trim().to_lowercase();

        self.search = (!search.is_empty()).then_some(search);
        self
    }

    /// Sort the listing.
    #[must_use]
    pub fn sorted_by(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Lower bound of the price filter.
    pub fn min_price(&self) -> Decimal {
        self.min_price
    }

    /// Upper bound of the price filter.
    pub fn max_price(&self) -> Decimal {
        self.max_price
    }

    /// Check a single product against the filters.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category
            && product.category != *category
        {
            return false;
        }

        let price = product.effective_price();

        if price < self.min_price || price > self.max_price {
            return false;
        }

        self.search
            .as_deref()
            .is_none_or(|needle| product.matches_search(needle))
    }

    /// Filter and sort a sequence of products. The sort is stable.
    pub fn apply<'a>(&self, products: impl Iterator<Item = &'a Product>) -> Vec<&'a Product> {
        let mut result: Vec<&Product> = products.filter(|product| self.matches(product)).collect();

        result.sort_by(|a, b| self.sort.compare(a, b));
        result
    }
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rusty_money::{Money, iso::USD};

    use crate::{products::ProductId, tags::Tags};

    use super::*;

    fn products() -> Vec<Product> {
        vec![
            Product {
                category: "Electronics".to_string(),
                rating: 4.8,
                description: "Crystal-clear sound".to_string(),
                tags: Tags::from_strs(&["audio", "wireless"]),
                ..Product::new(ProductId::new(1), "Wireless Headphones", Money::from_minor(29_999, USD))
            },
            Product {
                category: "Furniture".to_string(),
                rating: 4.6,
                ..Product::new(ProductId::new(2), "Office Chair", Money::from_minor(24_999, USD))
            },
            Product {
                category: "Electronics".to_string(),
                rating: 4.5,
                discount: Some(Percentage::from(Decimal::new(50, 2))),
                ..Product::new(ProductId::new(3), "Fitness Watch", Money::from_minor(40_000, USD))
            },
            Product {
                category: "Electronics".to_string(),
                rating: 4.9,
                ..Product::new(ProductId::new(4), "Camera Kit", Money::from_minor(199_999, USD))
            },
        ]
    }

    fn ids(products: &[&Product]) -> Vec<u32> {
        products.iter().map(|product| product.id.get()).collect()
    }

    #[test]
    fn default_query_sorts_by_rating_within_price_cap() {
        let products = products();
        let result = ProductQuery::default().apply(products.iter());

        // The camera kit is above the default 1500 cap.
        assert_eq!(ids(&result), vec![1, 2, 3]);
    }

    #[test]
    fn category_filter_and_all_pseudo_category() {
        let products = products();

        let electronics = ProductQuery::default()
            .with_category("Electronics")
            .with_price_range(Decimal::ZERO, Decimal::from(5_000))
            .apply(products.iter());

        let everything = ProductQuery::default()
            .with_category("All")
            .with_price_range(Decimal::ZERO, Decimal::from(5_000))
            .apply(products.iter());

        assert_eq!(ids(&electronics), vec![4, 1, 3]);
        assert_eq!(everything.len(), 4);
    }

    #[test]
    fn price_filter_uses_effective_price() {
        let products = products();

        // Watch is 400.00 before and 200.00 after its discount.
        let result = ProductQuery::default()
            .with_price_range(Decimal::from(150), Decimal::from(210))
            .apply(products.iter());

        assert_eq!(ids(&result), vec![3]);
    }

    #[test]
    fn search_is_case_insensitive_over_name_description_and_tags() {
        let products = products();

        let by_name = ProductQuery::default().with_search("WATCH").apply(products.iter());
        let by_description = ProductQuery::default().with_search("crystal").apply(products.iter());
        let by_tag = ProductQuery::default().with_search("wireless").apply(products.iter());
        let blank = ProductQuery::default().with_search("   ").apply(products.iter());

        assert_eq!(ids(&by_name), vec![3]);
        assert_eq!(ids(&by_description), vec![1]);
        assert_eq!(ids(&by_tag), vec![1]);
        assert_eq!(blank.len(), 3);
    }

    #[test]
    fn sort_orders() {
        let products = products();
        let query = ProductQuery::default().with_price_range(Decimal::ZERO, Decimal::from(5_000));

        let low = query.clone().sorted_by(SortOrder::PriceLow).apply(products.iter());
        let high = query.clone().sorted_by(SortOrder::PriceHigh).apply(products.iter());
        let rating = query.clone().sorted_by(SortOrder::Rating).apply(products.iter());
        let newest = query.sorted_by(SortOrder::Newest).apply(products.iter());

        assert_eq!(ids(&low), vec![3, 2, 1, 4]);
        assert_eq!(ids(&high), vec![4, 1, 2, 3]);
        assert_eq!(ids(&rating), vec![4, 1, 2, 3]);
        assert_eq!(ids(&newest), vec![4, 3, 2, 1]);
    }

    #[test]
    fn sort_order_parses_kebab_case_names() {
        assert_eq!(SortOrder::from_str("price-low", false), Ok(SortOrder::PriceLow));
        assert_eq!(SortOrder::from_str("newest", false), Ok(SortOrder::Newest));
        assert!(SortOrder::from_str("cheapest", false).is_err());
    }
}
