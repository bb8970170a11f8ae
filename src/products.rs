//! Products

use std::{fmt, num::ParseIntError, str::FromStr};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;
use smallvec::SmallVec;

use crate::{
    pricing::{PricingError, minor_to_decimal, percent_of, to_money},
    tags::Tags,
};

new_key_type! {
    /// Catalog storage key
    pub struct ProductKey;
}

/// Stable, customer-facing product identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(u32);

impl ProductId {
    /// Wraps a raw product id.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl FromStr for ProductId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product
#[derive(Debug, Clone)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Base unit price, before any product discount
    pub price: Money<'static, Currency>,

    /// Category the product is listed under
    pub category: String,

    /// Average customer rating, 0 to 5
    pub rating: f64,

    /// Image URL
    pub image: String,

    /// Long-form description
    pub description: String,

    /// Feature bullet points, in display order
    pub features: SmallVec<[String; 5]>,

    /// Whether the product can currently be bought
    pub in_stock: bool,

    /// Optional product discount, in `[0, 1)`
    pub discount: Option<Percentage>,

    /// Product tags
    pub tags: Tags,
}

impl Product {
    /// Creates an in-stock, undiscounted product with empty descriptive fields.
    pub fn new(id: ProductId, name: impl Into<String>, price: Money<'static, Currency>) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            category: String::new(),
            rating: 0.0,
            image: String::new(),
            description: String::new(),
            features: SmallVec::new(),
            in_stock: true,
            discount: None,
            tags: Tags::empty(),
        }
    }

    /// Base unit price as an exact decimal in major units.
    pub fn base_price(&self) -> Decimal {
        minor_to_decimal(self.price.to_minor_units())
    }

    /// Unit price after the product discount, at full precision.
    ///
    /// A discount that cannot be represented leaves the base price unchanged.
    pub fn effective_price(&self) -> Decimal {
        let base = self.base_price();

        match self.discount {
            Some(discount) => percent_of(discount, base)
                .ok()
                .and_then(|off| base.checked_sub(off))
                .unwrap_or(base),
            None => base,
        }
    }

    /// Unit price after the product discount, rounded for display.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the price does not fit in minor units.
    pub fn display_price(&self) -> Result<Money<'static, Currency>, PricingError> {
        to_money(self.effective_price(), self.price.currency())
    }

    /// Returns true if the product carries a discount.
    pub fn is_discounted(&self) -> bool {
        self.discount.is_some()
    }

    /// Case-insensitive substring match over name, description and tags.
    ///
    /// `needle` must already be lower case.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.any_contains(needle)
    }
}
