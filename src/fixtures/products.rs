//! Product Fixtures

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    pricing::fraction,
    products::{Product, ProductId},
    tags::Tags,
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products in catalog order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product id
    pub id: u32,

    /// Product name
    pub name: String,

    /// Product price (e.g., "299.99 USD")
    pub price: String,

    /// Listing category
    #[serde(default)]
    pub category: String,

    /// Average rating
    #[serde(default)]
    pub rating: f64,

    /// Image URL
    #[serde(default)]
    pub image: String,

    /// Long-form description
    #[serde(default)]
    pub description: String,

    /// Feature bullet points
    #[serde(default)]
    pub features: Vec<String>,

    /// Stock flag, defaults to in stock
    #[serde(default = "in_stock_default")]
    pub in_stock: bool,

    /// Optional product discount (e.g., "15%")
    #[serde(default)]
    pub discount: Option<String>,

    /// Product tags
    #[serde(default)]
    pub tags: Vec<String>,
}

fn in_stock_default() -> bool {
    true
}

impl TryFrom<ProductFixture> for Product {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;
        let price = Money::from_minor(minor_units, currency);

        let discount = fixture
            .discount
            .as_deref()
            .map(parse_discount)
            .transpose()?;

        let tag_refs: Vec<&str> = fixture.tags.iter().map(String::as_str).collect();

        Ok(Product {
            id: ProductId::new(fixture.id),
            name: fixture.name,
            price,
            category: fixture.category,
            rating: fixture.rating,
            image: fixture.image,
            description: fixture.description,
            features: fixture.features.into_iter().collect(),
            in_stock: fixture.in_stock,
            discount,
            tags: Tags::from_strs(&tag_refs),
        })
    }
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = parse_amount(amount).map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

/// Parse a currency-less, non-negative amount (e.g., "9.99").
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPrice`] for malformed or negative amounts.
pub fn parse_amount(s: &str) -> Result<Decimal, FixtureError> {
    let amount = s
        .trim()
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    Ok(amount)
}

/// Parse percentage string (e.g., "15%" or "0.15") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "15%" for 15%
/// - Decimal format: "0.15" for 15%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed or is negative.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    let value = if let Some(percent_str) = trimmed.strip_suffix('%') {
        percent_str
            .trim()
            .parse::<Decimal>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?
            / Decimal::ONE_HUNDRED
    } else {
        trimmed
            .parse::<Decimal>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?
    };

    if value.is_sign_negative() {
        return Err(FixtureError::InvalidPercentage(s.to_string()));
    }

    Ok(Percentage::from(value))
}

/// Parse a product discount, which must lie in `[0%, 100%)`.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPercentage`] for malformed or out of range values.
pub fn parse_discount(s: &str) -> Result<Percentage, FixtureError> {
    let percent = parse_percentage(s)?;

    if fraction(percent) >= Decimal::ONE {
        return Err(FixtureError::InvalidPercentage(s.to_string()));
    }

    Ok(percent)
}
