//! Pricing
//!
//! Shipping, tax and coupon rules, plus the helpers that move amounts between
//! exact decimal arithmetic and displayable [`Money`].

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::products::ProductId;

/// Minor units per major unit for every currency the storefront prices in.
const MINOR_UNITS: Decimal = Decimal::ONE_HUNDRED;

/// Decimal places kept when an amount is presented.
const DISPLAY_DP: u32 = 2;

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A line item refers to a product the catalog no longer knows about.
    #[error("product {0} is not in the catalog")]
    MissingProduct(ProductId),

    /// An intermediate amount could not be represented.
    #[error("amount overflowed while pricing the cart")]
    Overflow,
}

/// The single discount code a session may redeem.
#[derive(Debug, Clone)]
pub struct Coupon {
    /// Code the customer types in. Matched case-insensitively.
    pub code: String,

    /// Share of the subtotal taken off once the coupon is applied.
    pub discount: Percentage,
}

impl Coupon {
    /// Returns true if `input` names this coupon.
    pub fn matches(&self, input: &str) -> bool {
        self.code.eq_ignore_ascii_case(input.trim())
    }
}

/// Shipping, tax and coupon rules used when cart totals are computed.
#[derive(Debug, Clone)]
pub struct PricingRules {
    /// Subtotals strictly above this amount ship for free.
    pub free_shipping_over: Decimal,

    /// Flat shipping fee charged otherwise.
    pub shipping_fee: Decimal,

    /// Sales tax charged on the subtotal.
    pub tax_rate: Percentage,

    /// The session coupon.
    pub coupon: Coupon,
}

impl PricingRules {
    /// Shipping charged for a non-empty cart with the given subtotal.
    pub fn shipping_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal > self.free_shipping_over {
            Decimal::ZERO
        } else {
            self.shipping_fee
        }
    }

    /// Tax charged on the given subtotal.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the product cannot be represented.
    pub fn tax_for(&self, subtotal: Decimal) -> Result<Decimal, PricingError> {
        percent_of(self.tax_rate, subtotal)
    }

    /// Coupon discount on the given subtotal.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the product cannot be represented.
    pub fn discount_for(&self, subtotal: Decimal) -> Result<Decimal, PricingError> {
        percent_of(self.coupon.discount, subtotal)
    }
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            free_shipping_over: Decimal::ONE_HUNDRED,
            shipping_fee: Decimal::new(999, 2),
            tax_rate: Percentage::from(Decimal::new(8, 2)),
            coupon: Coupon {
                code: "DISCOUNT20".to_string(),
                discount: Percentage::from(Decimal::new(20, 2)),
            },
        }
    }
}

/// Converts a percentage into its fractional decimal value (e.g. 15% -> 0.15).
pub fn fraction(percent: Percentage) -> Decimal {
    // decimal_percentage doesn't expose the inner value
    percent * Decimal::ONE
}

/// Applies a percentage to an amount.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product cannot be represented.
pub fn percent_of(percent: Percentage, amount: Decimal) -> Result<Decimal, PricingError> {
    fraction(percent)
        .checked_mul(amount)
        .ok_or(PricingError::Overflow)
}

/// Converts minor units (pence/cents) into an exact major-unit decimal.
pub fn minor_to_decimal(minor: i64) -> Decimal {
    Decimal::new(minor, DISPLAY_DP)
}

/// Rounds an exact amount to two decimal places for presentation.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the rounded amount does not fit in minor units.
pub fn to_money(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    amount
        .round_dp_with_strategy(DISPLAY_DP, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(MINOR_UNITS)
        .and_then(|minor| minor.to_i64())
        .map(|minor| Money::from_minor(minor, currency))
        .ok_or(PricingError::Overflow)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn default_rules_match_storefront_policy() {
        let rules = PricingRules::default();

        assert_eq!(rules.free_shipping_over, Decimal::new(100, 0));
        assert_eq!(rules.shipping_fee, Decimal::new(999, 2));
        assert_eq!(fraction(rules.tax_rate), Decimal::new(8, 2));
        assert_eq!(rules.coupon.code, "DISCOUNT20");
        assert_eq!(fraction(rules.coupon.discount), Decimal::new(20, 2));
    }

    #[test]
    fn shipping_is_free_only_strictly_above_threshold() {
        let rules = PricingRules::default();

        assert_eq!(rules.shipping_for(Decimal::new(50, 0)), Decimal::new(999, 2));
        assert_eq!(rules.shipping_for(Decimal::new(100, 0)), Decimal::new(999, 2));
        assert_eq!(rules.shipping_for(Decimal::new(10001, 2)), Decimal::ZERO);
    }

    #[test]
    fn tax_and_discount_are_fractions_of_subtotal() -> TestResult {
        let rules = PricingRules::default();

        assert_eq!(rules.tax_for(Decimal::new(170, 0))?, Decimal::new(1360, 2));
        assert_eq!(rules.discount_for(Decimal::new(50, 0))?, Decimal::new(10, 0));

        Ok(())
    }

    #[test]
    fn coupon_match_ignores_case_and_whitespace() {
        let rules = PricingRules::default();

        assert!(rules.coupon.matches("discount20"));
        assert!(rules.coupon.matches("  Discount20 "));
        assert!(!rules.coupon.matches("DISCOUNT30"));
        assert!(!rules.coupon.matches(""));
    }

    #[test]
    fn minor_to_decimal_is_exact() {
        assert_eq!(minor_to_decimal(29_999), Decimal::new(29_999, 2));
        assert_eq!(minor_to_decimal(0), Decimal::ZERO);
    }

    #[test]
    fn to_money_rounds_half_away_from_zero() -> TestResult {
        assert_eq!(
            to_money(Decimal::new(1_699_915, 4), USD)?,
            Money::from_minor(16_999, USD)
        );
        assert_eq!(to_money(Decimal::new(1_005, 3), USD)?, Money::from_minor(101, USD));
        assert_eq!(to_money(Decimal::new(136, 1), USD)?, Money::from_minor(1_360, USD));

        Ok(())
    }

    #[test]
    fn to_money_reports_overflow() {
        let result = to_money(Decimal::MAX, USD);

        assert_eq!(result, Err(PricingError::Overflow));
    }
}
