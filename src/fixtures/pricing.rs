//! Pricing Fixtures

use serde::Deserialize;

use crate::{
    fixtures::{
        FixtureError,
        products::{parse_amount, parse_discount, parse_percentage},
    },
    pricing::{Coupon, PricingRules},
};

/// Pricing rules in YAML. Omitted fields keep their default values.
#[derive(Debug, Default, Deserialize)]
pub struct PricingFixture {
    /// Subtotals strictly above this ship for free (e.g., "100.00")
    pub free_shipping_over: Option<String>,

    /// Flat shipping fee (e.g., "9.99")
    pub shipping_fee: Option<String>,

    /// Sales tax rate (e.g., "8%")
    pub tax_rate: Option<String>,

    /// The session coupon
    pub coupon: Option<CouponFixture>,
}

/// Coupon fixture
#[derive(Debug, Deserialize)]
pub struct CouponFixture {
    /// Code the customer types in
    pub code: String,

    /// Discount on the subtotal (e.g., "20%")
    pub discount: String,
}

impl TryFrom<PricingFixture> for PricingRules {
    type Error = FixtureError;

    fn try_from(fixture: PricingFixture) -> Result<Self, Self::Error> {
        let mut rules = PricingRules::default();

        if let Some(threshold) = fixture.free_shipping_over {
            rules.free_shipping_over = parse_amount(&threshold)?;
        }

        if let Some(fee) = fixture.shipping_fee {
            rules.shipping_fee = parse_amount(&fee)?;
        }

        if let Some(rate) = fixture.tax_rate {
            rules.tax_rate = parse_percentage(&rate)?;
        }

        if let Some(coupon) = fixture.coupon {
            rules.coupon = Coupon {
                code: coupon.code.trim().to_string(),
                discount: parse_discount(&coupon.discount)?,
            };
        }

        Ok(rules)
    }
}
