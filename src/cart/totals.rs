//! Cart totals
//!
//! Totals are derived from the cart and the catalog's current prices on every
//! call. Arithmetic stays in exact decimals; amounts are only rounded to cents
//! when they are turned into [`Money`] at the very end.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::{
    cart::{Cart, LineItem},
    catalog::ProductLookup,
    pricing::{PricingError, to_money},
    products::Product,
};

/// Order summary for a cart, rounded to cents for display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CartTotals {
    subtotal: Money<'static, Currency>,
    shipping: Money<'static, Currency>,
    tax: Money<'static, Currency>,
    discount: Money<'static, Currency>,
    grand_total: Money<'static, Currency>,
    item_count: u32,
}

impl CartTotals {
    /// Sum of effective unit price times quantity over all lines.
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// Shipping fee, zero when shipping is free.
    pub fn shipping(&self) -> Money<'static, Currency> {
        self.shipping
    }

    /// Sales tax on the subtotal.
    pub fn tax(&self) -> Money<'static, Currency> {
        self.tax
    }

    /// Coupon discount, zero when no coupon is applied.
    pub fn discount(&self) -> Money<'static, Currency> {
        self.discount
    }

    /// Subtotal plus shipping and tax, less the discount. Never negative.
    pub fn grand_total(&self) -> Money<'static, Currency> {
        self.grand_total
    }

    /// Units across all lines.
    pub fn item_count(&self) -> u32 {
        self.item_count
    }

    /// Returns true if shipping is free.
    pub fn free_shipping(&self) -> bool {
        self.shipping.to_minor_units() == 0
    }
}

/// A cart line joined with its product and priced for display.
#[derive(Clone, Debug)]
pub struct PricedLine<'a> {
    /// The cart line.
    pub line: LineItem,

    /// The catalog product.
    pub product: &'a Product,

    /// Effective unit price.
    pub unit_price: Money<'static, Currency>,

    /// Effective unit price times quantity.
    pub line_total: Money<'static, Currency>,
}

pub(super) fn compute_totals(
    cart: &Cart,
    catalog: &impl ProductLookup,
) -> Result<CartTotals, PricingError> {
    let currency = catalog.currency();
    let rules = cart.rules();

    let subtotal = cart.lines().iter().try_fold(Decimal::ZERO, |acc, line| {
        let product = product_for(catalog, line)?;

        line_amount(product, line)?
            .checked_add(acc)
            .ok_or(PricingError::Overflow)
    })?;

    let shipping = if cart.is_empty() {
        Decimal::ZERO
    } else {
        rules.shipping_for(subtotal)
    };

    let tax = rules.tax_for(subtotal)?;

    let discount = if cart.coupon_applied() {
        rules.discount_for(subtotal)?
    } else {
        Decimal::ZERO
    };

    let grand_total = subtotal
        .checked_add(shipping)
        .and_then(|total| total.checked_add(tax))
        .and_then(|total| total.checked_sub(discount))
        .ok_or(PricingError::Overflow)?
        .max(Decimal::ZERO);

    Ok(CartTotals {
        subtotal: to_money(subtotal, currency)?,
        shipping: to_money(shipping, currency)?,
        tax: to_money(tax, currency)?,
        discount: to_money(discount, currency)?,
        grand_total: to_money(grand_total, currency)?,
        item_count: cart.item_count(),
    })
}

pub(super) fn price_lines<'c>(
    cart: &Cart,
    catalog: &'c impl ProductLookup,
) -> Result<Vec<PricedLine<'c>>, PricingError> {
    let currency = catalog.currency();

    cart.lines()
        .iter()
        .map(|line| {
            let product = product_for(catalog, line)?;

            Ok(PricedLine {
                line: *line,
                product,
                unit_price: to_money(product.effective_price(), currency)?,
                line_total: to_money(line_amount(product, line)?, currency)?,
            })
        })
        .collect()
}

fn product_for<'c>(
    catalog: &'c impl ProductLookup,
    line: &LineItem,
) -> Result<&'c Product, PricingError> {
    catalog
        .product_by_id(line.product())
        .ok_or(PricingError::MissingProduct(line.product()))
}

fn line_amount(product: &Product, line: &LineItem) -> Result<Decimal, PricingError> {
    product
        .effective_price()
        .checked_mul(Decimal::from(line.quantity()))
        .ok_or(PricingError::Overflow)
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::{
        catalog::{Catalog, CatalogError},
        products::ProductId,
    };

    use super::*;

    const HUNDRED: ProductId = ProductId::new(1);
    const FIFTY: ProductId = ProductId::new(2);
    const WATCH: ProductId = ProductId::new(3);

    fn catalog() -> Result<Catalog, CatalogError> {
        Catalog::with_products(
            [
                Product {
                    discount: Some(Percentage::from(Decimal::new(15, 2))),
                    ..Product::new(HUNDRED, "Hundred", Money::from_minor(10_000, USD))
                },
                Product::new(FIFTY, "Fifty", Money::from_minor(5_000, USD)),
                Product {
                    discount: Some(Percentage::from(Decimal::new(15, 2))),
                    ..Product::new(WATCH, "Watch", Money::from_minor(19_999, USD))
                },
            ],
            USD,
        )
    }

    fn usd(minor: i64) -> Money<'static, Currency> {
        Money::from_minor(minor, USD)
    }

    #[test]
    fn discounted_product_over_free_shipping_threshold() -> TestResult {
        let catalog = catalog()?;
        let mut cart = Cart::new();

        cart.add(&catalog, HUNDRED, 2)?;

        let totals = cart.compute_totals(&catalog)?;

        assert_eq!(totals.subtotal(), usd(17_000));
        assert_eq!(totals.shipping(), usd(0));
        assert_eq!(totals.tax(), usd(1_360));
        assert_eq!(totals.discount(), usd(0));
        assert_eq!(totals.grand_total(), usd(18_360));
        assert!(totals.free_shipping());

        Ok(())
    }

    #[test]
    fn coupon_under_free_shipping_threshold() -> TestResult {
        let catalog = catalog()?;
        let mut cart = Cart::new();

        cart.add(&catalog, FIFTY, 1)?;
        cart.apply_coupon("DISCOUNT20")?;

        let totals = cart.compute_totals(&catalog)?;

        assert_eq!(totals.subtotal(), usd(5_000));
        assert_eq!(totals.shipping(), usd(999));
        assert_eq!(totals.tax(), usd(400));
        assert_eq!(totals.discount(), usd(1_000));
        assert_eq!(totals.grand_total(), usd(5_399));

        Ok(())
    }

    #[test]
    fn discount_tracks_later_cart_changes() -> TestResult {
        let catalog = catalog()?;
        let mut cart = Cart::new();

        cart.add(&catalog, FIFTY, 1)?;
        cart.apply_coupon("DISCOUNT20")?;
        cart.add(&catalog, FIFTY, 1)?;

        let totals = cart.compute_totals(&catalog)?;

        assert_eq!(totals.discount(), usd(2_000));

        Ok(())
    }

    #[test]
    fn rounding_happens_once_at_the_end() -> TestResult {
        let catalog = catalog()?;
        let mut cart = Cart::new();

        // 169.9915 * 3 = 509.9745
        cart.add(&catalog, WATCH, 3)?;

        let totals = cart.compute_totals(&catalog)?;

        assert_eq!(totals.subtotal(), usd(50_997));
        // 509.9745 * 0.08 = 40.79796
        assert_eq!(totals.tax(), usd(4_080));
        // 509.9745 + 40.79796 = 550.77246
        assert_eq!(totals.grand_total(), usd(55_077));

        Ok(())
    }

    #[test]
    fn empty_cart_totals_are_zero() -> TestResult {
        let catalog = catalog()?;
        let cart = Cart::new();

        let totals = cart.compute_totals(&catalog)?;

        assert_eq!(totals.subtotal(), usd(0));
        assert_eq!(totals.shipping(), usd(0));
        assert_eq!(totals.grand_total(), usd(0));
        assert_eq!(totals.item_count(), 0);

        Ok(())
    }

    #[test]
    fn compute_totals_is_pure() -> TestResult {
        let catalog = catalog()?;
        let mut cart = Cart::new();

        cart.add(&catalog, WATCH, 1)?;
        cart.add(&catalog, FIFTY, 2)?;
        cart.apply_coupon("discount20")?;

        let first = cart.compute_totals(&catalog)?;
        let second = cart.compute_totals(&catalog)?;

        assert_eq!(first, second);
        assert_eq!(first.item_count(), 3);

        Ok(())
    }

    #[test]
    fn missing_product_is_reported() -> TestResult {
        let catalog = catalog()?;
        let mut cart = Cart::new();

        cart.add(&catalog, WATCH, 1)?;

        let empty = Catalog::new(USD);

        assert_eq!(
            cart.compute_totals(&empty),
            Err(PricingError::MissingProduct(WATCH))
        );

        Ok(())
    }

    #[test]
    fn priced_lines_follow_cart_order() -> TestResult {
        let catalog = catalog()?;
        let mut cart = Cart::new();

        cart.add(&catalog, WATCH, 2)?;
        cart.add(&catalog, FIFTY, 1)?;

        let lines = cart.priced_lines(&catalog)?;
        let summary: Vec<(u32, i64, i64)> = lines
            .iter()
            .map(|priced| {
                (
                    priced.product.id.get(),
                    priced.unit_price.to_minor_units(),
                    priced.line_total.to_minor_units(),
                )
            })
            .collect();

        // 169.9915 * 2 = 339.983
        assert_eq!(summary, vec![(3, 16_999, 33_998), (2, 5_000, 5_000)]);

        Ok(())
    }
}
