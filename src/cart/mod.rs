//! Cart
//!
//! The session's cart ledger. Every write goes through one of the operations
//! below, which keep two invariants:
//!
//! - at most one [`LineItem`] per product
//! - every stored quantity is at least one

use tracing::{debug, warn};

use crate::{
    catalog::ProductLookup,
    pricing::{PricingError, PricingRules},
    products::ProductId,
};

mod errors;
pub mod totals;

pub use errors::CartError;
pub use totals::{CartTotals, PricedLine};

/// A product and how many of it are in the cart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineItem {
    product: ProductId,
    quantity: u32,
}

impl LineItem {
    /// Product this line refers to.
    pub fn product(&self) -> ProductId {
        self.product
    }

    /// Quantity, always at least one.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Result of a quantity update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// The line now has the given quantity.
    Updated(LineItem),

    /// The quantity dropped to zero and the line was removed.
    Removed,

    /// The product was not in the cart; nothing changed.
    NotInCart,
}

/// Result of a successful coupon submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CouponOutcome {
    /// The coupon is now active.
    Applied,

    /// The coupon was already active; nothing changed.
    AlreadyApplied,
}

/// Cart
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<LineItem>,
    coupon_applied: bool,
    rules: PricingRules,
}

impl Cart {
    /// Create an empty cart priced with the default rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cart priced with the given rules.
    #[must_use]
    pub fn with_rules(rules: PricingRules) -> Self {
        Self {
            lines: Vec::new(),
            coupon_applied: false,
            rules,
        }
    }

    /// Add `quantity` of a product, merging with an existing line.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`] if `quantity` is zero or the line would overflow.
    /// - [`CartError::NotAvailable`] if the product is unknown or out of stock.
    pub fn add(
        &mut self,
        catalog: &impl ProductLookup,
        product: ProductId,
        quantity: u32,
    ) -> Result<LineItem, CartError> {
        if quantity == 0 {
            warn!(%product, "rejected add with zero quantity");

            return Err(CartError::InvalidQuantity(quantity.to_string()));
        }

        available(catalog, product)?;

        if let Some(line) = self.lines.iter_mut().find(|line| line.product == product) {
            line.quantity = line
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| CartError::InvalidQuantity(quantity.to_string()))?;

            debug!(%product, quantity = line.quantity, "increased line quantity");

            return Ok(*line);
        }

        let line = LineItem { product, quantity };

        self.lines.push(line);

        debug!(%product, quantity, "added line to cart");

        Ok(line)
    }

    /// Remove a product's line. Removing an absent product does nothing.
    pub fn remove(&mut self, product: ProductId) {
        let before = self.lines.len();

        self.lines.retain(|line| line.product != product);

        if self.lines.len() < before {
            debug!(%product, "removed line from cart");
        }
    }

    /// Set a line's quantity. Zero or below removes the line; absent products are left alone.
    ///
    /// Raising the quantity of a product that is no longer available is refused, lowering
    /// it is always allowed.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotAvailable`] when raising the quantity of an unavailable product.
    /// - [`CartError::InvalidQuantity`] if `quantity` does not fit a line quantity.
    pub fn update_quantity(
        &mut self,
        catalog: &impl ProductLookup,
        product: ProductId,
        quantity: i64,
    ) -> Result<QuantityUpdate, CartError> {
        let Some(position) = self.lines.iter().position(|line| line.product == product) else {
            debug!(%product, "ignored quantity update for product not in cart");

            return Ok(QuantityUpdate::NotInCart);
        };

        if quantity <= 0 {
            self.lines.remove(position);

            debug!(%product, "quantity dropped to zero; removed line");

            return Ok(QuantityUpdate::Removed);
        }

        let quantity = u32::try_from(quantity)
            .map_err(|_err| CartError::InvalidQuantity(quantity.to_string()))?;

        let Some(line) = self.lines.get_mut(position) else {
            return Ok(QuantityUpdate::NotInCart);
        };

        if quantity > line.quantity {
            available(catalog, product)?;
        }

        line.quantity = quantity;

        debug!(%product, quantity, "set line quantity");

        Ok(QuantityUpdate::Updated(*line))
    }

    /// Set a line's quantity from raw user input, which must be a positive integer.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`] for non-numeric, zero or negative input.
    /// - Any error from [`Cart::update_quantity`].
    pub fn update_quantity_from_input(
        &mut self,
        catalog: &impl ProductLookup,
        product: ProductId,
        input: &str,
    ) -> Result<QuantityUpdate, CartError> {
        let quantity = parse_quantity(input)?;

        self.update_quantity(catalog, product, i64::from(quantity))
    }

    /// Raise a line's quantity by one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotAvailable`] if the product is no longer available.
    pub fn increment(
        &mut self,
        catalog: &impl ProductLookup,
        product: ProductId,
    ) -> Result<QuantityUpdate, CartError> {
        match self.quantity_of(product) {
            Some(quantity) => self.update_quantity(catalog, product, i64::from(quantity) + 1),
            None => Ok(QuantityUpdate::NotInCart),
        }
    }

    /// Lower a line's quantity by one, removing it when it reaches zero.
    ///
    /// # Errors
    ///
    /// Never fails in practice; shares [`Cart::update_quantity`]'s signature.
    pub fn decrement(
        &mut self,
        catalog: &impl ProductLookup,
        product: ProductId,
    ) -> Result<QuantityUpdate, CartError> {
        match self.quantity_of(product) {
            Some(quantity) => self.update_quantity(catalog, product, i64::from(quantity) - 1),
            None => Ok(QuantityUpdate::NotInCart),
        }
    }

    /// Remove every line. An applied coupon stays applied for the session.
    pub fn clear(&mut self) {
        self.lines.clear();

        debug!("cleared cart");
    }

    /// Remove every line and forget the coupon.
    pub fn reset(&mut self) {
        self.lines.clear();
        self.coupon_applied = false;

        debug!("reset cart");
    }

    /// Redeem the session coupon. Applying it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidCoupon`] if `code` is not the session coupon.
    pub fn apply_coupon(&mut self, code: &str) -> Result<CouponOutcome, CartError> {
        if !self.rules.coupon.matches(code) {
            warn!(code, "rejected coupon code");

            return Err(CartError::InvalidCoupon(code.to_string()));
        }

        if self.coupon_applied {
            debug!("coupon already applied");

            return Ok(CouponOutcome::AlreadyApplied);
        }

        self.coupon_applied = true;

        debug!(code = %self.rules.coupon.code, "applied coupon");

        Ok(CouponOutcome::Applied)
    }

    /// Compute subtotal, shipping, tax, discount and grand total from scratch.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a line's product is missing from the catalog
    /// or an amount overflows.
    pub fn compute_totals(&self, catalog: &impl ProductLookup) -> Result<CartTotals, PricingError> {
        totals::compute_totals(self, catalog)
    }

    /// Price each line for display.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a line's product is missing from the catalog
    /// or an amount overflows.
    pub fn priced_lines<'c>(
        &self,
        catalog: &'c impl ProductLookup,
    ) -> Result<Vec<PricedLine<'c>>, PricingError> {
        totals::price_lines(self, catalog)
    }

    /// Lines in the order products were first added.
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Quantity of a product in the cart, if present.
    pub fn quantity_of(&self, product: ProductId) -> Option<u32> {
        self.lines
            .iter()
            .find(|line| line.product == product)
            .map(LineItem::quantity)
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether the session coupon is active.
    pub fn coupon_applied(&self) -> bool {
        self.coupon_applied
    }

    /// Pricing rules used by this cart.
    pub fn rules(&self) -> &PricingRules {
        &self.rules
    }
}

/// Parse a quantity typed by the customer.
///
/// # Errors
///
/// Returns [`CartError::InvalidQuantity`] unless `input` is a positive integer.
pub fn parse_quantity(input: &str) -> Result<u32, CartError> {
    match input.trim().parse::<u32>() {
        Ok(quantity) if quantity > 0 => Ok(quantity),
        _ => Err(CartError::InvalidQuantity(input.to_string())),
    }
}

fn available(catalog: &impl ProductLookup, product: ProductId) -> Result<(), CartError> {
    match catalog.product_by_id(product) {
        Some(found) if found.in_stock => Ok(()),
        _ => {
            warn!(%product, "product is not available");

            Err(CartError::NotAvailable(product))
        }
    }
}
