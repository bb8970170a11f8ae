//! Cart errors

use thiserror::Error;

use crate::products::ProductId;

/// Recoverable ledger errors. The cart is left unchanged whenever one is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The product is unknown or out of stock.
    #[error("Product {0} is not available")]
    NotAvailable(ProductId),

    /// A quantity was zero, negative, non-numeric or too large.
    #[error("Invalid quantity: {0:?}")]
    InvalidQuantity(String),

    /// The coupon code was not recognised.
    #[error("Invalid coupon code: {0:?}")]
    InvalidCoupon(String),
}
