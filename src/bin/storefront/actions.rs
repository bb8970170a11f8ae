//! Cart actions given on the command line

use std::{fmt, str::FromStr};

use storefront::{
    cart::{Cart, CartError},
    catalog::ProductLookup,
    products::ProductId,
};
use thiserror::Error;
use tracing::{info, warn};

/// Errors parsing a cart action argument.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ActionParseError {
    /// The action name or shape was not recognised.
    #[error("unknown cart action {0:?}, expected add:ID[:QTY], remove:ID, set:ID:QTY, inc:ID, dec:ID, coupon:CODE or clear")]
    Unknown(String),

    /// The product id was not a number.
    #[error("invalid product id in {0:?}")]
    ProductId(String),

    /// The quantity was not a number.
    #[error("invalid quantity in {0:?}")]
    Quantity(String),
}

/// One ledger operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CartAction {
    Add { product: ProductId, quantity: u32 },
    Remove(ProductId),
    Set { product: ProductId, input: String },
    Increment(ProductId),
    Decrement(ProductId),
    Coupon(String),
    Clear,
}

impl CartAction {
    /// Run the action against the cart.
    pub(crate) fn apply(&self, cart: &mut Cart, catalog: &impl ProductLookup) -> Result<(), CartError> {
        match self {
            CartAction::Add { product, quantity } => {
                cart.add(catalog, *product, *quantity)?;
            }
            CartAction::Remove(product) => cart.remove(*product),
            CartAction::Set { product, input } => {
                cart.update_quantity_from_input(catalog, *product, input)?;
            }
            CartAction::Increment(product) => {
                cart.increment(catalog, *product)?;
            }
            CartAction::Decrement(product) => {
                cart.decrement(catalog, *product)?;
            }
            CartAction::Coupon(code) => {
                cart.apply_coupon(code)?;
            }
            CartAction::Clear => cart.clear(),
        }

        Ok(())
    }
}

/// Run actions in order. Rejected actions are logged and skipped.
pub(crate) fn apply_all(actions: &[CartAction], cart: &mut Cart, catalog: &impl ProductLookup) {
    for action in actions {
        match action.apply(cart, catalog) {
            Ok(()) => info!(%action, "applied cart action"),
            Err(error) => warn!(%action, %error, "skipped cart action"),
        }
    }
}

impl FromStr for CartAction {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();

        let product = |raw: &str| {
            raw.parse::<ProductId>()
                .map_err(|_err| ActionParseError::ProductId(s.to_string()))
        };

        match parts.as_slice() {
            ["add", id] => Ok(CartAction::Add {
                product: product(*id)?,
                quantity: 1,
            }),
            ["add", id, quantity] => Ok(CartAction::Add {
                product: product(*id)?,
                quantity: quantity
                    .trim()
                    .parse()
                    .map_err(|_err| ActionParseError::Quantity(s.to_string()))?,
            }),
            ["remove", id] => Ok(CartAction::Remove(product(*id)?)),
            ["set", id, input] => Ok(CartAction::Set {
                product: product(*id)?,
                input: (*input).to_string(),
            }),
            ["inc", id] => Ok(CartAction::Increment(product(*id)?)),
            ["dec", id] => Ok(CartAction::Decrement(product(*id)?)),
            ["coupon", code] => Ok(CartAction::Coupon((*code).to_string())),
            ["clear"] => Ok(CartAction::Clear),
            _ => Err(ActionParseError::Unknown(s.to_string())),
        }
    }
}

impl fmt::Display for CartAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartAction::Add { product, quantity } => write!(f, "add:{product}:{quantity}"),
            CartAction::Remove(product) => write!(f, "remove:{product}"),
            CartAction::Set { product, input } => write!(f, "set:{product}:{input}"),
            CartAction::Increment(product) => write!(f, "inc:{product}"),
            CartAction::Decrement(product) => write!(f, "dec:{product}"),
            CartAction::Coupon(code) => write!(f, "coupon:{code}"),
            CartAction::Clear => write!(f, "clear"),
        }
    }
}
