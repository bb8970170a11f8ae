//! Storefront
//!
//! The core of a small storefront: a read-only product catalog, the session's
//! cart ledger with its derived order totals, a demo login stub and terminal
//! rendering of carts and product listings.

pub mod cart;
pub mod catalog;
pub mod fixtures;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod session;
pub mod tags;
