//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartTotals, CouponOutcome, LineItem, PricedLine, QuantityUpdate},
    catalog::{Catalog, CatalogError, ProductLookup, ProductQuery, SortOrder},
    fixtures::{Fixture, FixtureError},
    pricing::{Coupon, PricingError, PricingRules},
    products::{Product, ProductId, ProductKey},
    receipt::{
        Receipt, ReceiptError,
        listing::{write_product_detail, write_product_table},
    },
    session::{AuthError, Authenticator, Credentials, DemoAuthenticator, Session, User},
    tags::Tags,
};
