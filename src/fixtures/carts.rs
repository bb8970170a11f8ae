//! Cart Fixtures

use serde::Deserialize;

use crate::products::ProductId;

/// Wrapper for a seeded cart in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Lines in the order they are added
    pub items: Vec<CartItemFixture>,
}

/// Cart line fixture
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CartItemFixture {
    /// Product id
    pub product: u32,

    /// Quantity to add, defaults to one
    #[serde(default = "quantity_default")]
    pub quantity: u32,
}

impl CartItemFixture {
    /// Product id of the line.
    pub fn product_id(&self) -> ProductId {
        ProductId::new(self.product)
    }
}

fn quantity_default() -> u32 {
    1
}
