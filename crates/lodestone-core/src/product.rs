use jiff::Timestamp;
use lodestone_sku::Sku;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Store-assigned identifier of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A product about to be stored.
///
/// `sku` is optional so that products created before locations existed can be
/// stored and backfilled later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub stock: u32,
    pub sku: Option<Sku>,
}

/// A stored product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub sku: Option<Sku>,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub stock: u32,
    /// When the product was stored; backfill assigns locations in this order.
    pub created_at: Timestamp,
}

impl ProductRecord {
    pub fn from_new(id: ProductId, product: NewProduct, created_at: Timestamp) -> Self {
        Self {
            id,
            sku: product.sku,
            name: product.name,
            description: product.description,
            category: product.category,
            stock: product.stock,
            created_at,
        }
    }
}
