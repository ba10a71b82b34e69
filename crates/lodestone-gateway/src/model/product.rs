use jiff::Timestamp;
use lodestone_core::{ProductId, ProductRecord, Sku};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub stock: u32,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub sku: Option<Sku>,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub stock: u32,
    pub created_at: Timestamp,
}

impl From<ProductRecord> for ProductResponse {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            sku: record.sku,
            name: record.name,
            description: record.description,
            category: record.category,
            stock: record.stock,
            created_at: record.created_at,
        }
    }
}
