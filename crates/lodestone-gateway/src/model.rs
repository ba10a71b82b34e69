mod health;
mod product;
mod sku;

pub use health::HealthResponse;
pub use product::{CreateProductRequest, ProductResponse};
pub use sku::{CheckSkuRequest, CheckSkuResponse, NextSkuResponse};

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
