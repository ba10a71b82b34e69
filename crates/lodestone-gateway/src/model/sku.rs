use lodestone_core::Sku;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct NextSkuResponse {
    pub sku: Sku,
}

/// The code is taken as a plain string so malformed codes get an answer
/// instead of a rejection.
#[derive(Debug, Deserialize)]
pub struct CheckSkuRequest {
    pub sku: String,
}

#[derive(Debug, Serialize)]
pub struct CheckSkuResponse {
    pub sku: String,
    pub valid: bool,
    pub available: bool,
}
