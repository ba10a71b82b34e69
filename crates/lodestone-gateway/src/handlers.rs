mod health;
mod product;
mod sku;

pub use health::health_handler;
pub use product::{create_product_handler, delete_product_handler, get_product_handler};
pub use sku::{backfill_handler, check_sku_handler, next_sku_handler, status_handler};

use crate::error::Result;
use lodestone_core::{InventoryError, Sku};

fn parse_sku(code: &str) -> Result<Sku> {
    Ok(code.parse::<Sku>().map_err(InventoryError::from)?)
}
