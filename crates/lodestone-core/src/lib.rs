//! Core types and traits for the Lodestone inventory.
//!
//! This crate provides the product records, the storage contract and the
//! allocation contract shared by the inventory service, the storage backends
//! and the HTTP gateway. SKU arithmetic itself lives in `lodestone_sku`.

pub mod allocator;
pub mod error;
pub mod product;
pub mod repository;

pub use allocator::{
    Assignment, BackfillReport, RegisterProduct, SkuAllocator, SkuCheck, SkuStatus,
};
pub use error::{InventoryError, StorageError};
pub use lodestone_sku::Sku;
pub use product::{NewProduct, ProductId, ProductRecord};
pub use repository::{ReadRepository, Repository};
