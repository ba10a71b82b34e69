//! SKU allocation on top of a product store.
//!
//! [`InventoryService`] combines a [`Repository`](lodestone_core::Repository)
//! with an [`Odometer`](lodestone_sku::Odometer) and implements
//! [`SkuAllocator`](lodestone_core::SkuAllocator).

pub mod service;

pub use service::InventoryService;
