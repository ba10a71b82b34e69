use crate::product::{ProductId, ProductRecord};
use async_trait::async_trait;
use lodestone_sku::Sku;
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, crate::error::InventoryError>;

/// Parameters for registering a product under a chosen SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterProduct {
    pub sku: Sku,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub stock: u32,
}

/// Outcome of checking a proposed SKU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuCheck {
    /// Whether the code is well formed.
    pub valid: bool,
    /// Whether no product holds it. Always `false` for invalid codes.
    pub available: bool,
}

/// How far SKU assignment has progressed across the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuStatus {
    pub assigned: usize,
    pub unassigned: usize,
    pub highest: Option<Sku>,
    pub needs_backfill: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: ProductId,
    pub name: String,
    pub sku: Sku,
}

/// Result of a backfill run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillReport {
    /// Assignments made, in the order they were made.
    pub assignments: Vec<Assignment>,
    /// The SKU a following allocation would receive, if the range is not exhausted.
    pub next_available: Option<Sku>,
}

#[async_trait]
pub trait SkuAllocator: Send + Sync + 'static {
    /// Proposes the SKU after the highest one in use.
    ///
    /// Nothing is reserved: the SKU is only taken once a product is registered
    /// under it.
    async fn next_available(&self) -> Result<Sku>;

    /// Checks whether a code is well formed and free.
    async fn check(&self, code: &str) -> Result<SkuCheck>;

    /// Stores a product under its SKU.
    async fn register(&self, params: RegisterProduct) -> Result<ProductRecord>;

    /// Finds the product stored under a SKU.
    async fn lookup(&self, sku: &Sku) -> Result<Option<ProductRecord>>;

    /// Deletes the product stored under a SKU.
    /// Returns `true` if the product existed and was removed.
    async fn retire(&self, sku: &Sku) -> Result<bool>;

    async fn status(&self) -> Result<SkuStatus>;

    /// Gives consecutive SKUs to every product that lacks one, oldest first.
    async fn backfill(&self) -> Result<BackfillReport>;
}
