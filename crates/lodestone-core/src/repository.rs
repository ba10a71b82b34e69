use crate::error::Result;
use crate::product::{NewProduct, ProductId, ProductRecord};
use async_trait::async_trait;
use lodestone_sku::Sku;

/// A read-only view of the product store.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the product stored under a SKU.
    /// Returns `None` if no product holds it.
    async fn get(&self, sku: &Sku) -> Result<Option<ProductRecord>>;

    /// Checks whether a SKU is already held by a product.
    async fn exists(&self, sku: &Sku) -> Result<bool>;

    /// Lists every stored SKU as text, in no particular order.
    ///
    /// Backends that predate validation may return values that are not
    /// well-formed SKUs; callers are expected to filter them.
    async fn skus(&self) -> Result<Vec<String>>;

    /// The SKU of the most recently created product that has one.
    async fn latest_sku(&self) -> Result<Option<String>>;

    /// Products without a SKU, oldest first.
    async fn unassigned(&self) -> Result<Vec<ProductRecord>>;
}

/// The product store.
///
/// Every implementation enforces that a SKU is held by at most one product.
/// This is the only guard against two writers assigning the same location.
#[async_trait]
pub trait Repository: ReadRepository {
    /// Stores a new product. Returns `Err(Conflict)` if its SKU is taken.
    async fn insert(&self, product: NewProduct) -> Result<ProductRecord>;

    /// Gives a SKU to a product that has none.
    ///
    /// Returns `Err(Conflict)` if the SKU is taken or the product already has
    /// one, and `Err(NotFound)` if the product does not exist.
    async fn assign_sku(&self, id: ProductId, sku: &Sku) -> Result<()>;

    /// Deletes the product holding a SKU, freeing the SKU.
    /// Returns `true` if such a product existed.
    async fn delete(&self, sku: &Sku) -> Result<bool>;
}
