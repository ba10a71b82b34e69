use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use lodestone_core::error::{Result, StorageError};
use lodestone_core::{NewProduct, ProductId, ProductRecord, ReadRepository, Repository, Sku};
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory implementation of the Repository trait using DashMap.
///
/// Products live in one map and a second map indexes them by SKU. Writers
/// claim a SKU through the index's entry API, which holds the shard lock for
/// that key, so two concurrent inserts of the same SKU cannot both succeed.
/// The index is always locked before the product map.
#[derive(Debug)]
pub struct InMemoryRepository {
    products: DashMap<ProductId, ProductRecord>,
    by_sku: DashMap<Sku, ProductId>,
    last_id: AtomicU64,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            products: DashMap::new(),
            by_sku: DashMap::new(),
            last_id: AtomicU64::new(0),
        }
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            products: DashMap::with_capacity(capacity),
            by_sku: DashMap::with_capacity(capacity),
            last_id: AtomicU64::new(0),
        }
    }

    fn next_id(&self) -> ProductId {
        ProductId(self.last_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, sku: &Sku) -> Result<Option<ProductRecord>> {
        let Some(id) = self.by_sku.get(sku).map(|entry| *entry) else {
            return Ok(None);
        };
        Ok(self.products.get(&id).map(|entry| entry.clone()))
    }

    async fn exists(&self, sku: &Sku) -> Result<bool> {
        Ok(self.by_sku.contains_key(sku))
    }

    async fn skus(&self) -> Result<Vec<String>> {
        Ok(self
            .by_sku
            .iter()
            .map(|entry| entry.key().to_string())
            .collect())
    }

    async fn latest_sku(&self) -> Result<Option<String>> {
        Ok(self
            .products
            .iter()
            .filter_map(|entry| entry.sku.map(|sku| (entry.created_at, entry.id, sku)))
            .max_by_key(|(created_at, id, _)| (*created_at, *id))
            .map(|(_, _, sku)| sku.to_string()))
    }

    async fn unassigned(&self) -> Result<Vec<ProductRecord>> {
        let mut products: Vec<ProductRecord> = self
            .products
            .iter()
            .filter(|entry| entry.sku.is_none())
            .map(|entry| entry.clone())
            .collect();
        products.sort_by_key(|product| (product.created_at, product.id));
        Ok(products)
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, product: NewProduct) -> Result<ProductRecord> {
        let record = ProductRecord::from_new(self.next_id(), product, Timestamp::now());

        let Some(sku) = record.sku else {
            self.products.insert(record.id, record.clone());
            return Ok(record);
        };

        match self.by_sku.entry(sku) {
            Entry::Occupied(_) => Err(StorageError::Conflict(sku.to_string())),
            Entry::Vacant(slot) => {
                self.products.insert(record.id, record.clone());
                slot.insert(record.id);
                Ok(record)
            }
        }
    }

    async fn assign_sku(&self, id: ProductId, sku: &Sku) -> Result<()> {
        let Entry::Vacant(slot) = self.by_sku.entry(*sku) else {
            return Err(StorageError::Conflict(sku.to_string()));
        };

        let Some(mut product) = self.products.get_mut(&id) else {
            return Err(StorageError::NotFound(format!("product {id}")));
        };
        if let Some(existing) = product.sku {
            return Err(StorageError::Conflict(format!(
                "product {id} already holds {existing}"
            )));
        }
        product.sku = Some(*sku);
        drop(product);

        slot.insert(id);
        Ok(())
    }

    async fn delete(&self, sku: &Sku) -> Result<bool> {
        let Some((_, id)) = self.by_sku.remove(sku) else {
            return Ok(false);
        };
        Ok(self.products.remove(&id).is_some())
    }
}
