use async_trait::async_trait;
use lodestone_core::{
    Assignment, BackfillReport, InventoryError, NewProduct, ProductRecord, RegisterProduct,
    Repository, Sku, SkuAllocator, SkuCheck, SkuStatus,
};
use lodestone_sku::{find_highest, Odometer};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

type Result<T> = std::result::Result<T, InventoryError>;

/// A concrete implementation of the `SkuAllocator` trait.
///
/// This service wraps a `Repository` and an `Odometer` to handle:
/// - proposing the next free location code
/// - registering products under a code
/// - backfilling products that were stored without one
///
/// Note: `next_available` does not reserve anything. Two callers can be handed
/// the same SKU; the repository's uniqueness constraint decides which
/// registration wins.
#[derive(Debug)]
pub struct InventoryService<R> {
    repository: Arc<R>,
    odometer: Odometer,
}

impl<R> Clone for InventoryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            odometer: self.odometer,
        }
    }
}

impl<R: Repository> InventoryService<R> {
    /// Creates a service that stops at the default last rack.
    pub fn new(repository: R) -> Self {
        Self::with_odometer(repository, Odometer::default())
    }

    pub fn with_odometer(repository: R, odometer: Odometer) -> Self {
        Self {
            repository: Arc::new(repository),
            odometer,
        }
    }

    pub fn odometer(&self) -> &Odometer {
        &self.odometer
    }

    /// Highest well-formed SKU in the store. Invalid legacy values are skipped.
    async fn highest(&self) -> Result<(Option<Sku>, usize)> {
        let skus = self.repository.skus().await?;
        let highest = find_highest(&skus);

        if highest.is_none() && !skus.is_empty() {
            warn!(stored = skus.len(), "no stored SKU is well formed");
        }

        Ok((highest, skus.len()))
    }

    /// The SKU after `highest`, or the starting SKU for an empty store.
    fn successor(&self, highest: Option<Sku>) -> Result<Sku> {
        match highest {
            None => Ok(Sku::STARTING),
            Some(highest) => self.odometer.next(&highest).map_err(|err| {
                error!(highest = %highest, error = %err, "cannot advance past highest SKU");
                InventoryError::from(err)
            }),
        }
    }

    // Like `successor`, but an exhausted range is `None` and nothing is logged.
    fn peek_successor(&self, cursor: Option<Sku>) -> Option<Sku> {
        match cursor {
            None => Some(Sku::STARTING),
            Some(sku) => self.odometer.next(&sku).ok(),
        }
    }

    fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(InventoryError::InvalidInput(
                "product name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl<R: Repository> SkuAllocator for InventoryService<R> {
    async fn next_available(&self) -> Result<Sku> {
        let (highest, _) = self.highest().await?;

        if let Some(highest) = highest {
            if let Some(latest) = self.repository.latest_sku().await? {
                if latest != highest.to_string() {
                    warn!(
                        latest = %latest,
                        highest = %highest,
                        "most recently created SKU is not the highest; continuing after the highest"
                    );
                }
            }
        }

        let next = self.successor(highest)?;

        if self.repository.exists(&next).await? {
            warn!(sku = %next, "generated SKU is already assigned");
            return Err(InventoryError::SkuConflict(next.to_string()));
        }

        debug!(highest = ?highest.map(|s| s.to_string()), next = %next, "proposed next SKU");
        Ok(next)
    }

    async fn check(&self, code: &str) -> Result<SkuCheck> {
        let Ok(sku) = code.parse::<Sku>() else {
            return Ok(SkuCheck {
                valid: false,
                available: false,
            });
        };

        Ok(SkuCheck {
            valid: true,
            available: !self.repository.exists(&sku).await?,
        })
    }

    async fn register(&self, params: RegisterProduct) -> Result<ProductRecord> {
        Self::validate_name(&params.name)?;

        if self.repository.exists(&params.sku).await? {
            return Err(InventoryError::SkuConflict(params.sku.to_string()));
        }

        let record = self
            .repository
            .insert(NewProduct {
                name: params.name.trim().to_string(),
                description: params.description,
                category: params.category,
                stock: params.stock,
                sku: Some(params.sku),
            })
            .await?;

        info!(id = %record.id, sku = %params.sku, name = %record.name, "registered product");
        Ok(record)
    }

    async fn lookup(&self, sku: &Sku) -> Result<Option<ProductRecord>> {
        Ok(self.repository.get(sku).await?)
    }

    async fn retire(&self, sku: &Sku) -> Result<bool> {
        let removed = self.repository.delete(sku).await?;
        if removed {
            info!(sku = %sku, "retired product");
        }
        Ok(removed)
    }

    async fn status(&self) -> Result<SkuStatus> {
        let (highest, assigned) = self.highest().await?;
        let unassigned = self.repository.unassigned().await?.len();

        Ok(SkuStatus {
            assigned,
            unassigned,
            highest,
            needs_backfill: unassigned > 0,
        })
    }

    async fn backfill(&self) -> Result<BackfillReport> {
        let pending = self.repository.unassigned().await?;
        let (mut cursor, _) = self.highest().await?;
        let total = pending.len();

        info!(pending = total, start_after = ?cursor.map(|s| s.to_string()), "starting SKU backfill");

        let mut assignments = Vec::with_capacity(total);
        for product in pending {
            let sku = match self.successor(cursor) {
                Ok(sku) => sku,
                Err(err) => {
                    warn!(
                        assigned = assignments.len(),
                        remaining = total - assignments.len(),
                        "backfill stopped"
                    );
                    return Err(err);
                }
            };

            self.repository.assign_sku(product.id, &sku).await?;
            debug!(id = %product.id, sku = %sku, name = %product.name, "assigned SKU");

            assignments.push(Assignment {
                id: product.id,
                name: product.name,
                sku,
            });
            cursor = Some(sku);
        }

        let next_available = self.peek_successor(cursor);
        info!(
            assigned = assignments.len(),
            next_available = ?next_available.map(|s| s.to_string()),
            "SKU backfill complete"
        );

        Ok(BackfillReport {
            assignments,
            next_available,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodestone_core::{ProductId, ReadRepository};
    use lodestone_sku::OdometerSettings;
    use lodestone_storage::InMemoryRepository;

    fn test_service() -> InventoryService<InMemoryRepository> {
        InventoryService::new(InMemoryRepository::new())
    }

    fn sku(code: &str) -> Sku {
        code.parse().unwrap()
    }

    fn params(name: &str, code: &str) -> RegisterProduct {
        RegisterProduct {
            sku: sku(code),
            name: name.to_string(),
            description: None,
            category: Some("earrings".to_string()),
            stock: 2,
        }
    }

    fn unplaced(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: None,
            category: None,
            stock: 1,
            sku: None,
        }
    }

    /// Store that also reports SKU strings written before codes were validated.
    struct LegacyRepository {
        inner: InMemoryRepository,
        legacy: Vec<String>,
    }

    #[async_trait]
    impl ReadRepository for LegacyRepository {
        async fn get(&self, sku: &Sku) -> lodestone_core::error::Result<Option<ProductRecord>> {
            self.inner.get(sku).await
        }

        async fn exists(&self, sku: &Sku) -> lodestone_core::error::Result<bool> {
            self.inner.exists(sku).await
        }

        async fn skus(&self) -> lodestone_core::error::Result<Vec<String>> {
            let mut skus = self.inner.skus().await?;
            skus.extend(self.legacy.iter().cloned());
            Ok(skus)
        }

        async fn latest_sku(&self) -> lodestone_core::error::Result<Option<String>> {
            self.inner.latest_sku().await
        }

        async fn unassigned(&self) -> lodestone_core::error::Result<Vec<ProductRecord>> {
            self.inner.unassigned().await
        }
    }

    #[async_trait]
    impl Repository for LegacyRepository {
        async fn insert(&self, product: NewProduct) -> lodestone_core::error::Result<ProductRecord> {
            self.inner.insert(product).await
        }

        async fn assign_sku(&self, id: ProductId, sku: &Sku) -> lodestone_core::error::Result<()> {
            self.inner.assign_sku(id, sku).await
        }

        async fn delete(&self, sku: &Sku) -> lodestone_core::error::Result<bool> {
            self.inner.delete(sku).await
        }
    }

    #[tokio::test]
    async fn empty_store_starts_at_the_first_location() {
        let service = test_service();

        assert_eq!(service.next_available().await.unwrap(), sku("Aa1a01"));
    }

    #[tokio::test]
    async fn next_available_continues_after_the_highest() {
        let service = test_service();
        service.register(params("a", "Aa1a01")).await.unwrap();
        service.register(params("b", "Aa1a05")).await.unwrap();

        assert_eq!(service.next_available().await.unwrap(), sku("Aa1b01"));
    }

    #[tokio::test]
    async fn next_available_ignores_creation_order() {
        let service = test_service();
        service.register(params("high", "Ab1a01")).await.unwrap();
        service.register(params("low", "Aa1a03")).await.unwrap();

        assert_eq!(service.next_available().await.unwrap(), sku("Ab1a02"));
    }

    #[tokio::test]
    async fn next_available_does_not_reserve() {
        let service = test_service();

        let first = service.next_available().await.unwrap();
        let second = service.next_available().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn next_available_skips_invalid_legacy_values() {
        let service = InventoryService::new(LegacyRepository {
            inner: InMemoryRepository::new(),
            legacy: vec!["Zz9z99".to_string(), "".to_string(), "Aa1a1".to_string()],
        });
        assert_eq!(service.next_available().await.unwrap(), sku("Aa1a01"));

        service.register(params("a", "Aa2c03")).await.unwrap();
        assert_eq!(service.next_available().await.unwrap(), sku("Aa2c04"));
    }

    #[tokio::test]
    async fn next_available_reports_full_storage() {
        let service = test_service();
        service.register(params("last", "Bt4o05")).await.unwrap();

        let err = service.next_available().await.unwrap_err();
        assert!(matches!(err, InventoryError::StorageFull(last) if last == sku("Bt4o05")));
    }

    #[tokio::test]
    async fn wider_odometer_crosses_into_the_next_rack() {
        let odometer = Odometer::new(OdometerSettings::builder().last_rack('z').build()).unwrap();
        let service = InventoryService::with_odometer(InMemoryRepository::new(), odometer);
        service.register(params("last", "Bt4o05")).await.unwrap();

        assert_eq!(service.next_available().await.unwrap(), sku("Ca1a01"));
    }

    #[tokio::test]
    async fn check_reports_validity_and_availability() {
        let service = test_service();
        service.register(params("a", "Aa1a01")).await.unwrap();

        let taken = service.check("Aa1a01").await.unwrap();
        assert!(taken.valid);
        assert!(!taken.available);

        let free = service.check("Aa1a02").await.unwrap();
        assert!(free.valid);
        assert!(free.available);

        let invalid = service.check("Aa1a06").await.unwrap();
        assert!(!invalid.valid);
        assert!(!invalid.available);
    }

    #[tokio::test]
    async fn register_rejects_a_taken_sku() {
        let service = test_service();
        service.register(params("a", "Aa1a01")).await.unwrap();

        let err = service.register(params("b", "Aa1a01")).await.unwrap_err();
        assert!(matches!(err, InventoryError::SkuConflict(code) if code == "Aa1a01"));
    }

    #[tokio::test]
    async fn register_rejects_an_empty_name() {
        let service = test_service();

        let err = service.register(params("   ", "Aa1a01")).await.unwrap_err();
        assert!(matches!(err, InventoryError::InvalidInput(_)));
        assert!(service.check("Aa1a01").await.unwrap().available);
    }

    #[tokio::test]
    async fn concurrent_registrations_of_one_sku_admit_a_single_winner() {
        let service = test_service();
        let mut handles = vec![];

        for i in 0..8 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.register(params(&format!("racer-{i}"), "Aa1a01")).await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => winners += 1,
                Err(err) => assert!(matches!(err, InventoryError::SkuConflict(_))),
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn lookup_and_retire() {
        let service = test_service();
        service.register(params("Opal studs", "Aa1a01")).await.unwrap();

        let found = service.lookup(&sku("Aa1a01")).await.unwrap().unwrap();
        assert_eq!(found.name, "Opal studs");

        assert!(service.retire(&sku("Aa1a01")).await.unwrap());
        assert!(service.lookup(&sku("Aa1a01")).await.unwrap().is_none());
        assert!(!service.retire(&sku("Aa1a01")).await.unwrap());
    }

    #[tokio::test]
    async fn status_counts_assigned_and_unassigned() {
        let repo = InMemoryRepository::new();
        repo.insert(unplaced("loose")).await.unwrap();
        let service = InventoryService::new(repo);
        service.register(params("a", "Aa1a02")).await.unwrap();

        let status = service.status().await.unwrap();
        assert_eq!(status.assigned, 1);
        assert_eq!(status.unassigned, 1);
        assert_eq!(status.highest, Some(sku("Aa1a02")));
        assert!(status.needs_backfill);
    }

    #[tokio::test]
    async fn backfill_assigns_in_creation_order() {
        let repo = InMemoryRepository::new();
        repo.insert(unplaced("first")).await.unwrap();
        repo.insert(unplaced("second")).await.unwrap();
        let service = InventoryService::new(repo);
        service.register(params("placed", "Aa1a04")).await.unwrap();

        let report = service.backfill().await.unwrap();

        let assigned: Vec<(&str, String)> = report
            .assignments
            .iter()
            .map(|a| (a.name.as_str(), a.sku.to_string()))
            .collect();
        assert_eq!(
            assigned,
            [("first", "Aa1a05".to_string()), ("second", "Aa1b01".to_string())]
        );
        assert_eq!(report.next_available, Some(sku("Aa1b02")));

        let status = service.status().await.unwrap();
        assert_eq!(status.unassigned, 0);
        assert!(!status.needs_backfill);
    }

    #[tokio::test]
    async fn backfill_on_an_empty_store_starts_at_the_first_location() {
        let repo = InMemoryRepository::new();
        repo.insert(unplaced("only")).await.unwrap();
        let service = InventoryService::new(repo);

        let report = service.backfill().await.unwrap();
        assert_eq!(report.assignments[0].sku, sku("Aa1a01"));
        assert_eq!(report.next_available, Some(sku("Aa1a02")));
    }

    #[tokio::test]
    async fn backfill_with_nothing_pending_is_a_no_op() {
        let service = test_service();
        service.register(params("a", "Aa1a01")).await.unwrap();

        let report = service.backfill().await.unwrap();
        assert!(report.assignments.is_empty());
        assert_eq!(report.next_available, Some(sku("Aa1a02")));
    }

    #[tokio::test]
    async fn backfill_keeps_assignments_made_before_exhaustion() {
        let repo = InMemoryRepository::new();
        repo.insert(unplaced("fits")).await.unwrap();
        repo.insert(unplaced("overflows")).await.unwrap();
        let service = InventoryService::new(repo);
        service.register(params("near the end", "Bt4o04")).await.unwrap();

        let err = service.backfill().await.unwrap_err();
        assert!(matches!(err, InventoryError::StorageFull(_)));

        let fits = service.lookup(&sku("Bt4o05")).await.unwrap().unwrap();
        assert_eq!(fits.name, "fits");
        assert_eq!(service.status().await.unwrap().unassigned, 1);
    }
}
