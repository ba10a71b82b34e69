use lodestone_sku::Sku;
use thiserror::Error;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("sku already assigned: {0}")]
    Conflict(String),
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Errors surfaced by the inventory service to its callers.
#[derive(Debug, Clone, Error)]
pub enum InventoryError {
    #[error("invalid sku: {0}")]
    InvalidSku(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("sku already assigned: {0}")]
    SkuConflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage is full: no location available after {0}")]
    StorageFull(Sku),
    #[error("sku generator fault: {0}")]
    Generator(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<lodestone_sku::Error> for InventoryError {
    fn from(value: lodestone_sku::Error) -> Self {
        match value {
            lodestone_sku::Error::InvalidFormat { code } => Self::InvalidSku(code),
            lodestone_sku::Error::StorageFull { last } => Self::StorageFull(last),
            other @ (lodestone_sku::Error::GeneratedInvalid { .. }
            | lodestone_sku::Error::InvalidLastRack { .. }) => Self::Generator(other.to_string()),
        }
    }
}

impl From<StorageError> for InventoryError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Conflict(sku) => Self::SkuConflict(sku),
            StorageError::NotFound(what) => Self::NotFound(what),
            other => Self::Storage(other.to_string()),
        }
    }
}
