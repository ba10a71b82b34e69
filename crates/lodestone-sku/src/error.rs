use crate::Sku;
use thiserror::Error;

/// Errors returned by SKU parsing and successor generation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid SKU format: {code:?}")]
    InvalidFormat { code: String },
    #[error("storage is full: no location available after {last}")]
    StorageFull { last: Sku },
    #[error("generated invalid SKU: {code:?}")]
    GeneratedInvalid { code: String },
    #[error("invalid last rack {rack:?}; expected one of 0-9, A-Z, a-z")]
    InvalidLastRack { rack: char },
}

impl Error {
    pub(crate) fn invalid_format(code: impl Into<String>) -> Self {
        Self::InvalidFormat { code: code.into() }
    }
}
