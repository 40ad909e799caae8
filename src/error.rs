//! Error kinds surfaced by inventory operations.
//!
//! Every variant is recoverable by the caller supplying corrected input.
//! Validation, capacity and not-found failures are raised before any write,
//! and bulk failures abort before the batch is committed.

use uuid::Uuid;

use crate::store::StoreError;

/// Grep-able error code for API payloads and logs.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;
}

/// Why an issue (or a quantity change) was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapacityError {
    #[error("requested {requested} but only {available} available")]
    Exceeded { requested: u32, available: u32 },
    #[error("component is under maintenance")]
    UnderMaintenance,
    #[error("component is not available for issue")]
    Unavailable,
    #[error("total quantity {total} is below the {issued} units currently issued")]
    BelowIssued { total: u32, issued: u64 },
}

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("capacity error: {0}")]
    Capacity(#[from] CapacityError),
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: Uuid },
    #[error("row {row}: {message}")]
    Row { row: usize, message: String },
    #[error("invalid backup: {0}")]
    BackupFormat(String),
    #[error("encoding error: {0}")]
    Encoding(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl InventoryError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn component_not_found(id: Uuid) -> Self {
        Self::NotFound { kind: "component", id }
    }

    pub(crate) fn row(row: usize, message: impl Into<String>) -> Self {
        Self::Row { row, message: message.into() }
    }
}

impl ErrorCode for InventoryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E_VALIDATION",
            Self::Capacity(_) => "E_CAPACITY",
            Self::NotFound { .. } => "E_NOT_FOUND",
            Self::Row { .. } => "E_ROW",
            Self::BackupFormat(_) => "E_BACKUP_FORMAT",
            Self::Encoding(_) => "E_ENCODING",
            Self::Store(_) => "E_STORE",
        }
    }
}

impl ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        "E_STORE"
    }
}
