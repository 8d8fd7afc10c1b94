//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type LendResult<T> = Result<T, LendError>;

/// Domain-level error.
///
/// Every operation is scoped to a single user action; no variant is
/// process-fatal and none is retried automatically.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LendError {
    /// A value failed validation (missing input, self-loan, malformed date).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The lender has no inventory row for the requested item name.
    #[error("no inventory item named '{0}'")]
    ItemNotFound(String),

    /// Requested more units than the lender currently has in stock.
    #[error("insufficient quantity: requested {requested}, available {available}")]
    InsufficientQuantity { requested: i64, available: i64 },

    /// Writing the loan ledger failed; inventory was left untouched.
    #[error("ledger write failed: {0}")]
    LedgerWriteFailed(String),

    /// Writing the inventory row failed.
    #[error("inventory write failed: {0}")]
    InventoryWriteFailed(String),

    /// A read against the remote store failed before any decision was made.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl LendError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn item_not_found(item_name: impl Into<String>) -> Self {
        Self::ItemNotFound(item_name.into())
    }

    pub fn insufficient(requested: i64, available: i64) -> Self {
        Self::InsufficientQuantity {
            requested,
            available,
        }
    }

    pub fn ledger_write(msg: impl Into<String>) -> Self {
        Self::LedgerWriteFailed(msg.into())
    }

    pub fn inventory_write(msg: impl Into<String>) -> Self {
        Self::InventoryWriteFailed(msg.into())
    }

    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }
}
