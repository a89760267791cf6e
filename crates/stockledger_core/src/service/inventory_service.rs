//! Inventory use-case service.
//!
//! # Responsibility
//! - Implement the entry/exit business rules on top of the ledger store.
//! - Enforce quantity invariants and the merge/delete policy.
//!
//! # Invariants
//! - One ledger record per (item_type, description) pair: entries merge
//!   into the existing record instead of creating duplicates.
//! - No record is ever written at zero or negative quantity; exact
//!   depletion deletes the record.
//! - Invalid requests are rejected before any storage access.

use crate::model::record::{RecordId, StockRecord};
use crate::repo::stock_repo::{RepoError, StockRepository};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stock-in request, passed by value from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRequest {
    /// Item category. Non-empty per the calling layer's form contract; the
    /// service does not further restrict its content.
    pub item_type: String,
    /// Free-form description (may be empty). Part of the merge key.
    pub description: String,
    /// Units to add. Must be strictly positive.
    pub quantity: i64,
}

/// Stock-out request addressed by surrogate id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitRequest {
    /// Ledger record to deplete.
    pub record_id: RecordId,
    /// Units to remove. Must be strictly positive.
    pub quantity: i64,
}

/// Business-rule error for inventory operations.
#[derive(Debug)]
pub enum InventoryError {
    /// Quantity missing, non-numeric, or not strictly positive. The
    /// operation is a no-op.
    InvalidQuantity,
    /// Exit requested for an unknown id or for more than currently held.
    /// One combined condition: the caller cannot distinguish the two cases.
    InsufficientStockOrNotFound,
    /// Underlying storage failure, propagated unchanged. No partial
    /// mutation is observable.
    OperationFailed(RepoError),
}

impl Display for InventoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidQuantity => write!(f, "quantity must be a valid positive integer"),
            Self::InsufficientStockOrNotFound => {
                write!(f, "insufficient stock or item not found")
            }
            Self::OperationFailed(err) => write!(f, "inventory operation failed: {err}"),
        }
    }
}

impl Error for InventoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::OperationFailed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for InventoryError {
    fn from(value: RepoError) -> Self {
        Self::OperationFailed(value)
    }
}

/// Inventory service facade over a ledger store implementation.
pub struct InventoryService<R: StockRepository> {
    repo: R,
}

impl<R: StockRepository> InventoryService<R> {
    /// Creates a service using the provided ledger store.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Records a stock-in event.
    ///
    /// # Contract
    /// - Merges into the record matching (item_type, description) exactly,
    ///   summing quantities with no upper bound, and stamps its stock-in
    ///   timestamp with `now_epoch_ms`.
    /// - Creates a fresh record (no exit timestamp) for an unseen key.
    /// - Returns the affected record's id.
    pub fn register_entry(
        &self,
        request: &EntryRequest,
        now_epoch_ms: i64,
    ) -> Result<RecordId, InventoryError> {
        if request.quantity <= 0 {
            return Err(InventoryError::InvalidQuantity);
        }

        let id = match self
            .repo
            .find_by_natural_key(&request.item_type, &request.description)?
        {
            Some(existing) => {
                let combined = existing.quantity + request.quantity;
                self.repo
                    .update_quantity_on_entry(existing.id, combined, now_epoch_ms)?;
                existing.id
            }
            None => self.repo.insert(
                &request.item_type,
                &request.description,
                request.quantity,
                now_epoch_ms,
            )?,
        };

        info!(
            "event=stock_entry module=service status=ok id={id} quantity={}",
            request.quantity
        );
        Ok(id)
    }

    /// Records a stock-out event against a record id.
    ///
    /// # Contract
    /// - Rejects the request when the id is unknown or holds fewer units
    ///   than requested, without mutating the ledger.
    /// - Leaves the record with the remaining quantity and a fresh
    ///   stock-out timestamp, or deletes it at exact depletion.
    pub fn register_exit(
        &self,
        request: &ExitRequest,
        now_epoch_ms: i64,
    ) -> Result<(), InventoryError> {
        if request.quantity <= 0 {
            return Err(InventoryError::InvalidQuantity);
        }

        let existing = match self.repo.find_by_id(request.record_id)? {
            Some(record) if record.quantity >= request.quantity => record,
            _ => return Err(InventoryError::InsufficientStockOrNotFound),
        };

        let remaining = existing.quantity - request.quantity;
        if remaining > 0 {
            self.repo
                .update_quantity_on_exit(existing.id, remaining, now_epoch_ms)?;
        } else {
            self.repo.delete(existing.id)?;
        }

        info!(
            "event=stock_exit module=service status=ok id={} quantity={} remaining={remaining}",
            existing.id, request.quantity
        );
        Ok(())
    }

    /// Returns the full ledger snapshot, no transformation.
    pub fn list_inventory(&self) -> Result<Vec<StockRecord>, InventoryError> {
        Ok(self.repo.list_all()?)
    }
}
