//! Stock record domain model.
//!
//! # Responsibility
//! - Define the canonical ledger record and its consistency checks.
//!
//! # Invariants
//! - `id` is assigned by the store, immutable, and never reused after
//!   deletion.
//! - `quantity > 0` for as long as the record exists; depletion removes the
//!   record instead of persisting it at zero.
//! - (`item_type`, `description`) is the merge key for stock-in events,
//!   matched exactly (case- and whitespace-sensitive).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable store-assigned identifier for a ledger record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type RecordId = i64;

/// One line of the stock ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    /// Store-assigned surrogate key, monotonically increasing.
    pub id: RecordId,
    /// Item category text. Non-empty; half of the merge key.
    pub item_type: String,
    /// Free-form item description (may be empty); other half of the merge key.
    pub description: String,
    /// Units currently held. Strictly positive while the record exists.
    pub quantity: i64,
    /// Epoch milliseconds of the most recent stock-in, if any.
    pub last_entry_at: Option<i64>,
    /// Epoch milliseconds of the most recent stock-out, if any.
    pub last_exit_at: Option<i64>,
}

impl StockRecord {
    /// Checks the record against ledger consistency rules.
    ///
    /// Used by repository read paths to reject invalid persisted state
    /// instead of masking it.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.quantity <= 0 {
            return Err(RecordValidationError::NonPositiveQuantity(self.quantity));
        }
        Ok(())
    }

    /// Returns the (item_type, description) merge key.
    pub fn natural_key(&self) -> (&str, &str) {
        (self.item_type.as_str(), self.description.as_str())
    }
}

/// Consistency violation in a ledger record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordValidationError {
    /// A record may never exist at zero or negative quantity.
    NonPositiveQuantity(i64),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveQuantity(quantity) => {
                write!(f, "stock record quantity must be positive, got {quantity}")
            }
        }
    }
}

impl Error for RecordValidationError {}
