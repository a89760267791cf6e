//! Core domain logic for the stockledger inventory tool.
//! This crate is the single source of truth for ledger invariants.

pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use export::csv::{export_to_path, format_epoch_ms, write_snapshot, ExportError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{RecordId, RecordValidationError, StockRecord};
pub use repo::stock_repo::{RepoError, RepoResult, SqliteStockRepository, StockRepository};
pub use service::inventory_service::{
    EntryRequest, ExitRequest, InventoryError, InventoryService,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
