//! Snapshot export adapters.
//!
//! # Responsibility
//! - Serialize ledger snapshots for external consumption.
//! - Keep serialization concerns out of the ledger store and service.

pub mod csv;
