//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for the ledger.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository read paths reject invalid persisted state (`InvalidData`)
//!   instead of masking it.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod stock_repo;
