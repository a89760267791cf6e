//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate ledger store calls into use-case level APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod inventory_service;
