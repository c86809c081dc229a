//! Service layer for coinlog
//!
//! Business operations on top of the in-memory ledger: validation,
//! persistence and audit logging in one place.

pub mod transaction;

pub use transaction::TransactionService;
