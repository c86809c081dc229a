//! Audit logging
//!
//! Every create, update and delete of a transaction, and every committed
//! import, is appended to `audit.log` as a JSON line with before/after
//! snapshots.
//!
//! ```rust,ignore
//! use coinlog::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(
//!     EntityType::Transaction,
//!     txn.id.to_string(),
//!     None,
//!     &txn,
//! ))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
