//! Audit logging for Bookkeeper
//!
//! Records every create, update and delete applied by the service layer in
//! an append-only, line-delimited JSON log.
//!
//! - `AuditEntry`: one operation with timestamp, record identity and
//!   before/after snapshots.
//! - `AuditLogger`: appends entries to the log file and reads them back.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
