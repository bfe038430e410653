//! Audit log of intake sessions
//!
//! Every intake session that ends (committed, cancelled or failed) leaves one
//! line in an append-only JSONL file next to the settings.

mod entry;
mod logger;

pub use entry::{AuditEntry, Outcome};
pub use logger::AuditLogger;
