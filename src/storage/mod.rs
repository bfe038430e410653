//! Storage layer for beanbudget
//!
//! Provides atomic file writes, the ledger store and first-run setup.

pub mod file_io;
pub mod init;
pub mod ledger_file;

pub use file_io::{read_json, read_text, write_json_atomic, write_text_atomic};
pub use init::initialize_storage;
pub use ledger_file::{FileLedgerStore, LedgerStore, MemoryLedgerStore};
