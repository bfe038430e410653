//! Ledger persistence
//!
//! A [`LedgerStore`] hands out the current ledger text and appends new entry
//! text as one validated unit: either the whole ledger still parses with the
//! new entry in it and the change is kept, or nothing changes.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::ledger;

use super::file_io::{read_text, write_text_atomic};

/// Where ledger text lives
pub trait LedgerStore {
    /// Current ledger text
    fn fetch(&self) -> BudgetResult<String>;

    /// Append one entry and persist it, or leave the ledger unchanged
    ///
    /// Returns [`BudgetError::Commit`] when the resulting ledger is invalid.
    fn append_and_commit(&self, entry_text: &str) -> BudgetResult<()>;
}

impl<S: LedgerStore + ?Sized> LedgerStore for &S {
    fn fetch(&self) -> BudgetResult<String> {
        (**self).fetch()
    }

    fn append_and_commit(&self, entry_text: &str) -> BudgetResult<()> {
        (**self).append_and_commit(entry_text)
    }
}

/// Insert entry text before the future marker, or at the end
///
/// Up to two newlines directly in front of the marker are kept after the new
/// entry so the blank-line spacing before the marker survives.
pub fn insert_entry(content: &str, entry_text: &str, future_marker: &str) -> String {
    let block = format!("\n{}\n", entry_text);

    match content.find(future_marker) {
        Some(mut position) => {
            let bytes = content.as_bytes();
            for _ in 0..2 {
                if position > 0 && bytes[position - 1] == b'\n' {
                    position -= 1;
                }
            }
            let mut out = String::with_capacity(content.len() + block.len());
            out.push_str(&content[..position]);
            out.push_str(&block);
            out.push_str(&content[position..]);
            out
        }
        None => format!("{}{}", content, block),
    }
}

/// Check candidate ledger text, mapping parser failures to a commit error
fn validate(text: &str, settings: &Settings) -> BudgetResult<()> {
    ledger::load(text, settings)
        .map(|_| ())
        .map_err(|errors| BudgetError::Commit(errors.to_string()))
}

/// Ledger kept in a single text file
pub struct FileLedgerStore {
    path: PathBuf,
    settings: Settings,
}

impl FileLedgerStore {
    /// Create a store for the ledger file at `path`
    pub fn new(path: impl Into<PathBuf>, settings: Settings) -> Self {
        Self {
            path: path.into(),
            settings,
        }
    }

    /// Location of the ledger file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStore for FileLedgerStore {
    fn fetch(&self) -> BudgetResult<String> {
        read_text(&self.path)
    }

    fn append_and_commit(&self, entry_text: &str) -> BudgetResult<()> {
        let current = self.fetch()?;
        let candidate = insert_entry(&current, entry_text, &self.settings.future_marker);

        if let Err(e) = validate(&candidate, &self.settings) {
            tracing::warn!(path = %self.path.display(), "Rejected ledger update");
            return Err(e);
        }

        write_text_atomic(&self.path, &candidate)?;
        tracing::info!(path = %self.path.display(), "Committed ledger update");
        Ok(())
    }
}

/// Ledger held in memory, for hosts without a file and for tests
pub struct MemoryLedgerStore {
    text: RwLock<String>,
    settings: Settings,
}

impl MemoryLedgerStore {
    /// Create a store holding `text`
    pub fn new(text: impl Into<String>, settings: Settings) -> Self {
        Self {
            text: RwLock::new(text.into()),
            settings,
        }
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn fetch(&self) -> BudgetResult<String> {
        self.text
            .read()
            .map(|text| text.clone())
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn append_and_commit(&self, entry_text: &str) -> BudgetResult<()> {
        let mut text = self
            .text
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let candidate = insert_entry(&text, entry_text, &self.settings.future_marker);
        validate(&candidate, &self.settings)?;
        *text = candidate;
        Ok(())
    }
}
