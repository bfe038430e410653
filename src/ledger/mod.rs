//! Ledger text handling
//!
//! Reads beancount-style text into [`Entry`] values and applies the budget
//! plugin when the ledger asks for it.

pub mod parser;
pub mod plugin;

pub use parser::{parse, Ledger, ParseError, ParseErrors};
pub use plugin::apply_budget_postings;

use crate::config::Settings;
use crate::models::Entry;

/// Parse ledger text and expand budget postings if the ledger declares the plugin
pub fn load(text: &str, settings: &Settings) -> Result<Ledger, ParseErrors> {
    let mut ledger = parse(text, &settings.currencies)?;
    if ledger.has_plugin(&settings.budget_plugin) {
        apply_budget_postings(&mut ledger.entries);
    }
    tracing::debug!(
        entries = ledger.entries.len(),
        plugins = ?ledger.plugins,
        "Loaded ledger"
    );
    Ok(ledger)
}

/// Parse ledger text and return only the entries
pub fn load_entries(text: &str, settings: &Settings) -> Result<Vec<Entry>, ParseErrors> {
    load(text, settings).map(|ledger| ledger.entries)
}
