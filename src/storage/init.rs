//! Storage initialization
//!
//! Handles first-run setup: data directory, settings file and a starter ledger.

use crate::config::paths::BeanbudgetPaths;
use crate::config::Settings;
use crate::error::BudgetResult;

use super::file_io::write_text_atomic;

/// Initialize storage for a fresh installation
///
/// Existing files are left alone. Returns the settings in effect.
pub fn initialize_storage(paths: &BeanbudgetPaths) -> BudgetResult<Settings> {
    paths.ensure_directories()?;

    let settings = Settings::load_or_create(paths)?;
    if !paths.settings_file().exists() {
        settings.save(paths)?;
        tracing::info!(path = %paths.settings_file().display(), "Created settings");
    }

    let ledger_path = settings.ledger_path(paths);
    if !ledger_path.exists() {
        write_text_atomic(&ledger_path, &starter_ledger(&settings))?;
        tracing::info!(path = %ledger_path.display(), "Created ledger");
    }

    Ok(settings)
}

/// Ledger text for a new installation
pub fn starter_ledger(settings: &Settings) -> String {
    let mut text = String::new();
    text.push_str(&format!(
        "option \"operating_currency\" \"{}\"\n",
        settings.currencies.cash
    ));
    text.push_str(&format!("plugin \"{}\"\n\n", settings.budget_plugin));
    text.push_str(&format!("{}\n", settings.future_marker));
    text
}
