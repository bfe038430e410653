//! CLI command handlers
//!
//! This module bridges the clap argument parsing in `main.rs` with the
//! service layer.

pub mod add;
pub mod history;
pub mod report;

pub use add::{handle_add_command, run_dialogue};
pub use history::handle_history_command;
pub use report::{handle_accounts_command, handle_budget_command};

use crate::config::{BeanbudgetPaths, Settings};
use crate::error::{BudgetError, BudgetResult};
use crate::models::UserId;
use crate::storage::FileLedgerStore;

/// Everything a command needs from the environment
#[derive(Debug, Clone)]
pub struct CliContext {
    pub paths: BeanbudgetPaths,
    pub settings: Settings,
    pub user: UserId,
}

impl CliContext {
    /// Context acting as `user`, or the configured default user
    pub fn new(paths: BeanbudgetPaths, settings: Settings, user: Option<UserId>) -> Self {
        let user = user.unwrap_or(settings.default_user_id);
        Self {
            paths,
            settings,
            user,
        }
    }

    /// Fail unless the current user is allowed
    pub fn authorize(&self) -> BudgetResult<()> {
        if self.settings.is_user_allowed(self.user) {
            Ok(())
        } else {
            Err(BudgetError::Unauthorized(self.user))
        }
    }

    /// Store for the configured ledger file
    pub fn ledger_store(&self) -> FileLedgerStore {
        FileLedgerStore::new(self.settings.ledger_path(&self.paths), self.settings.clone())
    }
}
