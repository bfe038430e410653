//! User settings for beanbudget
//!
//! Manages the currencies of record, the intake option lists, report layout,
//! access control and session policy.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::BeanbudgetPaths;
use crate::error::BudgetError;
use crate::models::{Currencies, UserId};
use crate::storage::file_io::{read_json, write_json_atomic};

/// Column widths for rendered reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLayout {
    /// Width of the account name column
    pub name_width: usize,
    /// Width of each amount column
    pub amount_width: usize,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self {
            name_width: 14,
            amount_width: 10,
        }
    }
}

/// User settings for beanbudget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Cash and budget currency codes
    #[serde(default)]
    pub currencies: Currencies,

    /// Tag marking an entry as a budget allocation
    #[serde(default = "default_budget_tag")]
    pub budget_tag: String,

    /// Plugin name that turns on automatic budget postings
    #[serde(default = "default_budget_plugin")]
    pub budget_plugin: String,

    /// New entries are inserted before this line when present
    #[serde(default = "default_future_marker")]
    pub future_marker: String,

    /// Ledger file override (defaults to `main.beancount` in the data dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger_file: Option<PathBuf>,

    /// Asset and liability accounts offered by the intake dialogue
    #[serde(default = "default_accounts")]
    pub accounts: Vec<String>,

    /// Entry types and the counterparties each one offers
    #[serde(default = "default_counterparties")]
    pub counterparties: BTreeMap<String, Vec<String>>,

    /// Account prefixes hidden from the filtered budget report
    #[serde(default = "default_hidden_prefixes")]
    pub hidden_prefixes: Vec<String>,

    /// Users allowed to run commands (empty means unrestricted)
    #[serde(default)]
    pub allowed_user_ids: Vec<UserId>,

    /// User id the CLI acts as when none is given
    #[serde(default)]
    pub default_user_id: UserId,

    /// Minutes an idle intake session survives
    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: u32,

    /// Report column widths
    #[serde(default)]
    pub layout: ReportLayout,
}

fn default_schema_version() -> u32 {
    1
}

fn default_budget_tag() -> String {
    "budget".to_string()
}

fn default_budget_plugin() -> String {
    "budget_eur".to_string()
}

fn default_future_marker() -> String {
    ";;; FUTURE ;;;".to_string()
}

fn default_accounts() -> Vec<String> {
    [
        "Assets:NL:ING:Checking59",
        "Assets:NL:ING:Checking34",
        "Assets:BE:WISE:Checking",
        "Assets:BE:WISE:Savings",
        "Assets:BE:WISE:Investments",
        "Liabilities:NL:AMEX:Green",
        "Liabilities:NL:ING:CreditCard",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_counterparties() -> BTreeMap<String, Vec<String>> {
    let variable = [
        "HouseTax",
        "Transport",
        "PersonalCare",
        "BankFees",
        "EatOut",
        "Clothes",
        "Family",
        "Education",
        "Party",
        "Forgotten",
        "Groceries",
    ];
    let income = ["NL:Fung:Salary", "Interest"];

    let mut map = BTreeMap::new();
    map.insert(
        "Expenses:Variable".to_string(),
        variable.iter().map(|s| s.to_string()).collect(),
    );
    map.insert(
        "Income".to_string(),
        income.iter().map(|s| s.to_string()).collect(),
    );
    map.insert("Transfer".to_string(), default_accounts());
    map
}

fn default_hidden_prefixes() -> Vec<String> {
    vec!["Expenses:Fixed:".to_string(), "Expenses:Savings:".to_string()]
}

fn default_session_idle_minutes() -> u32 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currencies: Currencies::default(),
            budget_tag: default_budget_tag(),
            budget_plugin: default_budget_plugin(),
            future_marker: default_future_marker(),
            ledger_file: None,
            accounts: default_accounts(),
            counterparties: default_counterparties(),
            hidden_prefixes: default_hidden_prefixes(),
            allowed_user_ids: Vec::new(),
            default_user_id: UserId::default(),
            session_idle_minutes: default_session_idle_minutes(),
            layout: ReportLayout::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &BeanbudgetPaths) -> Result<Self, BudgetError> {
        read_json(paths.settings_file())
            .map_err(|e| BudgetError::Config(format!("Failed to load settings: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BeanbudgetPaths) -> Result<(), BudgetError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Resolve the ledger file location
    pub fn ledger_path(&self, paths: &BeanbudgetPaths) -> PathBuf {
        match &self.ledger_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => paths.base_dir().join(path),
            None => paths.ledger_file(),
        }
    }

    /// Check whether a user may run commands
    pub fn is_user_allowed(&self, user: UserId) -> bool {
        self.allowed_user_ids.is_empty() || self.allowed_user_ids.contains(&user)
    }
}
