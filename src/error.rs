//! Custom error types for beanbudget
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::ledger::ParseErrors;
use crate::models::UserId;

/// The main error type for beanbudget operations
#[derive(Error, Debug)]
pub enum BudgetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV export errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Validation errors for caller input
    #[error("Error: {0}")]
    Validation(String),

    /// The ledger text could not be parsed
    #[error("Error loading ledger file:\n{0}")]
    Ledger(ParseErrors),

    /// The storage backend refused a new entry
    #[error("Error writing to ledger file:\n{0}")]
    Commit(String),

    /// A position account holds something other than the cash currency
    #[error("Unsupported currency {currency} on account {account}")]
    UnsupportedCurrency { account: String, currency: String },

    /// The caller is not allowed to use the bot
    #[error("User {0} is not authorized")]
    Unauthorized(UserId),

    /// A new intake was requested while one is in progress
    #[error("An entry is already being added; finish it or /cancel first")]
    SessionActive,

    /// An intake input arrived without a session
    #[error("No entry in progress; use /add to start one")]
    NoSession,

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BudgetError {
    /// Create a validation error for a bad months-ahead argument
    pub fn invalid_horizon() -> Self {
        Self::Validation(
            "Please provide a positive integer for the number of months ahead.".into(),
        )
    }

    /// Create a validation error for a second budget argument other than `full`
    pub fn unknown_report_mode(mode: &str) -> Self {
        Self::Validation(format!(
            "Unknown report mode '{}'; use 'full' to show every envelope.",
            mode
        ))
    }

    /// Create an unsupported currency error
    pub fn unsupported_currency(account: impl Into<String>, currency: impl Into<String>) -> Self {
        Self::UnsupportedCurrency {
            account: account.into(),
            currency: currency.into(),
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::UnsupportedCurrency { .. }
        )
    }

    /// Check if the ledger failed to parse
    pub fn is_ledger(&self) -> bool {
        matches!(self, Self::Ledger(_))
    }

    /// Check if the storage backend rejected a commit
    pub fn is_commit(&self) -> bool {
        matches!(self, Self::Commit(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for BudgetError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<ParseErrors> for BudgetError {
    fn from(err: ParseErrors) -> Self {
        Self::Ledger(err)
    }
}

/// Result type alias for beanbudget operations
pub type BudgetResult<T> = Result<T, BudgetError>;
