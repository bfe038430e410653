//! Hierarchical account paths
//!
//! Accounts have no registry; an account exists because a posting names it.
//! A path is a colon-separated list of segments whose first segment is one of
//! the five ledger namespaces, e.g. `Expenses:Variable:Groceries`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ready-to-assign pool fed by income and drained by allocations
pub const INCOME_AVAILABLE: &str = "Income:Available";

/// Control account mirroring real spending in the budget currency
pub const EXPENSES_SPENT: &str = "Expenses:Spent";

/// Top-level account namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Namespace {
    Assets,
    Liabilities,
    Equity,
    Income,
    Expenses,
}

impl Namespace {
    /// The namespace as written in a path
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assets => "Assets",
            Self::Liabilities => "Liabilities",
            Self::Equity => "Equity",
            Self::Income => "Income",
            Self::Expenses => "Expenses",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "Assets" => Some(Self::Assets),
            "Liabilities" => Some(Self::Liabilities),
            "Equity" => Some(Self::Equity),
            "Income" => Some(Self::Income),
            "Expenses" => Some(Self::Expenses),
            _ => None,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated account path
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountPath(String);

impl AccountPath {
    /// Get the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The top-level namespace of this account
    pub fn namespace(&self) -> Namespace {
        self.0
            .split(':')
            .next()
            .and_then(Namespace::parse)
            .unwrap_or(Namespace::Equity)
    }

    /// Whether this account sits strictly below `prefix`
    ///
    /// `prefix` is a path without the trailing separator: `Expenses` matches
    /// `Expenses:Food` but not `Expenses` itself nor `ExpensesOld:Food`.
    pub fn is_under(&self, prefix: &str) -> bool {
        self.0
            .strip_prefix(prefix)
            .map(|rest| rest.starts_with(':'))
            .unwrap_or(false)
    }

    /// The final segment, used as the display name in reports
    pub fn leaf(&self) -> &str {
        self.0.rsplit(':').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for AccountPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AccountPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for AccountPath {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for AccountPath {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Error returned for a malformed account path
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid account name: {0}")]
pub struct AccountPathError(pub String);

impl FromStr for AccountPath {
    type Err = AccountPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AccountPathError(s.to_string());
        let mut segments = s.split(':');

        let root = segments.next().ok_or_else(invalid)?;
        if Namespace::parse(root).is_none() {
            return Err(invalid());
        }

        let mut children = 0;
        for segment in segments {
            let mut chars = segment.chars();
            let first_ok = chars
                .next()
                .map(|c| c.is_uppercase() || c.is_ascii_digit())
                .unwrap_or(false);
            let rest_ok = chars.all(|c| c.is_alphanumeric() || c == '-' || c == '_');
            if !first_ok || !rest_ok {
                return Err(invalid());
            }
            children += 1;
        }

        if children == 0 {
            return Err(invalid());
        }

        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for AccountPath {
    type Error = AccountPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccountPath> for String {
    fn from(path: AccountPath) -> Self {
        path.0
    }
}
