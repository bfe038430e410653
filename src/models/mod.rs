//! Core data models for beanbudget
//!
//! This module contains the data structures of the ledger domain: amounts,
//! account paths, postings, entries and identifiers.

pub mod account;
pub mod entry;
pub mod ids;
pub mod money;
pub mod period;
pub mod posting;

pub use account::{AccountPath, AccountPathError, Namespace, EXPENSES_SPENT, INCOME_AVAILABLE};
pub use entry::Entry;
pub use ids::{SessionId, UserId};
pub use money::{Money, MoneyParseError};
pub use posting::{Currencies, Posting, PostingKind};
