//! Posting selection
//!
//! Flattens entries into posting rows restricted to a horizon and an account
//! predicate. Both report aggregators start from here.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::{AccountPath, Entry, Money, PostingKind};

/// One posting together with the entry fields the aggregators need
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingRow<'a> {
    pub date: NaiveDate,
    pub tags: &'a BTreeSet<String>,
    pub account: &'a AccountPath,
    pub amount: Money,
    pub kind: &'a PostingKind,
}

impl PostingRow<'_> {
    /// Whether the owning entry carries `tag`
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// Postings dated on or before `horizon` whose account satisfies `predicate`
///
/// Rows keep ledger order: entries as given, postings within an entry as
/// written.
pub fn filter_postings<'a, P>(entries: &'a [Entry], horizon: NaiveDate, predicate: P) -> Vec<PostingRow<'a>>
where
    P: Fn(&AccountPath) -> bool,
{
    entries
        .iter()
        .filter(|entry| entry.date <= horizon)
        .flat_map(|entry| {
            entry.postings.iter().map(move |posting| PostingRow {
                date: entry.date,
                tags: &entry.tags,
                account: &posting.account,
                amount: posting.amount,
                kind: &posting.kind,
            })
        })
        .filter(|row| predicate(row.account))
        .collect()
}
