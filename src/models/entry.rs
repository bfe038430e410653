//! Ledger entries (transactions)

use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::{Money, Posting, PostingKind};

/// A dated, balanced set of postings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub date: NaiveDate,
    /// `*` for cleared, `!` for pending
    pub flag: char,
    pub payee: String,
    pub narration: String,
    pub tags: BTreeSet<String>,
    pub postings: Vec<Posting>,
    /// 1-based line of the header in the source text
    pub line: usize,
}

impl Entry {
    /// Create an entry without postings
    pub fn new(date: NaiveDate, payee: impl Into<String>, narration: impl Into<String>) -> Self {
        Self {
            date,
            flag: '*',
            payee: payee.into(),
            narration: narration.into(),
            tags: BTreeSet::new(),
            postings: Vec::new(),
            line: 0,
        }
    }

    /// Add a tag (builder style)
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Add a posting (builder style)
    pub fn with_posting(mut self, posting: Posting) -> Self {
        self.postings.push(posting);
        self
    }

    /// Check whether the entry carries a tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Per-kind sums that are not zero
    pub fn imbalances(&self) -> Vec<(PostingKind, Money)> {
        let mut sums: Vec<(PostingKind, Money)> = Vec::new();
        for posting in &self.postings {
            match sums.iter_mut().find(|(kind, _)| *kind == posting.kind) {
                Some((_, sum)) => *sum += posting.amount,
                None => sums.push((posting.kind.clone(), posting.amount)),
            }
        }
        sums.retain(|(_, sum)| !sum.is_zero());
        sums
    }

    /// Whether every currency sums to zero
    pub fn is_balanced(&self) -> bool {
        self.imbalances().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_balanced_entry() {
        let entry = Entry::new(date(), "AH", "Groceries")
            .with_posting(Posting::cash(
                "Expenses:Variable:Groceries".parse().unwrap(),
                Money::from_cents(4250),
            ))
            .with_posting(Posting::cash(
                "Assets:Cash".parse().unwrap(),
                Money::from_cents(-4250),
            ));
        assert!(entry.is_balanced());
    }

    #[test]
    fn test_imbalance_is_per_kind() {
        let entry = Entry::new(date(), "", "")
            .with_tag("budget")
            .with_posting(Posting::cash(
                "Expenses:Variable:Groceries".parse().unwrap(),
                Money::from_cents(100),
            ))
            .with_posting(Posting::allocation(
                "Income:Available".parse().unwrap(),
                Money::from_cents(-100),
            ));
        let imbalances = entry.imbalances();
        assert_eq!(imbalances.len(), 2);
        assert!(entry.has_tag("budget"));
    }
}
