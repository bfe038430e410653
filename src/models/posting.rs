//! Postings and the currencies that classify them
//!
//! A posting in the budget currency is an allocation (money assigned to an
//! envelope), a posting in the cash currency is a real movement of money. The
//! classification is made once, when the ledger is read, so the aggregators
//! never compare currency strings.

use serde::{Deserialize, Serialize};

use super::{AccountPath, Money};

/// Currency codes of record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currencies {
    /// Currency of real cash movements
    pub cash: String,
    /// Synthetic currency used for budget allocations
    pub budget: String,
}

impl Default for Currencies {
    fn default() -> Self {
        Self {
            cash: "EUR".to_string(),
            budget: "BGT_EUR".to_string(),
        }
    }
}

impl Currencies {
    /// Classify a currency code
    pub fn kind_of(&self, currency: &str) -> PostingKind {
        if currency == self.cash {
            PostingKind::Cash
        } else if currency == self.budget {
            PostingKind::Allocation
        } else {
            PostingKind::Other(currency.to_string())
        }
    }

    /// The currency code a posting kind is written with
    pub fn code<'a>(&'a self, kind: &'a PostingKind) -> &'a str {
        match kind {
            PostingKind::Cash => &self.cash,
            PostingKind::Allocation => &self.budget,
            PostingKind::Other(code) => code,
        }
    }
}

/// What a posting amount represents
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PostingKind {
    /// Real money in the cash currency
    Cash,
    /// Budget assignment in the budget currency
    Allocation,
    /// Any other commodity
    Other(String),
}

/// One signed amount on one account within an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub account: AccountPath,
    pub amount: Money,
    pub kind: PostingKind,
}

impl Posting {
    /// Create a posting
    pub fn new(account: AccountPath, amount: Money, kind: PostingKind) -> Self {
        Self {
            account,
            amount,
            kind,
        }
    }

    /// Create a cash posting
    pub fn cash(account: AccountPath, amount: Money) -> Self {
        Self::new(account, amount, PostingKind::Cash)
    }

    /// Create an allocation posting
    pub fn allocation(account: AccountPath, amount: Money) -> Self {
        Self::new(account, amount, PostingKind::Allocation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_of() {
        let currencies = Currencies::default();
        assert_eq!(currencies.kind_of("EUR"), PostingKind::Cash);
        assert_eq!(currencies.kind_of("BGT_EUR"), PostingKind::Allocation);
        assert_eq!(
            currencies.kind_of("USD"),
            PostingKind::Other("USD".to_string())
        );
    }

    #[test]
    fn test_code_round_trips_kind() {
        let currencies = Currencies::default();
        for code in ["EUR", "BGT_EUR", "VTI"] {
            let kind = currencies.kind_of(code);
            assert_eq!(currencies.code(&kind), code);
        }
    }
}
