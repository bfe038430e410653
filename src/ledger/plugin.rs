//! Automatic budget postings
//!
//! When the ledger declares the budget plugin, every real income or expense
//! posting is mirrored in the budget currency:
//!
//! - income `n` on `Income:X` moves `n` into the ready-to-assign pool
//!   (`Income:Available −n`, `Income:X +n`)
//! - spending `n` on `Expenses:X` draws the envelope down
//!   (`Expenses:Spent +n`, `Expenses:X −n`)
//!
//! Each generated pair sums to zero, so entries stay balanced.

use crate::models::{AccountPath, Entry, Namespace, Posting, PostingKind};
use crate::models::{EXPENSES_SPENT, INCOME_AVAILABLE};

/// Append mirrored allocation postings to every entry
pub fn apply_budget_postings(entries: &mut [Entry]) {
    let (Ok(available), Ok(spent)) = (
        INCOME_AVAILABLE.parse::<AccountPath>(),
        EXPENSES_SPENT.parse::<AccountPath>(),
    ) else {
        return;
    };

    for entry in entries.iter_mut() {
        let mut generated = Vec::new();

        for posting in entry
            .postings
            .iter()
            .filter(|p| p.kind == PostingKind::Cash)
        {
            match posting.account.namespace() {
                Namespace::Income => {
                    generated.push(Posting::allocation(available.clone(), -posting.amount));
                    generated.push(Posting::allocation(posting.account.clone(), posting.amount));
                }
                Namespace::Expenses => {
                    generated.push(Posting::allocation(spent.clone(), posting.amount));
                    generated.push(Posting::allocation(posting.account.clone(), -posting.amount));
                }
                _ => {}
            }
        }

        entry.postings.extend(generated);
    }
}
