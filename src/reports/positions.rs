//! Position Report
//!
//! Net cash position of every asset and liability account as of a date.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{AccountPath, Currencies, Entry, Money, PostingKind};

use super::filter::filter_postings;

/// Net position of one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionRow {
    pub account: AccountPath,
    pub balance: Money,
}

impl PositionRow {
    /// Short display name
    pub fn name(&self) -> &str {
        self.account.leaf()
    }
}

/// Positions of all balance-sheet accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionReport {
    /// Last day included
    pub as_of: NaiveDate,
    /// Rows sorted by account path
    pub rows: Vec<PositionRow>,
    /// Sum over all rows
    pub net: Money,
}

fn is_balance_sheet(account: &AccountPath) -> bool {
    account.is_under("Assets") || account.is_under("Liabilities")
}

impl PositionReport {
    /// Sum every asset and liability posting dated on or before `as_of`
    ///
    /// Fails on the first posting that is not in the cash currency.
    pub fn generate(entries: &[Entry], as_of: NaiveDate, currencies: &Currencies) -> BudgetResult<Self> {
        let mut balances: BTreeMap<AccountPath, Money> = BTreeMap::new();

        for row in filter_postings(entries, as_of, is_balance_sheet) {
            if *row.kind != PostingKind::Cash {
                return Err(BudgetError::unsupported_currency(
                    row.account.as_str(),
                    currencies.code(row.kind),
                ));
            }
            *balances.entry(row.account.clone()).or_default() += row.amount;
        }

        let rows: Vec<PositionRow> = balances
            .into_iter()
            .map(|(account, balance)| PositionRow { account, balance })
            .collect();
        let net = rows.iter().map(|row| row.balance).sum();

        Ok(Self { as_of, rows, net })
    }
}
