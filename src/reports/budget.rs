//! Budget Report
//!
//! Per expense envelope: what was assigned and spent in the horizon month,
//! what was assigned and spent overall, and what is left. Also totals the
//! ready-to-assign pool on `Income:Available`.

use std::collections::BTreeMap;
use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Settings;
use crate::error::BudgetResult;
use crate::models::period::same_month;
use crate::models::{AccountPath, Entry, Money, PostingKind, EXPENSES_SPENT, INCOME_AVAILABLE};

use super::filter::filter_postings;

/// Aggregated figures for one expense account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetRow {
    pub account: AccountPath,
    /// Allocations up to the horizon
    pub assigned_total: Money,
    /// Allocations dated in the horizon month
    pub assigned_this_period: Money,
    /// Cash spending up to the horizon
    pub spent_total: Money,
    /// Cash spending dated in the horizon month
    pub spent_this_period: Money,
    /// `assigned_total - spent_total`
    pub remaining: Money,
}

impl BudgetRow {
    fn new(account: AccountPath) -> Self {
        Self {
            account,
            assigned_total: Money::zero(),
            assigned_this_period: Money::zero(),
            spent_total: Money::zero(),
            spent_this_period: Money::zero(),
            remaining: Money::zero(),
        }
    }

    /// Short display name
    pub fn name(&self) -> &str {
        self.account.leaf()
    }
}

/// How the budget report selects and filters rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetOptions {
    /// Drop rows under the hidden prefixes
    pub filtered: bool,
    /// Tag an allocation needs to count
    pub budget_tag: String,
    /// Prefixes dropped in filtered mode
    pub hidden_prefixes: Vec<String>,
}

impl BudgetOptions {
    /// Options from settings
    pub fn from_settings(settings: &Settings, filtered: bool) -> Self {
        Self {
            filtered,
            budget_tag: settings.budget_tag.clone(),
            hidden_prefixes: settings.hidden_prefixes.clone(),
        }
    }

    fn is_hidden(&self, account: &AccountPath) -> bool {
        self.hidden_prefixes
            .iter()
            .any(|prefix| account.as_str().starts_with(prefix.as_str()))
    }
}

impl Default for BudgetOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default(), true)
    }
}

/// Budget report for one horizon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetReport {
    /// Last day included
    pub horizon: NaiveDate,
    /// Rows sorted by account path
    pub rows: Vec<BudgetRow>,
    /// Running total of `Income:Available`
    pub available: Money,
    /// Whether hidden prefixes were dropped
    pub filtered: bool,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    horizon: String,
    account: &'a str,
    name: &'a str,
    assigned_this_period: String,
    assigned_total: String,
    spent_this_period: String,
    spent_total: String,
    remaining: String,
}

fn is_tracked(account: &AccountPath) -> bool {
    (account.is_under("Expenses") && *account != EXPENSES_SPENT) || *account == INCOME_AVAILABLE
}

impl BudgetReport {
    /// Aggregate `entries` up to `horizon`
    pub fn generate(entries: &[Entry], horizon: NaiveDate, options: &BudgetOptions) -> Self {
        let mut accounts: BTreeMap<AccountPath, BudgetRow> = BTreeMap::new();
        let mut available = Money::zero();

        for row in filter_postings(entries, horizon, is_tracked) {
            if *row.account == INCOME_AVAILABLE {
                available += row.amount;
                continue;
            }

            let in_period = same_month(row.date, horizon);
            let aggregate = accounts
                .entry(row.account.clone())
                .or_insert_with(|| BudgetRow::new(row.account.clone()));

            match row.kind {
                PostingKind::Cash => {
                    aggregate.spent_total += row.amount;
                    if in_period {
                        aggregate.spent_this_period += row.amount;
                    }
                }
                PostingKind::Allocation if row.has_tag(&options.budget_tag) => {
                    aggregate.assigned_total += row.amount;
                    if in_period {
                        aggregate.assigned_this_period += row.amount;
                    }
                }
                _ => {}
            }
        }

        let rows = accounts
            .into_values()
            .filter(|row| !(options.filtered && options.is_hidden(&row.account)))
            .map(|mut row| {
                row.remaining = row.assigned_total - row.spent_total;
                row
            })
            .collect();

        Self {
            horizon,
            rows,
            available,
            filtered: options.filtered,
        }
    }

    /// Find the row for an account
    pub fn row(&self, account: &str) -> Option<&BudgetRow> {
        self.rows.iter().find(|row| row.account == account)
    }

    /// Export the rows to CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> BudgetResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let horizon = self.horizon.to_string();

        for row in &self.rows {
            csv.serialize(CsvRow {
                horizon: horizon.clone(),
                account: row.account.as_str(),
                name: row.name(),
                assigned_this_period: row.assigned_this_period.to_string(),
                assigned_total: row.assigned_total.to_string(),
                spent_this_period: row.spent_this_period.to_string(),
                spent_total: row.spent_total.to_string(),
                remaining: row.remaining.to_string(),
            })?;
        }

        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Posting;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn account(s: &str) -> AccountPath {
        s.parse().unwrap()
    }

    fn spend(date: NaiveDate, expense: &str, cents: i64) -> Entry {
        Entry::new(date, "", "")
            .with_posting(Posting::cash(account(expense), Money::from_cents(cents)))
            .with_posting(Posting::cash(account("Assets:Cash"), Money::from_cents(-cents)))
    }

    fn assign(date: NaiveDate, expense: &str, cents: i64) -> Entry {
        Entry::new(date, "", "")
            .with_tag("budget")
            .with_posting(Posting::allocation(account(expense), Money::from_cents(cents)))
            .with_posting(Posting::allocation(account(INCOME_AVAILABLE), Money::from_cents(-cents)))
    }

    fn ledger() -> Vec<Entry> {
        vec![
            assign(d(2024, 5, 1), "Expenses:Variable:Groceries", 20000),
            assign(d(2024, 6, 1), "Expenses:Variable:Groceries", 30000),
            assign(d(2024, 6, 1), "Expenses:Fixed:Rent", 100000),
            spend(d(2024, 5, 20), "Expenses:Variable:Groceries", 15000),
            spend(d(2024, 6, 3), "Expenses:Variable:Groceries", 4250),
            spend(d(2024, 6, 4), "Expenses:Fixed:Rent", 100000),
            spend(d(2024, 7, 2), "Expenses:Variable:Groceries", 999),
        ]
    }

    #[test]
    fn test_sums_and_period_buckets() {
        let report = BudgetReport::generate(&ledger(), d(2024, 6, 30), &BudgetOptions::default());

        let groceries = report.row("Expenses:Variable:Groceries").unwrap();
        assert_eq!(groceries.assigned_total, Money::from_cents(50000));
        assert_eq!(groceries.assigned_this_period, Money::from_cents(30000));
        assert_eq!(groceries.spent_total, Money::from_cents(19250));
        assert_eq!(groceries.spent_this_period, Money::from_cents(4250));
        assert_eq!(groceries.remaining, Money::from_cents(30750));
        assert_eq!(groceries.name(), "Groceries");
    }

    #[test]
    fn test_available_pool_accumulates() {
        let report = BudgetReport::generate(&ledger(), d(2024, 6, 30), &BudgetOptions::default());
        assert_eq!(report.available, Money::from_cents(-150000));
        assert!(report.row(INCOME_AVAILABLE).is_none());
    }

    #[test]
    fn test_filtered_mode_only_drops_rows() {
        let filtered = BudgetReport::generate(&ledger(), d(2024, 6, 30), &BudgetOptions::default());
        let full_options = BudgetOptions {
            filtered: false,
            ..BudgetOptions::default()
        };
        let full = BudgetReport::generate(&ledger(), d(2024, 6, 30), &full_options);

        assert!(filtered.row("Expenses:Fixed:Rent").is_none());
        assert!(full.row("Expenses:Fixed:Rent").is_some());
        assert_eq!(
            filtered.row("Expenses:Variable:Groceries"),
            full.row("Expenses:Variable:Groceries")
        );
        assert_eq!(filtered.available, full.available);
    }

    #[test]
    fn test_untagged_allocations_ignored() {
        let mut untagged = assign(d(2024, 6, 1), "Expenses:Variable:Fun", 500);
        untagged.tags.clear();
        let report = BudgetReport::generate(&[untagged], d(2024, 6, 30), &BudgetOptions::default());

        let fun = report.row("Expenses:Variable:Fun").unwrap();
        assert_eq!(fun.assigned_total, Money::zero());
    }

    #[test]
    fn test_negative_allocations_count() {
        let entries = vec![
            assign(d(2024, 6, 1), "Expenses:Variable:Fun", 500),
            assign(d(2024, 6, 2), "Expenses:Variable:Fun", -200),
        ];
        let report = BudgetReport::generate(&entries, d(2024, 6, 30), &BudgetOptions::default());
        assert_eq!(
            report.row("Expenses:Variable:Fun").unwrap().assigned_total,
            Money::from_cents(300)
        );
    }

    #[test]
    fn test_spent_control_account_excluded_and_sorted() {
        let entries = vec![
            spend(d(2024, 6, 1), "Expenses:Zoo", 1),
            spend(d(2024, 6, 1), "Expenses:Spent", 1),
            spend(d(2024, 6, 1), "Expenses:Art", 1),
        ];
        let report = BudgetReport::generate(&entries, d(2024, 6, 30), &BudgetOptions::default());
        let accounts: Vec<&str> = report.rows.iter().map(|r| r.account.as_str()).collect();
        assert_eq!(accounts, vec!["Expenses:Art", "Expenses:Zoo"]);
    }

    #[test]
    fn test_period_bucket_checks_year() {
        let entries = vec![spend(d(2023, 6, 10), "Expenses:Food", 700)];
        let report = BudgetReport::generate(&entries, d(2024, 6, 30), &BudgetOptions::default());
        let food = report.row("Expenses:Food").unwrap();
        assert_eq!(food.spent_total, Money::from_cents(700));
        assert_eq!(food.spent_this_period, Money::zero());
    }

    #[test]
    fn test_csv_export() {
        let report = BudgetReport::generate(&ledger(), d(2024, 6, 30), &BudgetOptions::default());

        let mut output = Vec::new();
        report.export_csv(&mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("horizon,account,name,assigned_this_period"));
        assert!(text.contains("2024-06-30,Expenses:Variable:Groceries,Groceries,300.00,500.00,42.50,192.50,307.50"));
    }
}
