//! Rendering a completed intake into ledger text
//!
//! A [`NewEntry`] always has exactly two postings: the counterparty posting
//! carrying the signed amount and the asset/liability posting carrying its
//! opposite.

use std::fmt;

use chrono::NaiveDate;

use crate::models::{AccountPath, Money};

/// Type key that takes income from a counterparty
pub const INCOME_TYPE: &str = "Income";

/// Type key whose counterparties are full account paths
pub const TRANSFER_TYPE: &str = "Transfer";

/// Placeholder text that renders as an empty payee or narration
pub const EMPTY_PLACEHOLDER: &str = ".";

/// Kind of entry being added, one per counterparty group
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryType {
    /// Money received; the entered amount is negated on the income account
    Income,
    /// Money moved between two balance-sheet accounts
    Transfer,
    /// Spending in a category group such as `Expenses:Variable`
    Category(String),
}

impl EntryType {
    /// Classify a type key from the counterparty mapping
    pub fn from_key(key: &str) -> Self {
        match key {
            INCOME_TYPE => Self::Income,
            TRANSFER_TYPE => Self::Transfer,
            other => Self::Category(other.to_string()),
        }
    }

    /// The key as offered to the user
    pub fn key(&self) -> &str {
        match self {
            Self::Income => INCOME_TYPE,
            Self::Transfer => TRANSFER_TYPE,
            Self::Category(key) => key,
        }
    }

    /// Full account path of the counterparty posting
    pub fn counterparty_path(&self, counterparty: &str) -> String {
        match self {
            Self::Transfer => counterparty.to_string(),
            other => format!("{}:{}", other.key(), counterparty),
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// An amount as the user typed it
///
/// Keeps the number of decimals so `1000` is written back as `1000`, not
/// `1000.00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryAmount {
    pub value: Money,
    pub scale: u8,
}

impl EntryAmount {
    /// Create an amount
    pub fn new(value: Money, scale: u8) -> Self {
        Self { value, scale }
    }

    /// The amount with its sign flipped
    pub fn negated(&self) -> Self {
        Self::new(-self.value, self.scale)
    }
}

impl fmt::Display for EntryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value.format_scaled(self.scale))
    }
}

/// Every field of a new entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    date: NaiveDate,
    payee: String,
    narration: String,
    entry_type: EntryType,
    counterparty: AccountPath,
    account: AccountPath,
    amount: EntryAmount,
}

impl NewEntry {
    pub(crate) fn new(
        date: NaiveDate,
        payee: String,
        narration: String,
        entry_type: EntryType,
        counterparty: AccountPath,
        account: AccountPath,
        amount: EntryAmount,
    ) -> Self {
        Self {
            date,
            payee,
            narration,
            entry_type,
            counterparty,
            account,
            amount,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn entry_type(&self) -> &EntryType {
        &self.entry_type
    }

    pub fn counterparty(&self) -> &AccountPath {
        &self.counterparty
    }

    pub fn account(&self) -> &AccountPath {
        &self.account
    }

    /// Amount on the counterparty posting
    pub fn counterparty_amount(&self) -> EntryAmount {
        match self.entry_type {
            EntryType::Income => self.amount.negated(),
            _ => self.amount,
        }
    }

    /// Payee as written to the ledger
    pub fn payee(&self) -> &str {
        blank_placeholder(&self.payee)
    }

    /// Narration as written to the ledger
    pub fn narration(&self) -> &str {
        blank_placeholder(&self.narration)
    }

    /// Render the three-line ledger block, without a trailing newline
    pub fn render(&self, currency: &str) -> String {
        let amount = self.counterparty_amount();
        format!(
            "{} * \"{}\" \"{}\"\n    {} {} {}\n    {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.payee(),
            self.narration(),
            self.counterparty,
            amount,
            currency,
            self.account,
            amount.negated(),
            currency,
        )
    }
}

fn blank_placeholder(text: &str) -> &str {
    if text == EMPTY_PLACEHOLDER {
        ""
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::ledger;

    fn entry(entry_type: &str, counterparty: &str, account: &str, amount: &str) -> NewEntry {
        let entry_type = EntryType::from_key(entry_type);
        let (value, scale) = Money::parse_with_scale(amount).unwrap();
        NewEntry::new(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            ".".into(),
            ".".into(),
            entry_type.clone(),
            entry_type.counterparty_path(counterparty).parse().unwrap(),
            account.parse().unwrap(),
            EntryAmount::new(value, scale),
        )
    }

    #[test]
    fn test_expense_entry_text() {
        let text = entry("Expenses:Variable", "Groceries", "Assets:Cash", "42.50").render("EUR");
        assert_eq!(
            text,
            "2024-06-01 * \"\" \"\"\n    Expenses:Variable:Groceries 42.50 EUR\n    Assets:Cash -42.50 EUR"
        );
    }

    #[test]
    fn test_income_is_negated() {
        let text = entry("Income", "Salary", "Assets:NL:ING:Checking59", "1000").render("EUR");
        assert_eq!(
            text,
            "2024-06-01 * \"\" \"\"\n    Income:Salary -1000 EUR\n    Assets:NL:ING:Checking59 1000 EUR"
        );
    }

    #[test]
    fn test_transfer_uses_counterparty_verbatim() {
        let built = entry("Transfer", "Assets:BE:WISE:Savings", "Assets:NL:ING:Checking59", "250");
        assert_eq!(built.counterparty(), &"Assets:BE:WISE:Savings");
        assert!(built.render("EUR").contains("\n    Assets:BE:WISE:Savings 250 EUR\n"));
    }

    #[test]
    fn test_payee_and_narration_kept() {
        let mut built = entry("Expenses:Variable", "EatOut", "Assets:Cash", "12.5");
        built.payee = "Cafe".into();
        built.narration = "Lunch".into();
        let text = built.render("EUR");
        assert!(text.starts_with("2024-06-01 * \"Cafe\" \"Lunch\"\n"));
        assert!(text.contains("Expenses:Variable:EatOut 12.5 EUR"));
        assert!(text.contains("Assets:Cash -12.5 EUR"));
    }

    #[test]
    fn test_rendered_entry_parses_balanced() {
        let settings = Settings::default();
        let text = entry("Expenses:Variable", "Groceries", "Assets:Cash", "42.50").render("EUR");

        let parsed = ledger::parse(&text, &settings.currencies).unwrap();
        assert_eq!(parsed.entries.len(), 1);

        let parsed_entry = &parsed.entries[0];
        assert!(parsed_entry.is_balanced());
        assert_eq!(parsed_entry.postings.len(), 2);
        assert_eq!(parsed_entry.postings[0].account, "Expenses:Variable:Groceries");
        assert_eq!(parsed_entry.postings[0].amount, Money::from_cents(4250));
        assert_eq!(parsed_entry.postings[1].account, "Assets:Cash");
        assert_eq!(parsed_entry.payee, "");
        assert_eq!(parsed_entry.narration, "");
    }
}
