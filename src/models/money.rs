//! Fixed-point ledger amounts
//!
//! Ledger amounts carry at most two decimals, so an amount is a signed count
//! of cents. Parsing never rounds: a third decimal is an error.
//!
//! Parsed amounts are capped at [`MAX_UNITS`] whole units, so summing the
//! postings of any ledger short of tens of thousands of maximal amounts
//! stays inside `i64`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};

/// Largest magnitude, in whole units, a parsed amount may have
pub const MAX_UNITS: i64 = 1_000_000_000_000;

/// A signed amount in hundredths of the currency unit
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Amount from a count of cents
    ///
    /// ```
    /// use beanbudget::models::Money;
    /// assert_eq!(Money::from_cents(-4250).to_string(), "-42.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parse a ledger amount such as `42.50`, `-3` or `+0.5`
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        Self::parse_with_scale(s).map(|(money, _)| money)
    }

    /// Parse a ledger amount and report how many decimals it was written with
    pub fn parse_with_scale(s: &str) -> Result<(Self, u8), MoneyParseError> {
        let raw = s.trim();
        let invalid = || MoneyParseError::InvalidFormat(raw.to_string());

        let (sign, digits) = match raw.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, raw.strip_prefix('+').unwrap_or(raw)),
        };
        let (whole, decimals) = match digits.split_once('.') {
            Some((whole, decimals)) => (whole, decimals),
            None => (digits, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(decimals) {
            return Err(invalid());
        }
        if digits.ends_with('.') {
            return Err(invalid());
        }
        if decimals.len() > 2 {
            return Err(MoneyParseError::TooPrecise(raw.to_string()));
        }

        let scale = decimals.len() as u8;
        let fraction = format!("{:0<2}", decimals)
            .parse::<i64>()
            .map_err(|_| invalid())?;

        let units = match whole.parse::<i64>() {
            Ok(units) if units <= MAX_UNITS => units,
            _ => return Err(MoneyParseError::TooLarge(raw.to_string())),
        };
        if units == MAX_UNITS && fraction > 0 {
            return Err(MoneyParseError::TooLarge(raw.to_string()));
        }

        Ok((Self(sign * (units * 100 + fraction)), scale))
    }

    /// Render with `scale` decimals, falling back to two when that would
    /// drop a non-zero digit
    pub fn format_scaled(&self, scale: u8) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let (whole, cents) = (magnitude / 100, magnitude % 100);

        match scale {
            0 if cents == 0 => format!("{sign}{whole}"),
            1 if cents % 10 == 0 => format!("{sign}{whole}.{}", cents / 10),
            _ => format!("{sign}{whole}.{cents:02}"),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.format_scaled(2))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

/// Why an amount could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    TooPrecise(String),
    TooLarge(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(f, "Invalid amount: {}", s),
            Self::TooPrecise(s) => write!(f, "Amount has more than two decimals: {}", s),
            Self::TooLarge(s) => write!(f, "Amount exceeds {} units: {}", MAX_UNITS, s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
