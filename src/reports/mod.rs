//! Reports module for beanbudget
//!
//! Pure aggregations over a ledger snapshot: the monthly budget report and
//! the account position report.

pub mod budget;
pub mod filter;
pub mod positions;

pub use budget::{BudgetOptions, BudgetReport, BudgetRow};
pub use filter::{filter_postings, PostingRow};
pub use positions::{PositionReport, PositionRow};
