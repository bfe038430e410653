//! Display formatting for plain-text output
//!
//! Report tables and intake dialogue rendering.

pub mod intake;
pub mod report;

pub use intake::{format_finished, format_prompt, format_reply};
pub use report::{format_budget_report, format_position_report};
