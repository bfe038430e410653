//! Report formatting for plain-text output
//!
//! Fixed-column tables sized by [`ReportLayout`]. The output is plain text so
//! it can be sent as a chat message or printed to a terminal unchanged.

use crate::config::ReportLayout;
use crate::models::Money;
use crate::reports::{BudgetReport, PositionReport};

/// Truncate a string to `max_len` characters, marking the cut with `...`
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

/// Right-align text in a field of given width
pub fn right_align(s: &str, width: usize) -> String {
    format!("{:>width$}", s, width = width)
}

/// Left-align text in a field of given width
pub fn left_align(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "-".repeat(width)
}

fn name_cell(name: &str, layout: &ReportLayout) -> String {
    left_align(&truncate(name, layout.name_width), layout.name_width)
}

fn amount_cell(amount: Money, layout: &ReportLayout) -> String {
    format!(" {}", right_align(&amount.to_string(), layout.amount_width))
}

fn text_cell(text: &str, layout: &ReportLayout) -> String {
    format!(" {}", right_align(text, layout.amount_width))
}

fn table_width(layout: &ReportLayout, amount_columns: usize) -> usize {
    layout.name_width + amount_columns * (layout.amount_width + 1)
}

/// Render the budget report
///
/// Columns are the assigned and spent amounts of the horizon month and the
/// cumulative amount left. The `Available` pool is shown only for the full
/// (unfiltered) report.
pub fn format_budget_report(report: &BudgetReport, layout: &ReportLayout) -> String {
    let width = table_width(layout, 3);
    let mut output = String::new();

    output.push_str(&format!("Budget through {}\n", report.horizon));
    output.push_str(&name_cell("Account", layout));
    output.push_str(&text_cell("Assigned", layout));
    output.push_str(&text_cell("Spent", layout));
    output.push_str(&text_cell("Left", layout));
    output.push('\n');
    output.push_str(&separator(width));
    output.push('\n');

    for row in &report.rows {
        output.push_str(&name_cell(row.name(), layout));
        output.push_str(&amount_cell(row.assigned_this_period, layout));
        output.push_str(&amount_cell(row.spent_this_period, layout));
        output.push_str(&amount_cell(row.remaining, layout));
        output.push('\n');
    }

    if !report.filtered {
        output.push_str(&separator(width));
        output.push('\n');
        output.push_str(&name_cell("Available", layout));
        output.push_str(&amount_cell(report.available, layout));
        output.push('\n');
    }

    output
}

/// Render the position report
pub fn format_position_report(report: &PositionReport, layout: &ReportLayout) -> String {
    let width = table_width(layout, 1);
    let mut output = String::new();

    output.push_str(&format!("Positions as of {}\n", report.as_of));
    output.push_str(&name_cell("Account", layout));
    output.push_str(&text_cell("Balance", layout));
    output.push('\n');
    output.push_str(&separator(width));
    output.push('\n');

    for row in &report.rows {
        output.push_str(&name_cell(row.name(), layout));
        output.push_str(&amount_cell(row.balance, layout));
        output.push('\n');
    }

    output.push_str(&separator(width));
    output.push('\n');
    output.push_str(&name_cell("Net", layout));
    output.push_str(&amount_cell(report.net, layout));
    output.push('\n');

    output
}
