//! CLI command for the intake audit log

use crate::audit::AuditLogger;
use crate::error::BudgetResult;

use super::CliContext;

/// Handle `history [-n N]`
pub fn handle_history_command(ctx: &CliContext, count: usize) -> BudgetResult<()> {
    ctx.authorize()?;

    let logger = AuditLogger::new(ctx.paths.audit_log());
    let entries = logger.read_recent(count)?;

    if entries.is_empty() {
        println!("No entries recorded yet.");
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry.format_human_readable());
    }

    let totals: Vec<String> = logger
        .outcome_counts()?
        .iter()
        .map(|(outcome, count)| format!("{} {}", count, outcome.to_string().to_lowercase()))
        .collect();
    println!();
    println!("All sessions: {}", totals.join(", "));
    Ok(())
}
