//! CLI commands for reports

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::clock::SystemClock;
use crate::display::report::{format_budget_report, format_position_report};
use crate::error::{BudgetError, BudgetResult};
use crate::services::{ReportRequest, ReportService};

use super::CliContext;

/// Handle `budget [MONTHS] [full] [--csv PATH]`
pub fn handle_budget_command(
    ctx: &CliContext,
    args: &[String],
    csv: Option<PathBuf>,
) -> BudgetResult<()> {
    ctx.authorize()?;
    let request = ReportRequest::from_args(args)?;

    let store = ctx.ledger_store();
    let clock = SystemClock;
    let service = ReportService::new(&store, &ctx.settings, &clock);
    let report = service.budget_report(&request)?;

    print!("{}", format_budget_report(&report, &ctx.settings.layout));

    if let Some(path) = csv {
        let file = File::create(&path).map_err(|e| {
            BudgetError::Csv(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        report.export_csv(BufWriter::new(file))?;
        eprintln!("Budget report exported to: {}", path.display());
    }

    Ok(())
}

/// Handle `accounts`
pub fn handle_accounts_command(ctx: &CliContext) -> BudgetResult<()> {
    ctx.authorize()?;

    let store = ctx.ledger_store();
    let clock = SystemClock;
    let service = ReportService::new(&store, &ctx.settings, &clock);
    let report = service.position_report()?;

    print!("{}", format_position_report(&report, &ctx.settings.layout));
    Ok(())
}
