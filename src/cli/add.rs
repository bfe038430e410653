//! CLI command for the guided intake dialogue
//!
//! Reads one answer per line. Choices may be given by number or by value;
//! `/cancel` or end of input abandons the entry.

use std::io::{BufRead, Write};

use crate::audit::AuditLogger;
use crate::clock::{Clock, SystemClock};
use crate::display::intake::format_reply;
use crate::error::BudgetResult;
use crate::intake::Prompt;
use crate::models::UserId;
use crate::services::{IntakeService, Reply};
use crate::storage::LedgerStore;

use super::CliContext;

/// Line that cancels the dialogue
pub const CANCEL_COMMAND: &str = "/cancel";

/// Handle `add`
pub fn handle_add_command(ctx: &CliContext) -> BudgetResult<()> {
    ctx.authorize()?;

    let mut service = IntakeService::new(ctx.settings.clone(), ctx.ledger_store(), SystemClock)
        .with_audit(AuditLogger::new(ctx.paths.audit_log()));

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_dialogue(&mut service, ctx.user, stdin.lock(), stdout.lock())
}

/// Map a typed answer onto an option: `2` picks the second option
fn resolve_choice<'a>(prompt: &'a Prompt, answer: &'a str) -> &'a str {
    answer
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| prompt.options().get(index))
        .map(|option| option.as_str())
        .unwrap_or(answer)
}

fn current_prompt(reply: &Reply) -> Option<&Prompt> {
    match reply {
        Reply::Prompt(prompt) | Reply::Retry(_, prompt) => Some(prompt),
        Reply::Finished(_) => None,
    }
}

/// Run one dialogue to completion over line-based input and output
pub fn run_dialogue<S, C, R, W>(
    service: &mut IntakeService<S, C>,
    user: UserId,
    input: R,
    mut output: W,
) -> BudgetResult<()>
where
    S: LedgerStore,
    C: Clock,
    R: BufRead,
    W: Write,
{
    let mut reply = service.start(user)?;
    let mut lines = input.lines();

    loop {
        writeln!(output, "{}", format_reply(&reply))?;

        let Some(prompt) = current_prompt(&reply) else {
            break;
        };
        write!(output, "> ")?;
        output.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => {
                writeln!(output)?;
                reply = service.cancel(user)?;
                continue;
            }
        };
        let answer = line.trim();

        reply = if answer == CANCEL_COMMAND {
            service.cancel(user)?
        } else if prompt.is_choice() {
            let choice = resolve_choice(prompt, answer).to_string();
            service.submit_choice(user, &choice)?
        } else {
            service.submit_text(user, answer)?
        };
    }

    Ok(())
}
