//! Intake dialogue formatting
//!
//! Renders prompts with numbered options and the final outcome of a session.

use crate::intake::{InputError, Prompt};
use crate::services::{Finished, Reply};

/// Format a prompt; choice options are numbered from 1
pub fn format_prompt(prompt: &Prompt) -> String {
    match prompt {
        Prompt::Text {
            message,
            placeholder,
        } => format!("{} (e.g. {})", message, placeholder),
        Prompt::Choice { message, options } => {
            let mut output = message.clone();
            for (index, option) in options.iter().enumerate() {
                output.push_str(&format!("\n  {}) {}", index + 1, option));
            }
            output
        }
    }
}

/// Format a rejected input followed by the repeated prompt
pub fn format_retry(error: &InputError, prompt: &Prompt) -> String {
    format!("{}\n{}", error, format_prompt(prompt))
}

/// Format the end of a session
pub fn format_finished(finished: &Finished) -> String {
    match finished {
        Finished::Committed { reports, .. } => {
            let mut output = finished.message().to_string();
            for report in reports {
                output.push_str("\n\n");
                output.push_str(report.trim_end());
            }
            output
        }
        other => other.message().to_string(),
    }
}

/// Format any reply
pub fn format_reply(reply: &Reply) -> String {
    match reply {
        Reply::Prompt(prompt) => format_prompt(prompt),
        Reply::Retry(error, prompt) => format_retry(error, prompt),
        Reply::Finished(finished) => format_finished(finished),
    }
}
