//! Intake state machine
//!
//! Each variant of [`IntakeState`] carries exactly the fields collected so
//! far, so a state can never be advanced with a missing value. Transitions are
//! pure: the caller supplies the option lists in an [`IntakeContext`] and acts
//! on the returned [`Transition`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::config::Settings;
use crate::models::period::recent_days;
use crate::models::{AccountPath, Money, MoneyParseError};

use super::entry_builder::{EntryAmount, EntryType, NewEntry};

/// Number of days offered for the entry date, today included
pub const DATE_CHOICES: u32 = 6;

/// Confirmation option that commits the entry
pub const CONFIRM: &str = "Yes";

/// Confirmation option that discards the entry
pub const REJECT: &str = "No";

/// A recoverable problem with one input; the same question is asked again
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("'{0}' is not a valid amount")]
    InvalidAmount(String),

    #[error("Amounts can have at most two decimals: '{0}'")]
    TooPrecise(String),

    #[error("'{0}' is larger than any amount the ledger accepts")]
    TooLarge(String),

    #[error("The amount must not be zero")]
    ZeroAmount,

    #[error("Text must not contain double quotes or line breaks")]
    ForbiddenCharacter,

    #[error("'{0}' is not one of the options")]
    UnknownOption(String),

    #[error("Please type a value")]
    ExpectedText,

    #[error("Please pick one of the options")]
    ExpectedChoice,
}

impl From<MoneyParseError> for InputError {
    fn from(e: MoneyParseError) -> Self {
        match e {
            MoneyParseError::TooPrecise(s) => Self::TooPrecise(s),
            MoneyParseError::InvalidFormat(s) => Self::InvalidAmount(s),
            MoneyParseError::TooLarge(s) => Self::TooLarge(s),
        }
    }
}

/// A problem that ends the session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeFault {
    #[error("Invalid type: {0}")]
    UnmappedType(String),

    #[error("Invalid account '{0}' in the option lists")]
    InvalidAccount(String),
}

/// One user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Free-form text
    Text(String),
    /// One of the offered options, by value
    Choice(String),
}

/// What the user is asked next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Text { message: String, placeholder: String },
    Choice { message: String, options: Vec<String> },
}

impl Prompt {
    fn text(message: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self::Text {
            message: message.into(),
            placeholder: placeholder.into(),
        }
    }

    fn choice(message: impl Into<String>, options: Vec<String>) -> Self {
        Self::Choice {
            message: message.into(),
            options,
        }
    }

    /// The question text
    pub fn message(&self) -> &str {
        match self {
            Self::Text { message, .. } | Self::Choice { message, .. } => message,
        }
    }

    /// Offered options, empty for a text prompt
    pub fn options(&self) -> &[String] {
        match self {
            Self::Text { .. } => &[],
            Self::Choice { options, .. } => options,
        }
    }

    /// Whether the prompt expects a choice
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Choice { .. })
    }
}

/// Option lists and settings a transition needs
#[derive(Debug, Clone)]
pub struct IntakeContext {
    /// Offered entry types, sorted
    pub types: Vec<String>,
    /// Counterparty options per entry type
    pub counterparties: BTreeMap<String, Vec<String>>,
    /// Balance-sheet accounts offered for the second posting
    pub accounts: Vec<String>,
    /// Offered entry dates, oldest first
    pub dates: Vec<NaiveDate>,
    /// Currency written on both postings
    pub currency: String,
}

impl IntakeContext {
    /// Build the option lists from settings as of `today`
    pub fn new(settings: &Settings, today: NaiveDate) -> Self {
        Self {
            types: settings.counterparties.keys().cloned().collect(),
            counterparties: settings.counterparties.clone(),
            accounts: settings.accounts.clone(),
            dates: recent_days(today, DATE_CHOICES),
            currency: settings.currencies.cash.clone(),
        }
    }

    fn date_options(&self) -> Vec<String> {
        self.dates.iter().map(|d| d.format("%m-%d").to_string()).collect()
    }

    fn date_for(&self, choice: &str) -> Option<NaiveDate> {
        self.dates
            .iter()
            .copied()
            .find(|d| d.format("%m-%d").to_string() == choice)
    }

    fn counterparty_options(&self, entry_type: &EntryType) -> Option<&Vec<String>> {
        self.counterparties
            .get(entry_type.key())
            .filter(|options| !options.is_empty())
    }
}

/// Where an intake session stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeState {
    AwaitAmount,
    AwaitType {
        amount: EntryAmount,
    },
    AwaitNarration {
        amount: EntryAmount,
        entry_type: EntryType,
    },
    AwaitPayee {
        amount: EntryAmount,
        entry_type: EntryType,
        narration: String,
    },
    AwaitDate {
        amount: EntryAmount,
        entry_type: EntryType,
        narration: String,
        payee: String,
    },
    AwaitCounterparty {
        amount: EntryAmount,
        entry_type: EntryType,
        narration: String,
        payee: String,
        date: NaiveDate,
    },
    AwaitAccount {
        amount: EntryAmount,
        entry_type: EntryType,
        narration: String,
        payee: String,
        date: NaiveDate,
        counterparty: AccountPath,
    },
    AwaitConfirmation {
        entry: NewEntry,
    },
}

/// Result of feeding one input to a state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Input accepted; ask the next question
    Next(IntakeState, Prompt),
    /// Input rejected; ask the same question again
    Retry(IntakeState, Prompt, InputError),
    /// The user confirmed the entry
    Confirmed(NewEntry),
    /// The user rejected the entry
    Rejected,
    /// The session cannot continue
    Abort(IntakeFault),
}

impl IntakeState {
    /// Short state name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::AwaitAmount => "await_amount",
            Self::AwaitType { .. } => "await_type",
            Self::AwaitNarration { .. } => "await_narration",
            Self::AwaitPayee { .. } => "await_payee",
            Self::AwaitDate { .. } => "await_date",
            Self::AwaitCounterparty { .. } => "await_counterparty",
            Self::AwaitAccount { .. } => "await_account",
            Self::AwaitConfirmation { .. } => "await_confirmation",
        }
    }

    /// The question this state asks
    pub fn prompt(&self, ctx: &IntakeContext) -> Prompt {
        match self {
            Self::AwaitAmount => {
                Prompt::text(format!("Enter the amount in {}", ctx.currency), "420.69")
            }
            Self::AwaitType { .. } => Prompt::choice("Select type", ctx.types.clone()),
            Self::AwaitNarration { .. } => Prompt::text("Enter the narration", "Weekly groceries"),
            Self::AwaitPayee { .. } => Prompt::text("Enter the payee", "ALBERT HEIJN"),
            Self::AwaitDate { .. } => Prompt::choice("Select a date", ctx.date_options()),
            Self::AwaitCounterparty { entry_type, .. } => Prompt::choice(
                "Select a counterparty",
                ctx.counterparty_options(entry_type).cloned().unwrap_or_default(),
            ),
            Self::AwaitAccount { .. } => Prompt::choice("Select an account", ctx.accounts.clone()),
            Self::AwaitConfirmation { entry } => Prompt::choice(
                format!("Is the entry correct?\n{}", entry.render(&ctx.currency)),
                vec![CONFIRM.to_string(), REJECT.to_string()],
            ),
        }
    }

    /// Feed one input to the state
    pub fn advance(self, input: Input, ctx: &IntakeContext) -> Transition {
        match self.accept(&input, ctx) {
            Ok(Step::Next(next)) => {
                let prompt = next.prompt(ctx);
                Transition::Next(next, prompt)
            }
            Ok(Step::Confirmed(entry)) => Transition::Confirmed(entry),
            Ok(Step::Rejected) => Transition::Rejected,
            Err(Failure::Input(error)) => {
                let prompt = self.prompt(ctx);
                Transition::Retry(self, prompt, error)
            }
            Err(Failure::Fault(fault)) => Transition::Abort(fault),
        }
    }

    fn accept(&self, input: &Input, ctx: &IntakeContext) -> Result<Step, Failure> {
        let step = match self {
            Self::AwaitAmount => Self::AwaitType {
                amount: parse_amount(text(input)?)?,
            },
            Self::AwaitType { amount } => {
                let key = pick(input, &ctx.types)?;
                Self::AwaitNarration {
                    amount: *amount,
                    entry_type: EntryType::from_key(key),
                }
            }
            Self::AwaitNarration { amount, entry_type } => Self::AwaitPayee {
                amount: *amount,
                entry_type: entry_type.clone(),
                narration: free_text(text(input)?)?,
            },
            Self::AwaitPayee {
                amount,
                entry_type,
                narration,
            } => Self::AwaitDate {
                amount: *amount,
                entry_type: entry_type.clone(),
                narration: narration.clone(),
                payee: free_text(text(input)?)?,
            },
            Self::AwaitDate {
                amount,
                entry_type,
                narration,
                payee,
            } => {
                let choice = pick(input, &ctx.date_options())?.to_string();
                let date = ctx
                    .date_for(&choice)
                    .ok_or(Failure::Input(InputError::UnknownOption(choice)))?;
                if ctx.counterparty_options(entry_type).is_none() {
                    return Err(Failure::Fault(IntakeFault::UnmappedType(
                        entry_type.key().to_string(),
                    )));
                }
                Self::AwaitCounterparty {
                    amount: *amount,
                    entry_type: entry_type.clone(),
                    narration: narration.clone(),
                    payee: payee.clone(),
                    date,
                }
            }
            Self::AwaitCounterparty {
                amount,
                entry_type,
                narration,
                payee,
                date,
            } => {
                let options = ctx
                    .counterparty_options(entry_type)
                    .ok_or_else(|| Failure::Fault(IntakeFault::UnmappedType(entry_type.key().to_string())))?;
                let chosen = pick(input, options)?;
                Self::AwaitAccount {
                    amount: *amount,
                    entry_type: entry_type.clone(),
                    narration: narration.clone(),
                    payee: payee.clone(),
                    date: *date,
                    counterparty: account_path(&entry_type.counterparty_path(chosen))?,
                }
            }
            Self::AwaitAccount {
                amount,
                entry_type,
                narration,
                payee,
                date,
                counterparty,
            } => {
                let chosen = pick(input, &ctx.accounts)?;
                Self::AwaitConfirmation {
                    entry: NewEntry::new(
                        *date,
                        payee.clone(),
                        narration.clone(),
                        entry_type.clone(),
                        counterparty.clone(),
                        account_path(chosen)?,
                        *amount,
                    ),
                }
            }
            Self::AwaitConfirmation { entry } => {
                let options = [CONFIRM.to_string(), REJECT.to_string()];
                return match pick(input, &options)? {
                    CONFIRM => Ok(Step::Confirmed(entry.clone())),
                    _ => Ok(Step::Rejected),
                };
            }
        };
        Ok(Step::Next(step))
    }
}

enum Step {
    Next(IntakeState),
    Confirmed(NewEntry),
    Rejected,
}

enum Failure {
    Input(InputError),
    Fault(IntakeFault),
}

impl From<InputError> for Failure {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

fn text(input: &Input) -> Result<&str, InputError> {
    match input {
        Input::Text(text) => Ok(text.trim()),
        Input::Choice(_) => Err(InputError::ExpectedText),
    }
}

fn pick<'a>(input: &Input, options: &'a [String]) -> Result<&'a str, InputError> {
    let Input::Choice(choice) = input else {
        return Err(InputError::ExpectedChoice);
    };
    options
        .iter()
        .find(|option| option.as_str() == choice.trim())
        .map(|option| option.as_str())
        .ok_or_else(|| InputError::UnknownOption(choice.clone()))
}

fn parse_amount(text: &str) -> Result<EntryAmount, InputError> {
    let (value, scale) = Money::parse_with_scale(text)?;
    if value.is_zero() {
        return Err(InputError::ZeroAmount);
    }
    Ok(EntryAmount::new(value, scale))
}

fn free_text(text: &str) -> Result<String, InputError> {
    if text.contains('"') || text.contains('\n') || text.contains('\r') {
        return Err(InputError::ForbiddenCharacter);
    }
    Ok(text.to_string())
}

fn account_path(path: &str) -> Result<AccountPath, Failure> {
    path.parse()
        .map_err(|_| Failure::Fault(IntakeFault::InvalidAccount(path.to_string())))
}
