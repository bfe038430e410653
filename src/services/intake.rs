//! Intake service
//!
//! Drives the intake dialogue for many users. Each trigger (`start`,
//! `submit_text`, `submit_choice`, `cancel`) is processed to completion and
//! answered with either the next prompt or a terminal outcome.

use chrono::Duration;

use crate::audit::{AuditEntry, AuditLogger};
use crate::clock::Clock;
use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::intake::{
    IntakeContext, IntakeSession, IntakeState, Input, InputError, NewEntry, Prompt, SessionStore,
    Transition,
};
use crate::models::UserId;
use crate::storage::LedgerStore;

use super::report::{ReportRequest, ReportService};

/// Decides who may use the bot
pub trait Authorizer {
    fn is_allowed(&self, user: UserId) -> bool;
}

impl<F> Authorizer for F
where
    F: Fn(UserId) -> bool,
{
    fn is_allowed(&self, user: UserId) -> bool {
        self(user)
    }
}

/// Fixed list of allowed users; an empty list allows everyone
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    users: Vec<UserId>,
}

impl AllowList {
    pub fn new(users: Vec<UserId>) -> Self {
        Self { users }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.allowed_user_ids.clone())
    }
}

impl Authorizer for AllowList {
    fn is_allowed(&self, user: UserId) -> bool {
        self.users.is_empty() || self.users.contains(&user)
    }
}

/// How a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finished {
    /// The entry is in the ledger; `reports` are the regenerated position and
    /// budget reports (or the error that prevented one)
    Committed {
        entry_text: String,
        reports: Vec<String>,
    },
    Cancelled {
        reason: String,
    },
    Failed {
        detail: String,
    },
}

impl Finished {
    /// Text to show the user
    pub fn message(&self) -> &str {
        match self {
            Self::Committed { .. } => "Entry added successfully",
            Self::Cancelled { reason } => reason,
            Self::Failed { detail } => detail,
        }
    }
}

/// Answer to one trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Ask the next question
    Prompt(Prompt),
    /// The input was not accepted; ask again
    Retry(InputError, Prompt),
    /// The session is over
    Finished(Finished),
}

/// Service for the intake dialogue
pub struct IntakeService<S: LedgerStore, C: Clock> {
    settings: Settings,
    store: S,
    clock: C,
    sessions: SessionStore,
    audit: Option<AuditLogger>,
    authorizer: Box<dyn Authorizer>,
}

impl<S: LedgerStore, C: Clock> IntakeService<S, C> {
    /// Create a service allowing the users listed in settings
    pub fn new(settings: Settings, store: S, clock: C) -> Self {
        let authorizer = Box::new(AllowList::from_settings(&settings));
        Self {
            settings,
            store,
            clock,
            sessions: SessionStore::new(),
            audit: None,
            authorizer,
        }
    }

    /// Replace the authorization predicate
    pub fn with_authorizer(mut self, authorizer: impl Authorizer + 'static) -> Self {
        self.authorizer = Box::new(authorizer);
        self
    }

    /// Record finished sessions in an audit log
    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether `user` has a dialogue in progress
    pub fn is_active(&self, user: UserId) -> bool {
        self.sessions.is_active(user)
    }

    /// The question currently put to `user`
    pub fn current_prompt(&self, user: UserId) -> Option<Prompt> {
        let ctx = self.context();
        self.sessions.get(user).map(|session| session.state.prompt(&ctx))
    }

    /// Begin a new entry
    pub fn start(&mut self, user: UserId) -> BudgetResult<Reply> {
        self.authorize(user)?;
        self.expire_idle();

        let now = self.clock.now();
        let ctx = self.context();
        let session = self.sessions.start(user, now)?;
        tracing::info!(session = %session.id, %user, "Intake started");

        Ok(Reply::Prompt(session.state.prompt(&ctx)))
    }

    /// Answer a text question
    pub fn submit_text(&mut self, user: UserId, text: &str) -> BudgetResult<Reply> {
        self.advance(user, Input::Text(text.to_string()))
    }

    /// Answer a choice question
    pub fn submit_choice(&mut self, user: UserId, choice: &str) -> BudgetResult<Reply> {
        self.advance(user, Input::Choice(choice.to_string()))
    }

    /// Abandon the dialogue in progress
    pub fn cancel(&mut self, user: UserId) -> BudgetResult<Reply> {
        self.authorize(user)?;
        self.expire_idle();

        let session = self.sessions.remove(user).ok_or(BudgetError::NoSession)?;
        Ok(Reply::Finished(self.cancelled(&session, "Operation cancelled")))
    }

    fn authorize(&self, user: UserId) -> BudgetResult<()> {
        if self.authorizer.is_allowed(user) {
            Ok(())
        } else {
            tracing::warn!(%user, "Rejected unauthorized user");
            Err(BudgetError::Unauthorized(user))
        }
    }

    fn context(&self) -> IntakeContext {
        IntakeContext::new(&self.settings, self.clock.today())
    }

    /// Drop sessions idle for longer than the configured limit
    fn expire_idle(&mut self) {
        let max_idle = Duration::minutes(i64::from(self.settings.session_idle_minutes));
        for session in self.sessions.purge_idle(self.clock.now(), max_idle) {
            tracing::info!(session = %session.id, user = %session.user, "Intake expired");
            self.record(AuditEntry::cancelled(session.id, session.user, "Session expired"));
        }
    }

    fn advance(&mut self, user: UserId, input: Input) -> BudgetResult<Reply> {
        self.authorize(user)?;
        self.expire_idle();

        let mut session = self.sessions.take(user)?;
        let ctx = self.context();
        let state = std::mem::replace(&mut session.state, IntakeState::AwaitAmount);

        let reply = match state.advance(input, &ctx) {
            Transition::Next(next, prompt) => {
                tracing::debug!(session = %session.id, state = next.name(), "Intake advanced");
                session.state = next;
                self.sessions.put(session, self.clock.now());
                Reply::Prompt(prompt)
            }
            Transition::Retry(same, prompt, error) => {
                tracing::debug!(session = %session.id, state = same.name(), %error, "Intake input rejected");
                session.state = same;
                self.sessions.put(session, self.clock.now());
                Reply::Retry(error, prompt)
            }
            Transition::Confirmed(entry) => Reply::Finished(self.commit(&session, &entry)),
            Transition::Rejected => Reply::Finished(self.cancelled(&session, "Entry cancelled")),
            Transition::Abort(fault) => {
                tracing::warn!(session = %session.id, %fault, "Intake aborted");
                let detail = fault.to_string();
                self.record(AuditEntry::failed(session.id, session.user, None, detail.clone()));
                Reply::Finished(Finished::Failed { detail })
            }
        };

        Ok(reply)
    }

    fn commit(&self, session: &IntakeSession, entry: &NewEntry) -> Finished {
        let entry_text = entry.render(&self.settings.currencies.cash);

        match self.store.append_and_commit(&entry_text) {
            Ok(()) => {
                tracing::info!(session = %session.id, user = %session.user, "Intake committed");
                self.record(AuditEntry::committed(session.id, session.user, entry_text.clone()));
                Finished::Committed {
                    entry_text,
                    reports: self.regenerate_reports(),
                }
            }
            Err(e) => {
                tracing::warn!(session = %session.id, error = %e, "Intake commit failed");
                let detail = e.to_string();
                self.record(AuditEntry::failed(
                    session.id,
                    session.user,
                    Some(entry_text),
                    detail.clone(),
                ));
                Finished::Failed { detail }
            }
        }
    }

    fn cancelled(&self, session: &IntakeSession, reason: &str) -> Finished {
        tracing::info!(session = %session.id, user = %session.user, reason, "Intake cancelled");
        self.record(AuditEntry::cancelled(session.id, session.user, reason));
        Finished::Cancelled {
            reason: reason.to_string(),
        }
    }

    /// Position report then budget report, as rendered text
    fn regenerate_reports(&self) -> Vec<String> {
        let reports = ReportService::new(&self.store, &self.settings, &self.clock);
        let positions = reports.render_positions();
        let budget = reports.render_budget(&ReportRequest::default());

        [positions, budget]
            .into_iter()
            .map(|report| report.unwrap_or_else(|e| e.to_string()))
            .collect()
    }

    fn record(&self, entry: AuditEntry) {
        if let Some(audit) = &self.audit {
            if let Err(e) = audit.log(&entry) {
                tracing::warn!(error = %e, "Failed to write audit entry");
            }
        }
    }
}
