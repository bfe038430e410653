//! Per-user intake sessions
//!
//! A session is created by `start`, replaced on every accepted input and
//! removed when it reaches a terminal outcome, is cancelled, or sits idle for
//! too long.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};

use crate::error::{BudgetError, BudgetResult};
use crate::models::{SessionId, UserId};

use super::state::IntakeState;

/// One user's dialogue in progress
#[derive(Debug, Clone)]
pub struct IntakeSession {
    pub id: SessionId,
    pub user: UserId,
    pub state: IntakeState,
    pub started_at: NaiveDateTime,
    pub last_activity: NaiveDateTime,
}

impl IntakeSession {
    fn new(user: UserId, now: NaiveDateTime) -> Self {
        Self {
            id: SessionId::new(),
            user,
            state: IntakeState::AwaitAmount,
            started_at: now,
            last_activity: now,
        }
    }

    /// Whether the session has been idle for longer than `max_idle`
    pub fn is_idle(&self, now: NaiveDateTime, max_idle: Duration) -> bool {
        now - self.last_activity > max_idle
    }
}

/// Active sessions keyed by user
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<UserId, IntakeSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session in `AwaitAmount`
    ///
    /// A user has at most one session; starting another while one is active
    /// fails with [`BudgetError::SessionActive`].
    pub fn start(&mut self, user: UserId, now: NaiveDateTime) -> BudgetResult<&IntakeSession> {
        if self.sessions.contains_key(&user) {
            return Err(BudgetError::SessionActive);
        }
        Ok(self
            .sessions
            .entry(user)
            .or_insert_with(|| IntakeSession::new(user, now)))
    }

    pub fn get(&self, user: UserId) -> Option<&IntakeSession> {
        self.sessions.get(&user)
    }

    pub fn is_active(&self, user: UserId) -> bool {
        self.sessions.contains_key(&user)
    }

    /// Take a session out to advance it
    pub fn take(&mut self, user: UserId) -> BudgetResult<IntakeSession> {
        self.sessions.remove(&user).ok_or(BudgetError::NoSession)
    }

    /// Put an advanced session back, stamping its activity time
    pub fn put(&mut self, mut session: IntakeSession, now: NaiveDateTime) {
        session.last_activity = now;
        self.sessions.insert(session.user, session);
    }

    pub fn remove(&mut self, user: UserId) -> Option<IntakeSession> {
        self.sessions.remove(&user)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop sessions idle for longer than `max_idle`, returning them
    pub fn purge_idle(&mut self, now: NaiveDateTime, max_idle: Duration) -> Vec<IntakeSession> {
        let stale: Vec<UserId> = self
            .sessions
            .values()
            .filter(|session| session.is_idle(now, max_idle))
            .map(|session| session.user)
            .collect();

        stale
            .into_iter()
            .filter_map(|user| self.sessions.remove(&user))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_start_once_per_user() {
        let mut store = SessionStore::new();
        store.start(UserId(1), at(12, 0)).unwrap();

        assert!(matches!(store.start(UserId(1), at(12, 1)), Err(BudgetError::SessionActive)));
        assert!(store.start(UserId(2), at(12, 1)).is_ok());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_take_and_put() {
        let mut store = SessionStore::new();
        store.start(UserId(1), at(12, 0)).unwrap();

        let session = store.take(UserId(1)).unwrap();
        assert!(!store.is_active(UserId(1)));
        assert!(matches!(store.take(UserId(1)), Err(BudgetError::NoSession)));

        store.put(session, at(12, 5));
        assert_eq!(store.get(UserId(1)).unwrap().last_activity, at(12, 5));
    }

    #[test]
    fn test_purge_idle() {
        let mut store = SessionStore::new();
        store.start(UserId(1), at(12, 0)).unwrap();
        store.start(UserId(2), at(12, 20)).unwrap();

        let purged = store.purge_idle(at(12, 31), Duration::minutes(30));

        assert_eq!(purged.len(), 1);
        assert_eq!(purged[0].user, UserId(1));
        assert!(store.is_active(UserId(2)));
        assert!(!store.is_active(UserId(1)));
    }
}
