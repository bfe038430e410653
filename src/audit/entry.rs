//! Audit entry data structures
//!
//! One entry per finished intake session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{SessionId, UserId};

/// How an intake session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The entry was written to the ledger
    Committed,
    /// The user cancelled or rejected the entry, or the session expired
    Cancelled,
    /// The session was aborted or the ledger refused the entry
    Failed,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Committed => write!(f, "COMMITTED"),
            Outcome::Cancelled => write!(f, "CANCELLED"),
            Outcome::Failed => write!(f, "FAILED"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the session ended (UTC)
    pub timestamp: DateTime<Utc>,

    pub session_id: Uuid,

    pub user_id: UserId,

    pub outcome: Outcome,

    /// Ledger text of the entry, when one was assembled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_text: Option<String>,

    /// Error text or cancellation reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AuditEntry {
    fn new(session: SessionId, user: UserId, outcome: Outcome) -> Self {
        Self {
            timestamp: Utc::now(),
            session_id: *session.as_uuid(),
            user_id: user,
            outcome,
            entry_text: None,
            detail: None,
        }
    }

    /// Entry for a committed session
    pub fn committed(session: SessionId, user: UserId, entry_text: impl Into<String>) -> Self {
        Self {
            entry_text: Some(entry_text.into()),
            ..Self::new(session, user, Outcome::Committed)
        }
    }

    /// Entry for a cancelled session
    pub fn cancelled(session: SessionId, user: UserId, reason: impl Into<String>) -> Self {
        Self {
            detail: Some(reason.into()),
            ..Self::new(session, user, Outcome::Cancelled)
        }
    }

    /// Entry for a failed session
    pub fn failed(
        session: SessionId,
        user: UserId,
        entry_text: Option<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            entry_text,
            detail: Some(detail.into()),
            ..Self::new(session, user, Outcome::Failed)
        }
    }

    /// One-line summary for listings
    pub fn format_human_readable(&self) -> String {
        let mut line = format!(
            "{} {} user {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.outcome,
            self.user_id
        );

        if let Some(text) = &self.entry_text {
            if let Some(header) = text.lines().next() {
                line.push_str(&format!(" | {}", header));
            }
        }
        if let Some(detail) = &self.detail {
            let first = detail.lines().next().unwrap_or_default();
            line.push_str(&format!(" ({})", first));
        }

        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_committed_entry_serialization() {
        let entry = AuditEntry::committed(SessionId::new(), UserId(7), "2024-06-01 * \"\" \"\"");
        let json = serde_json::to_string(&entry).unwrap();

        assert!(json.contains("\"outcome\":\"committed\""));
        assert!(json.contains("\"user_id\":7"));
        assert!(!json.contains("detail"));

        let back: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_human_readable() {
        let entry = AuditEntry::failed(
            SessionId::new(),
            UserId(7),
            Some("2024-06-01 * \"\" \"\"\n    Expenses:Food 1 EUR".into()),
            "Error writing to ledger file:\nline 3: unbalanced",
        );
        let line = entry.format_human_readable();

        assert!(line.contains("FAILED user 7"));
        assert!(line.contains("| 2024-06-01 * \"\" \"\""));
        assert!(line.ends_with("(Error writing to ledger file:)"));
    }
}
