//! Append-only JSONL log of finished intake sessions

use std::path::{Path, PathBuf};

use crate::error::{BudgetError, BudgetResult};
use crate::storage::file_io::{append_line, read_text};

use super::entry::{AuditEntry, Outcome};

/// Writes and reads the audit log file
#[derive(Debug, Clone)]
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append one entry as a JSON line
    pub fn log(&self, entry: &AuditEntry) -> BudgetResult<()> {
        let json = serde_json::to_string(entry)
            .map_err(|e| BudgetError::Json(format!("Failed to serialize audit entry: {}", e)))?;
        append_line(&self.log_path, &json)?;
        tracing::debug!(outcome = %entry.outcome, user = %entry.user_id, "Audit entry written");
        Ok(())
    }

    /// Every entry, oldest first; a missing log reads as empty
    pub fn read_all(&self) -> BudgetResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        read_text(&self.log_path)?
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|e| {
                    BudgetError::Json(format!("Corrupt audit log at line {}: {}", index + 1, e))
                })
            })
            .collect()
    }

    /// The last `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> BudgetResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    /// Number of sessions per outcome, in committed/cancelled/failed order
    pub fn outcome_counts(&self) -> BudgetResult<[(Outcome, usize); 3]> {
        let entries = self.read_all()?;
        let count = |outcome| entries.iter().filter(|e| e.outcome == outcome).count();
        Ok([
            (Outcome::Committed, count(Outcome::Committed)),
            (Outcome::Cancelled, count(Outcome::Cancelled)),
            (Outcome::Failed, count(Outcome::Failed)),
        ])
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}
