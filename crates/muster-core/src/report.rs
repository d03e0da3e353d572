//! The launch-ordered account of a finished run.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;

// ─── OrchestrationReport ──────────────────────────────────────────────────

/// One operation's line in the final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub name: String,
    pub outcome: Outcome,
}

/// Everything a finished run produced: exactly one entry per launched
/// operation, in launch order, plus run-level timing.
///
/// Completion order never reorders the entries. Built once by the
/// orchestrator after every guard has joined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationReport {
    pub entries: Vec<ReportEntry>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl OrchestrationReport {
    /// Entries that did not complete: timed out or failed.
    pub fn incomplete(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| e.outcome.is_incomplete())
    }

    /// `true` when at least one operation timed out or failed.
    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(|e| e.outcome.is_incomplete())
    }

    /// Look up an operation's outcome by name; first match wins when names
    /// repeat.
    pub fn outcome(&self, name: &str) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.outcome)
    }
}

impl fmt::Display for OrchestrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.entries.len();
        let completed = total - self.incomplete().count();
        write!(
            f,
            "{completed}/{total} operations completed in {}ms",
            self.duration_ms
        )?;
        if self.has_failures() {
            write!(f, "\nincomplete:")?;
            for entry in self.incomplete() {
                match &entry.outcome {
                    Outcome::TimedOut => {
                        write!(f, "\n  * [Timeout: {} (Timeout)]", entry.name)?;
                    }
                    Outcome::Failed { error } => {
                        write!(f, "\n  * [Exception: {} ({error})]", entry.name)?;
                    }
                    Outcome::Completed { .. } => {}
                }
            }
        }
        Ok(())
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
