//! Per-operation result and outcome types.

use serde::{Deserialize, Serialize};

// ─── OpResult ─────────────────────────────────────────────────────────────

/// The value a successful operation produces. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpResult {
    pub message: String,
    pub success: bool,
}

impl OpResult {
    /// A successful result carrying `message`.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }
}

// ─── Outcome ──────────────────────────────────────────────────────────────

/// Terminal classification of one supervised operation.
///
/// Exactly one outcome exists per launched operation; it is assigned once
/// and never overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The operation finished before its deadline without error.
    Completed { result: OpResult },
    /// The deadline elapsed first; cancellation was broadcast.
    TimedOut,
    /// The operation returned an error (or its task panicked) before the
    /// deadline. `error` is the failure's rendering, captured verbatim.
    Failed { error: String },
}

impl Outcome {
    /// `true` for every outcome other than [`Outcome::Completed`].
    pub fn is_incomplete(&self) -> bool {
        !matches!(self, Outcome::Completed { .. })
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
