//! Launching, supervising, and reporting on a batch of operations.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{error, info, warn};

use crate::cancel::CancelSignal;
use crate::collector::OutcomeCollector;
use crate::guard::{self, Launched};
use crate::operation::{NamedOperation, OperationContext};
use crate::report::OrchestrationReport;

// ─── RunState ─────────────────────────────────────────────────────────────

/// Coarse orchestrator state, exposed for observability only.
///
/// This is not a synchronization primitive: it never gates `execute` and
/// nothing may rely on it for mutual exclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RunState {
    Idle = 0,
    Running = 1,
}

impl From<u8> for RunState {
    fn from(value: u8) -> Self {
        match value {
            1 => RunState::Running,
            _ => RunState::Idle,
        }
    }
}

impl From<RunState> for u8 {
    fn from(state: RunState) -> Self {
        state as u8
    }
}

// ─── Orchestrator ─────────────────────────────────────────────────────────

/// Runs batches of named operations, racing each against a shared deadline.
///
/// Every call to [`execute`](Orchestrator::execute) is an independent run
/// with its own cancellation signal and its own collector; the orchestrator
/// itself carries only the configured deadline and an observability
/// [`RunState`].
#[derive(Debug)]
pub struct Orchestrator {
    timeout: Duration,
    state: AtomicU8,
}

impl Orchestrator {
    /// Create an orchestrator whose operations race `timeout` unless they
    /// carry their own override.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            state: AtomicU8::new(RunState::Idle.into()),
        }
    }

    /// The shared deadline applied to operations without an override.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Current coarse state of the orchestrator.
    pub fn state(&self) -> RunState {
        RunState::from(self.state.load(Ordering::SeqCst))
    }

    /// Run every operation to a terminal outcome and report.
    ///
    /// Launches the whole batch concurrently, hands each operation the
    /// run's [`CancelSignal`], and supervises each through its own guard.
    /// The join over the guards is unconditional: one guard timing out,
    /// failing, or even panicking never stops the orchestrator from waiting
    /// on the rest, so no operation ends the run unsupervised. Failure is
    /// data in the returned report, never an `Err` from this method.
    pub async fn execute(&self, operations: Vec<NamedOperation>) -> OrchestrationReport {
        self.state.store(RunState::Running.into(), Ordering::SeqCst);
        let started_at = Utc::now();
        let started = Instant::now();

        let cancel = CancelSignal::new();
        let collector = Arc::new(OutcomeCollector::new(
            operations.iter().map(|op| op.name.clone()),
        ));

        info!(
            operations = operations.len(),
            timeout = ?self.timeout,
            "launching batch"
        );

        let mut guards = Vec::with_capacity(operations.len());
        for (slot, op) in operations.into_iter().enumerate() {
            let deadline = op.timeout.unwrap_or(self.timeout);
            let ctx = OperationContext {
                input: op.input,
                cancel: cancel.clone(),
            };
            info!(operation = %op.name, "launching operation");
            let handle = tokio::spawn((op.run)(ctx));

            let launched = Launched {
                slot,
                name: op.name,
                handle,
                deadline,
            };
            let collector = Arc::clone(&collector);
            let cancel = cancel.clone();
            guards.push(tokio::spawn(async move {
                guard::supervise(launched, &collector, &cancel).await;
            }));
        }

        // Unconditional join: every guard is awaited no matter how its
        // siblings fared.
        for guard in guards {
            if let Err(err) = guard.await {
                error!(error = %err, "guard task failed to join");
            }
        }

        self.state.store(RunState::Idle.into(), Ordering::SeqCst);

        let report = OrchestrationReport {
            entries: collector.report_entries(),
            started_at,
            duration_ms: started.elapsed().as_millis() as u64,
        };

        let incomplete = report.incomplete().count();
        if incomplete > 0 {
            warn!(
                incomplete,
                total = report.entries.len(),
                "run finished with incomplete operations"
            );
        } else {
            info!(total = report.entries.len(), "all operations completed");
        }

        report
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
