//! The per-operation deadline race.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::cancel::CancelSignal;
use crate::collector::OutcomeCollector;
use crate::operation::OperationResult;
use crate::outcome::Outcome;

// ─── Launched ─────────────────────────────────────────────────────────────

/// One launched operation under supervision: its collector slot, display
/// name, running task, and the deadline it races.
pub(crate) struct Launched {
    pub(crate) slot: usize,
    pub(crate) name: String,
    pub(crate) handle: JoinHandle<OperationResult>,
    pub(crate) deadline: Duration,
}

// ─── Deadline race ────────────────────────────────────────────────────────

/// Race one operation against its deadline, classify the result, and record
/// exactly one outcome.
///
/// Three terminal cases:
/// - the deadline elapses first: `TimedOut`, and cancellation is broadcast
///   so the remaining operations can stop early;
/// - the operation finishes with `Ok`: `Completed`;
/// - the operation finishes with `Err`, or its task panics: the error text
///   is captured verbatim into `Failed` and goes no further; a failure here
///   never aborts a sibling operation.
///
/// The race is decided by polling order: completion is checked before the
/// deadline, so an operation finishing in the same tick as the deadline is
/// classified as completed, not timed out. A timed-out operation is not
/// aborted; its task keeps running until it observes the broadcast, and its
/// eventual result is dropped with the detached handle.
pub(crate) async fn supervise(
    launched: Launched,
    collector: &OutcomeCollector,
    cancel: &CancelSignal,
) {
    let Launched {
        slot,
        name,
        mut handle,
        deadline,
    } = launched;

    let outcome = match tokio::time::timeout(deadline, &mut handle).await {
        Err(_elapsed) => {
            warn!(
                operation = %name,
                timeout = ?deadline,
                "deadline elapsed; requesting cancellation"
            );
            cancel.cancel();
            Outcome::TimedOut
        }
        Ok(Ok(Ok(result))) => {
            info!(operation = %name, message = %result.message, "operation completed");
            Outcome::Completed { result }
        }
        Ok(Ok(Err(err))) => {
            let error = format!("{err:#}");
            error!(operation = %name, error = %error, "operation failed");
            Outcome::Failed { error }
        }
        Ok(Err(join_err)) => {
            error!(operation = %name, error = %join_err, "operation task died");
            Outcome::Failed {
                error: join_err.to_string(),
            }
        }
    };

    collector.record(slot, outcome);
}

// ─── Tests ────────────────────────────────────────────────────────────────
