//! `muster-core` — deadline-supervised execution of concurrent async operations.
//!
//! A batch of named operations is launched concurrently, each racing a shared
//! deadline. The first timeout broadcasts a cooperative cancellation request
//! to every operation still in flight, and every outcome is collected into a
//! launch-ordered report, so one operation's failure never masks another's.
//!
//! # Architecture
//!
//! ```text
//! NamedOperation (×N)
//!     │
//!     ▼
//! Orchestrator     ← spawns every operation with one shared CancelSignal
//!     │
//!     ▼
//! guard (×N)       ← races one operation against the deadline;
//!     │               broadcasts cancellation on the first timeout
//!     ▼
//! OutcomeCollector ← pre-sized slots, exactly one write per operation
//!     │
//!     ▼
//! OrchestrationReport ← launch-ordered outcomes + run timing
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use muster_core::{NamedOperation, OpResult, Orchestrator};
//!
//! let ops = vec![
//!     NamedOperation::new("greet", "hello", |ctx| async move {
//!         Ok(OpResult::ok(ctx.input))
//!     }),
//! ];
//!
//! let orchestrator = Orchestrator::new(Duration::from_secs(2));
//! let report = orchestrator.execute(ops).await;
//! println!("{report}");
//! ```

pub mod cancel;
pub mod collector;
pub mod operation;
pub mod orchestrator;
pub mod outcome;
pub mod report;

pub(crate) mod guard;

#[cfg(test)]
mod tests;

pub use cancel::{CancelSignal, Cancelled};
pub use collector::OutcomeCollector;
pub use operation::{NamedOperation, OperationContext, OperationResult};
pub use orchestrator::{Orchestrator, RunState};
pub use outcome::{OpResult, Outcome};
pub use report::{OrchestrationReport, ReportEntry};

use std::time::Duration;

/// Run one batch of operations against a shared deadline.
///
/// Convenience wrapper over [`Orchestrator`] for callers that do not need to
/// reuse the orchestrator or observe its [`RunState`].
///
/// # Example
///
/// ```rust,ignore
/// use std::time::Duration;
/// use muster_core::{execute, NamedOperation, OpResult};
///
/// let report = execute(
///     vec![NamedOperation::new("greet", "hi", |ctx| async move {
///         Ok(OpResult::ok(ctx.input))
///     })],
///     Duration::from_secs(2),
/// )
/// .await;
/// assert!(!report.has_failures());
/// ```
pub async fn execute(operations: Vec<NamedOperation>, timeout: Duration) -> OrchestrationReport {
    Orchestrator::new(timeout).execute(operations).await
}
