//! Operation handles and the context they run with.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use futures::future::BoxFuture;

use crate::cancel::CancelSignal;
use crate::outcome::OpResult;

/// What an operation evaluates to: a successful [`OpResult`] or an arbitrary
/// error the guard captures as text.
pub type OperationResult = anyhow::Result<OpResult>;

type OperationFn = Box<dyn FnOnce(OperationContext) -> BoxFuture<'static, OperationResult> + Send>;

// ─── OperationContext ─────────────────────────────────────────────────────

/// Everything an operation receives at launch: its input message and the
/// run-wide cancellation signal it is expected to honor at its suspension
/// points.
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub input: String,
    pub cancel: CancelSignal,
}

// ─── NamedOperation ───────────────────────────────────────────────────────

/// One named asynchronous unit of work, owned by the orchestrator for the
/// duration of a run.
///
/// The orchestrator invokes the wrapped closure exactly once, handing it an
/// [`OperationContext`]. What the operation does internally (delay, network
/// call, computation) is its own business; the supervisor only sees the
/// eventual [`OperationResult`].
pub struct NamedOperation {
    pub(crate) name: String,
    pub(crate) input: String,
    pub(crate) timeout: Option<Duration>,
    pub(crate) run: OperationFn,
}

impl NamedOperation {
    /// Wrap an async closure as a named operation with the given input.
    pub fn new<F, Fut>(name: impl Into<String>, input: impl Into<String>, run: F) -> Self
    where
        F: FnOnce(OperationContext) -> Fut + Send + 'static,
        Fut: Future<Output = OperationResult> + Send + 'static,
    {
        Self {
            name: name.into(),
            input: input.into(),
            timeout: None,
            run: Box::new(move |ctx| Box::pin(run(ctx))),
        }
    }

    /// Race this operation against its own deadline instead of the shared
    /// one.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The operation's display name, used in logs and the final report.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The input message handed to the operation at launch.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Debug for NamedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedOperation")
            .field("name", &self.name)
            .field("input", &self.input)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
