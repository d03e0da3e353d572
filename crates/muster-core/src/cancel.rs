//! Run-scoped cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Notify;

// ─── CancelSignal ─────────────────────────────────────────────────────────

/// A single cancellation signal shared by every operation in a run.
///
/// The signal starts unset. The first [`cancel`](CancelSignal::cancel) sets
/// it and wakes every waiter; subsequent calls are no-ops. Cancellation is
/// requested, never enforced: an operation that ignores the signal runs to
/// its own completion point, so cooperative workloads check
/// [`is_cancelled`](CancelSignal::is_cancelled) in straight-line code or
/// await [`cancelled`](CancelSignal::cancelled) at suspension points.
///
/// Clones are cheap and share the same underlying flag.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelSignal {
    /// Create a fresh, unset signal.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                cancelled: AtomicBool::new(false),
                notify: Notify::new(),
            }),
        }
    }

    /// Request cancellation.
    ///
    /// Idempotent: only the first call flips the flag and wakes waiters.
    pub fn cancel(&self) {
        if !self.shared.cancelled.swap(true, Ordering::SeqCst) {
            self.shared.notify.notify_waiters();
        }
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::SeqCst)
    }

    /// Suspend until cancellation is requested.
    ///
    /// Returns immediately if the signal is already set.
    pub async fn cancelled(&self) {
        // Register the waiter before re-checking the flag so a `cancel()`
        // landing between the check and the await cannot be missed.
        let notified = self.shared.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if self.is_cancelled() {
            return;
        }
        notified.await;
    }

    /// Sleep for `duration`, waking early if the signal fires first.
    ///
    /// Returns `Ok(())` when the full duration elapsed and `Err(Cancelled)`
    /// when cancellation won the race.
    pub async fn sleep(&self, duration: Duration) -> Result<(), Cancelled> {
        tokio::select! {
            () = tokio::time::sleep(duration) => Ok(()),
            () = self.cancelled() => Err(Cancelled),
        }
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Returned by cancellation-aware waits when the signal fired first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cancelled before completion")]
pub struct Cancelled;

// ─── Tests ────────────────────────────────────────────────────────────────
