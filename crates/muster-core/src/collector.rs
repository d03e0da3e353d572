//! Thread-safe, write-once collection of operation outcomes.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{error, warn};

use crate::outcome::Outcome;
use crate::report::ReportEntry;

// ─── OutcomeCollector ─────────────────────────────────────────────────────

/// Launch-ordered, write-once store for operation outcomes.
///
/// Built once from the launch-ordered operation names, with one pre-sized
/// slot per operation. Guards record into their own slot concurrently; a
/// slot accepts exactly one write, so no outcome is ever lost or
/// overwritten. The mutex around the slots is the only shared mutable state
/// in a run and is never held across an await point.
#[derive(Debug)]
pub struct OutcomeCollector {
    slots: Mutex<Vec<Slot>>,
}

#[derive(Debug)]
struct Slot {
    name: String,
    outcome: Option<Outcome>,
}

impl OutcomeCollector {
    /// Create a collector with one empty slot per operation name, in launch
    /// order.
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        let slots = names
            .into_iter()
            .map(|name| Slot {
                name,
                outcome: None,
            })
            .collect();
        Self {
            slots: Mutex::new(slots),
        }
    }

    /// Record the outcome for the operation at `slot`.
    ///
    /// First write wins: a second write to the same slot is discarded and
    /// logged, never applied. Returns `true` when the outcome was stored.
    pub fn record(&self, slot: usize, outcome: Outcome) -> bool {
        let mut slots = self.lock();
        match slots.get_mut(slot) {
            Some(entry) if entry.outcome.is_none() => {
                entry.outcome = Some(outcome);
                true
            }
            Some(entry) => {
                warn!(operation = %entry.name, "duplicate outcome discarded");
                false
            }
            None => {
                error!(slot, "outcome recorded for unknown slot");
                false
            }
        }
    }

    /// Number of slots, equal to the number of operations launched.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// `true` when the collector was built from zero operations.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of outcomes recorded so far.
    pub fn recorded(&self) -> usize {
        self.lock().iter().filter(|s| s.outcome.is_some()).count()
    }

    /// `true` once every slot holds an outcome.
    pub fn is_complete(&self) -> bool {
        self.lock().iter().all(|s| s.outcome.is_some())
    }

    /// A stable, launch-ordered copy of every outcome recorded so far.
    ///
    /// Slots not yet written are omitted; after all guards have joined this
    /// is the complete run.
    pub fn snapshot(&self) -> Vec<(String, Outcome)> {
        self.lock()
            .iter()
            .filter_map(|slot| {
                slot.outcome
                    .as_ref()
                    .map(|outcome| (slot.name.clone(), outcome.clone()))
            })
            .collect()
    }

    /// Launch-ordered report entries, one per slot.
    ///
    /// A slot left empty means a guard terminated without recording; it is
    /// filed as `Failed` so the report still accounts for every launched
    /// operation.
    pub(crate) fn report_entries(&self) -> Vec<ReportEntry> {
        self.lock()
            .iter()
            .map(|slot| {
                let outcome = slot.outcome.clone().unwrap_or_else(|| {
                    error!(operation = %slot.name, "no outcome recorded; reporting as failed");
                    Outcome::Failed {
                        error: "outcome never recorded".into(),
                    }
                });
                ReportEntry {
                    name: slot.name.clone(),
                    outcome,
                }
            })
            .collect()
    }

    // A poisoned lock still holds valid slots; recover rather than propagate.
    fn lock(&self) -> MutexGuard<'_, Vec<Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
