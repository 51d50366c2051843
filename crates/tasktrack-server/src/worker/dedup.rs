//! In-flight task tracking.
//!
//! A task id is present in the tracker exactly while some [`Claim`] for it is
//! alive. Dropping the claim removes the id, so every exit path of a worker
//! iteration releases what it inserted.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tasktrack_core::TaskId;

/// Concurrent set of task ids currently owned by an auto-completion attempt.
#[derive(Debug, Clone, Default)]
pub struct DedupTracker {
    in_flight: Arc<Mutex<HashSet<TaskId>>>,
}

impl DedupTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically insert `task_id` if absent.
    ///
    /// Returns `None` when another claim for the same id is alive.
    pub fn try_claim(&self, task_id: &TaskId) -> Option<Claim> {
        if !self.lock().insert(task_id.clone()) {
            return None;
        }
        Some(Claim {
            tracker: self.clone(),
            task_id: task_id.clone(),
        })
    }

    /// Check whether `task_id` is currently claimed.
    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.lock().contains(task_id)
    }

    /// Number of claimed task ids.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing is claimed.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // The set stays consistent even if a holder panicked, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, HashSet<TaskId>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Ownership of one task id in a [`DedupTracker`]. Released on drop.
#[derive(Debug)]
pub struct Claim {
    tracker: DedupTracker,
    task_id: TaskId,
}

impl Claim {
    /// The claimed task id.
    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }
}

impl Drop for Claim {
    fn drop(&mut self) {
        self.tracker.lock().remove(&self.task_id);
    }
}
