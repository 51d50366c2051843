//! State shared by pool consumers and the scanner.

use std::sync::Arc;
use std::time::Duration;

use tasktrack_core::TaskId;

use super::dedup::DedupTracker;
use super::stats::WorkerStats;
use crate::store::{StatusStore, StoreError};

/// Handles passed to every spawned worker loop.
pub(crate) struct Completer {
    pub(crate) store: Arc<dyn StatusStore>,
    pub(crate) tracker: DedupTracker,
    pub(crate) stats: Arc<WorkerStats>,
    pub(crate) grace_period: Duration,
}

/// Result of a conditional write to `completed`.
#[derive(Debug)]
pub(crate) enum WriteResult {
    Written,
    /// Completed by someone else between the read and the write.
    AlreadyCompleted,
    /// The task was deleted between the read and the write.
    Vanished,
    Failed(StoreError),
}

impl Completer {
    /// Write `completed` if the stored task is still non-terminal.
    pub(crate) async fn mark_completed(&self, task_id: &TaskId) -> WriteResult {
        match self.store.complete_if_open(task_id).await {
            Ok(true) => WriteResult::Written,
            Ok(false) => WriteResult::AlreadyCompleted,
            Err(StoreError::NotFound(_)) => WriteResult::Vanished,
            Err(e) => WriteResult::Failed(e),
        }
    }
}
