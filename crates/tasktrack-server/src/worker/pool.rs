//! Pool consumers and the delayed-completion protocol.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use tasktrack_core::TaskId;

use super::completer::{Completer, WriteResult};
use super::queue::QueueReceiver;

/// What one delayed-completion attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Attempt {
    /// Another attempt already owned the task.
    Duplicate,
    /// Shutdown arrived during the grace delay.
    Cancelled,
    /// The task no longer exists.
    NotFound,
    /// The task was already completed; nothing written.
    AlreadyCompleted,
    /// The task was moved to `completed`.
    Completed,
    /// The store failed on read or write.
    Failed,
}

/// Consume task ids until `cancel` fires.
pub(crate) async fn run_consumer(
    worker_id: usize,
    rx: QueueReceiver,
    completer: Arc<Completer>,
    cancel: CancellationToken,
) {
    debug!(worker_id, "Auto-complete consumer started");

    loop {
        let task_id = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = rx.recv() => match next {
                Some(task_id) => task_id,
                None => break,
            },
        };

        completer.process(worker_id, task_id, &cancel).await;
    }

    debug!(worker_id, "Auto-complete consumer shutting down");
}

impl Completer {
    /// Wait out the grace period, then complete the task if it is still open.
    pub(crate) async fn process(
        &self,
        worker_id: usize,
        task_id: TaskId,
        cancel: &CancellationToken,
    ) -> Attempt {
        let Some(_claim) = self.tracker.try_claim(&task_id) else {
            debug!(worker_id, task_id = %task_id, "Task already being processed");
            self.stats.record_duplicate();
            return Attempt::Duplicate;
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(worker_id, task_id = %task_id, "Shutdown during grace period");
                return Attempt::Cancelled;
            }
            _ = tokio::time::sleep(self.grace_period) => {}
        }

        let task = match self.store.find_by_id(&task_id).await {
            Ok(Some(task)) => task,
            Ok(None) => {
                info!(worker_id, task_id = %task_id, "Task not found (may have been deleted)");
                self.stats.record_skipped();
                return Attempt::NotFound;
            }
            Err(e) => {
                error!(worker_id, task_id = %task_id, error = %e, "Error fetching task");
                self.stats.record_error();
                return Attempt::Failed;
            }
        };

        if task.is_terminal() {
            debug!(worker_id, task_id = %task_id, "Task already completed, skipping");
            self.stats.record_skipped();
            return Attempt::AlreadyCompleted;
        }

        match self.mark_completed(&task_id).await {
            WriteResult::Written => {
                info!(
                    worker_id,
                    task_id = %task_id,
                    previous = %task.status,
                    "Task auto-completed"
                );
                self.stats.record_completed_fast_path();
                Attempt::Completed
            }
            WriteResult::AlreadyCompleted => {
                debug!(worker_id, task_id = %task_id, "Task completed concurrently, skipping");
                self.stats.record_skipped();
                Attempt::AlreadyCompleted
            }
            WriteResult::Vanished => {
                info!(worker_id, task_id = %task_id, "Task deleted before completion");
                self.stats.record_skipped();
                Attempt::NotFound
            }
            WriteResult::Failed(e) => {
                error!(worker_id, task_id = %task_id, error = %e, "Error auto-completing task");
                self.stats.record_error();
                Attempt::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::store::{StatusStore, TaskStore};
    use crate::worker::testing::{completer, FlakyStore};
    use tasktrack_core::{Task, TaskStatus, UserId};

    const GRACE: Duration = Duration::from_secs(5 * 60);

    #[tokio::test(start_paused = true)]
    async fn test_pending_task_completed_after_grace() {
        let store = Arc::new(FlakyStore::default());
        let task = Task::new(UserId::new("u1"), "t", "");
        let id = task.id.clone();
        store.inner.create(task).await.unwrap();

        let completer = completer(store.clone(), GRACE);
        let started = tokio::time::Instant::now();
        let attempt = completer
            .process(0, id.clone(), &CancellationToken::new())
            .await;

        assert_eq!(attempt, Attempt::Completed);
        assert!(started.elapsed() >= GRACE);
        let stored = store.inner.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.status, TaskStatus::Completed);
        assert!(completer.tracker.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_progress_task_completed() {
        let store = Arc::new(FlakyStore::default());
        let task = Task::new(UserId::new("u1"), "t", "").with_status(TaskStatus::InProgress);
        let id = task.id.clone();
        store.inner.create(task).await.unwrap();

        let completer = completer(store.clone(), GRACE);
        let attempt = completer.process(0, id, &CancellationToken::new()).await;

        assert_eq!(attempt, Attempt::Completed);
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_task_is_not_written() {
        let store = Arc::new(FlakyStore::default());
        let task = Task::new(UserId::new("u1"), "t", "").with_status(TaskStatus::Completed);
        let id = task.id.clone();
        store.inner.create(task).await.unwrap();

        let completer = completer(store.clone(), GRACE);
        let attempt = completer.process(0, id, &CancellationToken::new()).await;

        assert_eq!(attempt, Attempt::AlreadyCompleted);
        assert_eq!(store.writes(), 0);
        assert!(completer.tracker.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_deleted_during_grace_leaves_no_trace() {
        let store = Arc::new(FlakyStore::default());
        let task = Task::new(UserId::new("u1"), "t", "");
        let id = task.id.clone();
        store.inner.create(task).await.unwrap();

        let completer = completer(store.clone(), GRACE);
        let processing = {
            let completer = completer.clone();
            let id = id.clone();
            tokio::spawn(async move { completer.process(0, id, &CancellationToken::new()).await })
        };

        tokio::time::sleep(GRACE / 2).await;
        store.inner.delete(&id).await.unwrap();

        assert_eq!(processing.await.unwrap(), Attempt::NotFound);
        assert_eq!(store.writes(), 0);
        assert_eq!(completer.stats.snapshot().errors, 0);
        assert!(completer.tracker.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_error_releases_claim_without_retry() {
        let store = Arc::new(FlakyStore::default());
        let task = Task::new(UserId::new("u1"), "t", "");
        let id = task.id.clone();
        store.inner.create(task).await.unwrap();
        store.fail_reads(true);

        let completer = completer(store.clone(), GRACE);
        let attempt = completer
            .process(0, id.clone(), &CancellationToken::new())
            .await;

        assert_eq!(attempt, Attempt::Failed);
        assert_eq!(store.reads(), 1);
        assert_eq!(store.writes(), 0);
        assert!(!completer.tracker.contains(&id));
        assert_eq!(completer.stats.snapshot().errors, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_attempts_on_same_task_write_once() {
        let store = Arc::new(FlakyStore::default());
        let task = Task::new(UserId::new("u1"), "t", "");
        let id = task.id.clone();
        store.inner.create(task).await.unwrap();

        let completer = completer(store.clone(), GRACE);
        let cancel = CancellationToken::new();
        let (a, b) = tokio::join!(
            completer.process(0, id.clone(), &cancel),
            completer.process(1, id.clone(), &cancel),
        );

        let mut attempts = [a, b];
        attempts.sort_by_key(|a| *a == Attempt::Completed);
        assert_eq!(attempts, [Attempt::Duplicate, Attempt::Completed]);
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_grace_releases_claim() {
        let store = Arc::new(FlakyStore::default());
        let task = Task::new(UserId::new("u1"), "t", "");
        let id = task.id.clone();
        store.inner.create(task).await.unwrap();

        let completer = completer(store.clone(), GRACE);
        let cancel = CancellationToken::new();
        let processing = {
            let completer = completer.clone();
            let cancel = cancel.clone();
            let id = id.clone();
            tokio::spawn(async move { completer.process(0, id, &cancel).await })
        };

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(completer.tracker.contains(&id));
        cancel.cancel();

        assert_eq!(processing.await.unwrap(), Attempt::Cancelled);
        assert!(completer.tracker.is_empty());
        assert_eq!(store.reads(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_completed_between_read_and_write_is_not_rewritten() {
        let store = Arc::new(FlakyStore::default());
        let task = Task::new(UserId::new("u1"), "t", "");
        let id = task.id.clone();
        store.inner.create(task).await.unwrap();
        store.complete_after_read(true);

        let completer = completer(store.clone(), GRACE);
        let attempt = completer.process(0, id, &CancellationToken::new()).await;

        assert_eq!(attempt, Attempt::AlreadyCompleted);
        assert_eq!(store.writes(), 0);
        assert_eq!(completer.stats.snapshot().skipped, 1);
        assert_eq!(completer.stats.snapshot().completed_fast_path, 0);
    }
}
