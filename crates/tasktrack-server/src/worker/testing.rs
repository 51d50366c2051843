//! Test doubles for worker tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use tasktrack_core::{Task, TaskId, TaskStatus};

use super::completer::Completer;
use super::dedup::DedupTracker;
use super::stats::WorkerStats;
use crate::store::{InMemoryTaskStore, StatusStore, StoreError};

/// In-memory store that counts calls and can be told to fail.
#[derive(Default)]
pub(crate) struct FlakyStore {
    pub(crate) inner: InMemoryTaskStore,
    reads: AtomicUsize,
    writes: AtomicUsize,
    scans: AtomicUsize,
    fail_reads: AtomicBool,
    fail_scans: AtomicBool,
    complete_after_read: AtomicBool,
    complete_after_scan: AtomicBool,
}

impl FlakyStore {
    pub(crate) fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_scans(&self, fail: bool) {
        self.fail_scans.store(fail, Ordering::SeqCst);
    }

    /// Complete each task right after it is read, bypassing the counters.
    pub(crate) fn complete_after_read(&self, on: bool) {
        self.complete_after_read.store(on, Ordering::SeqCst);
    }

    /// Complete every scanned task right after the scan returns.
    pub(crate) fn complete_after_scan(&self, on: bool) {
        self.complete_after_scan.store(on, Ordering::SeqCst);
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Status writes that changed a task.
    pub(crate) fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub(crate) fn scans(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusStore for FlakyStore {
    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected read failure".to_string()));
        }
        let task = self.inner.find_by_id(id).await?;
        if task.is_some() && self.complete_after_read.load(Ordering::SeqCst) {
            self.inner.complete_if_open(id).await?;
        }
        Ok(task)
    }

    async fn update_status(&self, id: &TaskId, status: TaskStatus) -> Result<(), StoreError> {
        self.inner.update_status(id, status).await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn complete_if_open(&self, id: &TaskId) -> Result<bool, StoreError> {
        let written = self.inner.complete_if_open(id).await?;
        if written {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(written)
    }

    async fn find_non_terminal_older_than(&self, age: Duration) -> Result<Vec<Task>, StoreError> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        if self.fail_scans.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected scan failure".to_string()));
        }
        let tasks = self.inner.find_non_terminal_older_than(age).await?;
        if self.complete_after_scan.load(Ordering::SeqCst) {
            for task in &tasks {
                self.inner.complete_if_open(&task.id).await?;
            }
        }
        Ok(tasks)
    }
}

/// Build a completer over `store` with fresh tracker and stats.
pub(crate) fn completer(store: Arc<FlakyStore>, grace_period: Duration) -> Arc<Completer> {
    Arc::new(Completer {
        store,
        tracker: DedupTracker::new(),
        stats: Arc::new(WorkerStats::default()),
        grace_period,
    })
}

/// A pending task created `minutes` ago.
pub(crate) fn stale_task(minutes: i64) -> Task {
    Task::new(tasktrack_core::UserId::new("u1"), "stale", "")
        .with_created_at(chrono::Utc::now() - chrono::Duration::minutes(minutes))
}
