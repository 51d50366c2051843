//! Worker counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Monotonic counters updated by the queue, the pool and the scanner.
#[derive(Debug, Default)]
pub struct WorkerStats {
    enqueued: AtomicU64,
    dropped: AtomicU64,
    duplicates: AtomicU64,
    completed_fast_path: AtomicU64,
    completed_by_scanner: AtomicU64,
    skipped: AtomicU64,
    errors: AtomicU64,
}

/// Point-in-time copy of [`WorkerStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkerStatsSnapshot {
    pub enqueued: u64,
    pub dropped: u64,
    pub duplicates: u64,
    pub completed_fast_path: u64,
    pub completed_by_scanner: u64,
    pub skipped: u64,
    pub errors: u64,
}

impl WorkerStats {
    pub(crate) fn record_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_duplicate(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_completed_fast_path(&self) {
        self.completed_fast_path.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_completed_by_scanner(&self) {
        self.completed_by_scanner.fetch_add(1, Ordering::Relaxed);
    }

    /// Task was gone or already completed when the worker looked.
    pub(crate) fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy all counters.
    pub fn snapshot(&self) -> WorkerStatsSnapshot {
        WorkerStatsSnapshot {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            completed_fast_path: self.completed_fast_path.load(Ordering::Relaxed),
            completed_by_scanner: self.completed_by_scanner.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}
