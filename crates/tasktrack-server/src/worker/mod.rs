//! Auto-completion worker.
//!
//! Tasks that stay open for longer than the grace period are moved to
//! `completed`. Two paths feed the same conditional write:
//!
//! - the fast path: task ids submitted through [`WorkerService::enqueue`] are
//!   picked up by a fixed pool of consumers, each of which waits out the grace
//!   period before re-reading the task
//! - the scanner: a periodic sweep over the store that catches anything the
//!   fast path dropped or lost
//!
//! A [`DedupTracker`] keeps at most one attempt in flight per task.

mod completer;
mod dedup;
mod pool;
mod queue;
mod scanner;
mod stats;

#[cfg(test)]
mod testing;

pub use dedup::{Claim, DedupTracker};
pub use queue::{CompletionQueue, EnqueueOutcome, QueueReceiver};
pub use stats::{WorkerStats, WorkerStatsSnapshot};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use tasktrack_core::TaskId;

use crate::store::StatusStore;
use completer::Completer;

/// Default delay between a task entering the system and its auto-completion.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5 * 60);

/// Default period of the reconciliation scanner.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(60);

/// Default queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Default number of pool consumers.
pub const DEFAULT_POOL_SIZE: usize = 5;

/// Worker tuning.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub grace_period: Duration,
    pub scan_interval: Duration,
    pub queue_capacity: usize,
    pub pool_size: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            grace_period: DEFAULT_GRACE_PERIOD,
            scan_interval: DEFAULT_SCAN_INTERVAL,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

/// Entry point to the auto-completion worker. Cheap to clone.
#[derive(Clone)]
pub struct WorkerService {
    inner: Arc<Inner>,
}

struct Inner {
    config: WorkerConfig,
    queue: CompletionQueue,
    completer: Arc<Completer>,
    started: AtomicBool,
}

impl WorkerService {
    /// Create a stopped worker over `store`.
    pub fn new(store: Arc<dyn StatusStore>, config: WorkerConfig) -> Self {
        let queue = CompletionQueue::new(config.queue_capacity);
        let completer = Arc::new(Completer {
            store,
            tracker: DedupTracker::new(),
            stats: Arc::new(WorkerStats::default()),
            grace_period: config.grace_period,
        });

        Self {
            inner: Arc::new(Inner {
                config,
                queue,
                completer,
                started: AtomicBool::new(false),
            }),
        }
    }

    /// Spawn the consumer pool and the scanner. Everything stops when
    /// `cancel` fires; await [`WorkerHandle::join`] to wait for that.
    ///
    /// Only the first call spawns anything.
    pub fn start(&self, cancel: CancellationToken) -> WorkerHandle {
        let tasks = TaskTracker::new();

        if self.inner.started.swap(true, Ordering::SeqCst) {
            warn!("Auto-complete worker already started");
            return WorkerHandle { tasks };
        }

        let config = &self.inner.config;
        let pool_size = config.pool_size.max(1);

        for worker_id in 0..pool_size {
            tasks.spawn(pool::run_consumer(
                worker_id,
                self.inner.queue.receiver(),
                self.inner.completer.clone(),
                cancel.clone(),
            ));
        }

        tasks.spawn(scanner::run_scanner(
            self.inner.completer.clone(),
            config.scan_interval,
            cancel,
        ));

        info!(
            pool_size,
            queue_capacity = self.inner.queue.capacity(),
            grace_secs = config.grace_period.as_secs(),
            scan_interval_secs = config.scan_interval.as_secs(),
            max_latency_secs = (config.grace_period + config.scan_interval).as_secs(),
            "Auto-complete worker started"
        );

        WorkerHandle { tasks }
    }

    /// Schedule `task_id` for delayed completion. Never blocks: when the
    /// queue is full the id is dropped and the scanner picks the task up
    /// later.
    pub fn enqueue(&self, task_id: TaskId) -> EnqueueOutcome {
        let outcome = self.inner.queue.submit(task_id.clone());
        let stats = &self.inner.completer.stats;

        match outcome {
            EnqueueOutcome::Accepted => {
                debug!(task_id = %task_id, "Task queued for auto-completion");
                stats.record_enqueued();
            }
            EnqueueOutcome::Dropped => {
                warn!(task_id = %task_id, "Auto-complete queue full, dropping task");
                stats.record_dropped();
            }
            EnqueueOutcome::Closed => {
                warn!(task_id = %task_id, "Auto-complete queue closed, dropping task");
                stats.record_dropped();
            }
        }

        outcome
    }

    pub fn stats(&self) -> WorkerStatsSnapshot {
        self.inner.completer.stats.snapshot()
    }

    /// Task ids with an attempt in flight.
    pub fn tracker(&self) -> &DedupTracker {
        &self.inner.completer.tracker
    }

    /// Ids waiting in the queue.
    pub fn queue_len(&self) -> usize {
        self.inner.queue.len()
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.inner.config
    }

    pub fn is_started(&self) -> bool {
        self.inner.started.load(Ordering::SeqCst)
    }
}

/// Handle to the spawned worker tasks.
pub struct WorkerHandle {
    tasks: TaskTracker,
}

impl WorkerHandle {
    /// Number of worker tasks still running.
    pub fn running(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for every worker task to exit. Only returns after the
    /// cancellation token passed to [`WorkerService::start`] has fired.
    pub async fn join(self) {
        self.tasks.close();
        self.tasks.wait().await;
    }
}
