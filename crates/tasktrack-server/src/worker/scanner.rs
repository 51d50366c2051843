//! Reconciliation scanner.
//!
//! Periodically completes every non-terminal task older than the grace
//! period, whether or not it ever went through the queue. This is what bounds
//! completion latency to `grace_period + scan_interval` when the fast path
//! drops or loses a task.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::completer::{Completer, WriteResult};

/// Counts for one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SweepReport {
    pub(crate) stale: usize,
    pub(crate) completed: usize,
    /// Owned by an in-flight fast-path attempt.
    pub(crate) in_flight: usize,
    pub(crate) failed: usize,
}

/// Sweep every `scan_interval` until `cancel` fires. The first sweep runs one
/// interval after start.
pub(crate) async fn run_scanner(
    completer: Arc<Completer>,
    scan_interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = interval_at(Instant::now() + scan_interval, scan_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    debug!(interval_secs = scan_interval.as_secs(), "Scanner started");

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                completer.sweep().await;
            }
        }
    }

    debug!("Scanner shutting down");
}

impl Completer {
    /// Complete all stale tasks not currently owned by the fast path.
    pub(crate) async fn sweep(&self) -> SweepReport {
        let mut report = SweepReport::default();

        let stale = match self
            .store
            .find_non_terminal_older_than(self.grace_period)
            .await
        {
            Ok(tasks) => tasks,
            Err(e) => {
                error!(error = %e, "Error scanning pending tasks");
                self.stats.record_error();
                return report;
            }
        };
        report.stale = stale.len();

        for task in stale {
            let Some(_claim) = self.tracker.try_claim(&task.id) else {
                debug!(task_id = %task.id, "Task in flight on fast path, leaving it");
                report.in_flight += 1;
                continue;
            };

            match self.mark_completed(&task.id).await {
                WriteResult::Written => {
                    info!(task_id = %task.id, previous = %task.status, "Task auto-completed by scanner");
                    self.stats.record_completed_by_scanner();
                    report.completed += 1;
                }
                WriteResult::AlreadyCompleted => {
                    debug!(task_id = %task.id, "Task completed since the scan, skipping");
                    self.stats.record_skipped();
                }
                WriteResult::Vanished => {
                    debug!(task_id = %task.id, "Task deleted before scanner write");
                    self.stats.record_skipped();
                }
                WriteResult::Failed(e) => {
                    warn!(task_id = %task.id, error = %e, "Error auto-completing task, retrying next sweep");
                    self.stats.record_error();
                    report.failed += 1;
                }
            }
        }

        if report.stale > 0 {
            debug!(
                stale = report.stale,
                completed = report.completed,
                in_flight = report.in_flight,
                failed = report.failed,
                "Scanner sweep finished"
            );
        }

        report
    }
}
