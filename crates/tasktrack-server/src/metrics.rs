//! Prometheus metrics collection and formatting.
//!
//! Metrics are rendered in Prometheus text exposition format.

use std::fmt::Write;
use std::sync::Arc;

use tracing::warn;

use tasktrack_core::TaskStatus;

use crate::state::AppState;
use crate::store::TaskQuery;

/// Collect all metrics from AppState and format as Prometheus text.
pub async fn collect_metrics(state: &Arc<AppState>) -> String {
    let mut output = String::new();

    collect_task_metrics(state, &mut output).await;
    collect_worker_metrics(state, &mut output);

    writeln!(output, "# HELP tasktrack_sessions_active Number of live sessions").ok();
    writeln!(output, "# TYPE tasktrack_sessions_active gauge").ok();
    writeln!(
        output,
        "tasktrack_sessions_active {}",
        state.auth.session_count().await
    )
    .ok();

    output
}

/// Collect task metrics by status.
async fn collect_task_metrics(state: &Arc<AppState>, output: &mut String) {
    let tasks = match state.tasks.list(&TaskQuery::default()).await {
        Ok(tasks) => tasks,
        Err(e) => {
            warn!(error = %e, "Failed to collect task metrics");
            return;
        }
    };

    writeln!(output, "# HELP tasktrack_tasks_total Number of tasks by status").ok();
    writeln!(output, "# TYPE tasktrack_tasks_total gauge").ok();
    for status in TaskStatus::all() {
        let count = tasks.iter().filter(|t| t.status == status).count();
        writeln!(output, "tasktrack_tasks_total{{status=\"{status}\"}} {count}").ok();
    }
}

/// Collect auto-complete worker counters and gauges.
fn collect_worker_metrics(state: &Arc<AppState>, output: &mut String) {
    let stats = state.worker.stats();

    writeln!(
        output,
        "# HELP tasktrack_autocomplete_enqueued_total Task ids admitted to the auto-complete queue"
    )
    .ok();
    writeln!(output, "# TYPE tasktrack_autocomplete_enqueued_total counter").ok();
    writeln!(output, "tasktrack_autocomplete_enqueued_total {}", stats.enqueued).ok();

    writeln!(
        output,
        "# HELP tasktrack_autocomplete_dropped_total Task ids dropped because the queue was full"
    )
    .ok();
    writeln!(output, "# TYPE tasktrack_autocomplete_dropped_total counter").ok();
    writeln!(output, "tasktrack_autocomplete_dropped_total {}", stats.dropped).ok();

    writeln!(
        output,
        "# HELP tasktrack_autocomplete_completed_total Tasks auto-completed by path"
    )
    .ok();
    writeln!(output, "# TYPE tasktrack_autocomplete_completed_total counter").ok();
    writeln!(
        output,
        "tasktrack_autocomplete_completed_total{{path=\"queue\"}} {}",
        stats.completed_fast_path
    )
    .ok();
    writeln!(
        output,
        "tasktrack_autocomplete_completed_total{{path=\"scanner\"}} {}",
        stats.completed_by_scanner
    )
    .ok();

    writeln!(
        output,
        "# HELP tasktrack_autocomplete_skipped_total Attempts that found the task gone, completed or already in flight"
    )
    .ok();
    writeln!(output, "# TYPE tasktrack_autocomplete_skipped_total counter").ok();
    writeln!(
        output,
        "tasktrack_autocomplete_skipped_total{{reason=\"duplicate\"}} {}",
        stats.duplicates
    )
    .ok();
    writeln!(
        output,
        "tasktrack_autocomplete_skipped_total{{reason=\"stale\"}} {}",
        stats.skipped
    )
    .ok();

    writeln!(
        output,
        "# HELP tasktrack_autocomplete_errors_total Store failures seen by the worker"
    )
    .ok();
    writeln!(output, "# TYPE tasktrack_autocomplete_errors_total counter").ok();
    writeln!(output, "tasktrack_autocomplete_errors_total {}", stats.errors).ok();

    writeln!(
        output,
        "# HELP tasktrack_autocomplete_queue_depth Task ids waiting in the queue"
    )
    .ok();
    writeln!(output, "# TYPE tasktrack_autocomplete_queue_depth gauge").ok();
    writeln!(
        output,
        "tasktrack_autocomplete_queue_depth {}",
        state.worker.queue_len()
    )
    .ok();

    writeln!(
        output,
        "# HELP tasktrack_autocomplete_in_flight Tasks with a completion attempt in progress"
    )
    .ok();
    writeln!(output, "# TYPE tasktrack_autocomplete_in_flight gauge").ok();
    writeln!(
        output,
        "tasktrack_autocomplete_in_flight {}",
        state.worker.tracker().len()
    )
    .ok();
}
