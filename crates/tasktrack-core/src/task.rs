//! Task types.

use crate::{CoreError, TaskId, TaskStatus, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default page size for task listings.
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// A Task owned by a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,

    /// Owner of this task.
    pub user_id: UserId,

    /// Short title.
    pub title: String,

    /// Free-form description.
    pub description: String,

    /// Current task status.
    pub status: TaskStatus,

    /// When the task was created.
    pub created_at: DateTime<Utc>,

    /// When the task was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new pending Task.
    pub fn new(user_id: UserId, title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::generate(),
            user_id,
            title: title.into(),
            description: description.into(),
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder method to set a specific ID (useful for testing).
    pub fn with_id(mut self, id: TaskId) -> Self {
        self.id = id;
        self
    }

    /// Builder method to set the status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder method to backdate creation (useful for testing staleness).
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = created_at;
        self
    }

    /// Check if the task is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Check if `user_id` owns this task.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Apply a partial update, enforcing the status transition rules.
    ///
    /// Nothing is modified when the status transition is rejected.
    pub fn apply(&mut self, patch: TaskPatch) -> Result<(), CoreError> {
        if let Some(next) = patch.status {
            if !self.status.can_transition_to(next) {
                return Err(CoreError::InvalidStateTransition {
                    from: self.status.to_string(),
                    to: next.to_string(),
                });
            }
        }

        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Partial update of a task. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

/// Listing filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFilter {
    /// Only tasks in this status.
    pub status: Option<TaskStatus>,
    /// Page size.
    pub limit: usize,
    /// Number of tasks to skip.
    pub offset: usize,
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self {
            status: None,
            limit: DEFAULT_LIST_LIMIT,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_is_pending() {
        let task = Task::new(UserId::new("u1"), "write report", "");
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.created_at, task.updated_at);
        assert!(task.is_owned_by(&UserId::new("u1")));
        assert!(!task.is_owned_by(&UserId::new("u2")));
    }

    #[test]
    fn test_apply_updates_fields() {
        let mut task = Task::new(UserId::new("u1"), "old", "");
        task.apply(TaskPatch {
            title: Some("new".to_string()),
            description: None,
            status: Some(TaskStatus::InProgress),
        })
        .unwrap();

        assert_eq!(task.title, "new");
        assert_eq!(task.status, TaskStatus::InProgress);
    }

    #[test]
    fn test_apply_rejects_leaving_completed() {
        let mut task = Task::new(UserId::new("u1"), "done", "").with_status(TaskStatus::Completed);
        let err = task
            .apply(TaskPatch {
                title: Some("changed".to_string()),
                description: None,
                status: Some(TaskStatus::Pending),
            })
            .unwrap_err();

        assert!(matches!(err, CoreError::InvalidStateTransition { .. }));
        assert_eq!(task.title, "done");
        assert_eq!(task.status, TaskStatus::Completed);
    }

    #[test]
    fn test_default_filter() {
        let filter = TaskFilter::default();
        assert_eq!(filter.limit, DEFAULT_LIST_LIMIT);
        assert_eq!(filter.offset, 0);
        assert!(filter.status.is_none());
    }
}
