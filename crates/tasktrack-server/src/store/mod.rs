//! Storage traits and in-memory implementations.
//!
//! The auto-completion worker only depends on [`StatusStore`]; the request
//! layer uses the full [`TaskStore`].

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use tasktrack_core::{CoreError, Task, TaskId, TaskPatch, TaskStatus, User, UserId};

mod memory;
mod users;

pub use memory::InMemoryTaskStore;
pub use users::InMemoryUserStore;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Record already exists: {0}")]
    Conflict(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// A write was refused by the task rules, checked against the stored record.
    #[error(transparent)]
    Rejected(#[from] CoreError),
}

/// Listing query for tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    /// Restrict to tasks owned by this user. `None` means every owner.
    pub owner: Option<UserId>,
    /// Restrict to one status.
    pub status: Option<TaskStatus>,
    /// Maximum number of tasks returned. `None` means unbounded.
    pub limit: Option<usize>,
    /// Number of tasks skipped after ordering.
    pub offset: usize,
}

/// The read/write contract needed by the auto-completion worker.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Point lookup. `Ok(None)` when the task does not exist.
    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, StoreError>;

    /// Overwrite only the status (and modification time) of a task.
    async fn update_status(&self, id: &TaskId, status: TaskStatus) -> Result<(), StoreError>;

    /// Move a task to `completed` only if it is still non-terminal, checked
    /// atomically with the write. Returns `false` when it was already
    /// completed.
    async fn complete_if_open(&self, id: &TaskId) -> Result<bool, StoreError>;

    /// Tasks in a non-terminal status created more than `age` ago.
    async fn find_non_terminal_older_than(&self, age: Duration) -> Result<Vec<Task>, StoreError>;
}

/// Full task persistence used by the request layer.
#[async_trait]
pub trait TaskStore: StatusStore {
    async fn create(&self, task: Task) -> Result<(), StoreError>;

    /// Tasks matching `query`, newest first.
    async fn list(&self, query: &TaskQuery) -> Result<Vec<Task>, StoreError>;

    /// Apply `patch` to the stored task under the store's write lock and
    /// return the result. Status transitions are checked against the stored
    /// status, not a caller's earlier read.
    async fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<Task, StoreError>;

    async fn delete(&self, id: &TaskId) -> Result<(), StoreError>;
}

/// User persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Fails with [`StoreError::Conflict`] on a duplicate email.
    async fn create(&self, user: User) -> Result<(), StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError>;
}
