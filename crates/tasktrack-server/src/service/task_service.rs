//! Task CRUD with per-user visibility.

use std::sync::Arc;

use tracing::{debug, info, warn};

use tasktrack_core::{validate, NewTask, Task, TaskFilter, TaskId, TaskPatch};

use super::{ServiceError, Session};
use crate::store::{TaskQuery, TaskStore};
use crate::worker::{EnqueueOutcome, WorkerService};

/// Task operations on behalf of an authenticated [`Session`].
///
/// Regular users only see their own tasks; admins see every task.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    worker: WorkerService,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>, worker: WorkerService) -> Self {
        Self { store, worker }
    }

    /// Create a pending task owned by the caller and schedule its
    /// auto-completion.
    pub async fn create(&self, actor: &Session, input: NewTask) -> Result<Task, ServiceError> {
        validate::title(&input.title)?;

        let task = Task::new(actor.user_id.clone(), input.title, input.description);
        self.store.create(task.clone()).await?;

        info!(task_id = %task.id, user_id = %actor.user_id, "Task created");

        if self.worker.enqueue(task.id.clone()) != EnqueueOutcome::Accepted {
            debug!(task_id = %task.id, "Task left to the auto-complete scanner");
        }

        Ok(task)
    }

    pub async fn get(&self, actor: &Session, id: &TaskId) -> Result<Task, ServiceError> {
        let task = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;

        authorize(actor, &task)?;
        Ok(task)
    }

    /// Newest first, scoped to the caller unless they are an admin.
    pub async fn list(&self, actor: &Session, filter: TaskFilter) -> Result<Vec<Task>, ServiceError> {
        let query = TaskQuery {
            owner: (!actor.is_admin()).then(|| actor.user_id.clone()),
            status: filter.status,
            limit: Some(filter.limit),
            offset: filter.offset,
        };

        Ok(self.store.list(&query).await?)
    }

    /// Apply a partial update. Status changes must follow the task status
    /// machine; a rejected update modifies nothing.
    pub async fn update(
        &self,
        actor: &Session,
        id: &TaskId,
        patch: TaskPatch,
    ) -> Result<Task, ServiceError> {
        if let Some(title) = &patch.title {
            validate::title(title)?;
        }

        let previous = self.get(actor, id).await?.status;
        let task = self.store.update(id, patch).await?;

        if task.status != previous {
            info!(task_id = %id, from = %previous, to = %task.status, "Task status changed");
        } else {
            debug!(task_id = %id, "Task updated");
        }

        Ok(task)
    }

    pub async fn delete(&self, actor: &Session, id: &TaskId) -> Result<(), ServiceError> {
        self.get(actor, id).await?;
        self.store.delete(id).await?;

        info!(task_id = %id, user_id = %actor.user_id, "Task deleted");
        Ok(())
    }
}

fn authorize(actor: &Session, task: &Task) -> Result<(), ServiceError> {
    if actor.is_admin() || task.is_owned_by(&actor.user_id) {
        return Ok(());
    }

    warn!(task_id = %task.id, user_id = %actor.user_id, "Access to foreign task denied");
    Err(ServiceError::Forbidden(task.id.to_string()))
}
