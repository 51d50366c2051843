//! In-memory task store.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use tasktrack_core::{Task, TaskId, TaskPatch, TaskStatus};

use super::{StatusStore, StoreError, TaskQuery, TaskStore};

/// Task store backed by a `HashMap` behind an async `RwLock`.
#[derive(Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<TaskId, Task>>,
}

impl InMemoryTaskStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored tasks.
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    /// Returns true if no tasks are stored.
    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }
}

#[async_trait]
impl StatusStore for InMemoryTaskStore {
    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.read().await.get(id).cloned())
    }

    async fn update_status(&self, id: &TaskId, status: TaskStatus) -> Result<(), StoreError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        task.status = status;
        task.updated_at = Utc::now();
        Ok(())
    }

    async fn complete_if_open(&self, id: &TaskId) -> Result<bool, StoreError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if task.is_terminal() {
            return Ok(false);
        }
        task.status = TaskStatus::Completed;
        task.updated_at = Utc::now();
        Ok(true)
    }

    async fn find_non_terminal_older_than(&self, age: Duration) -> Result<Vec<Task>, StoreError> {
        let age = chrono::Duration::from_std(age)
            .map_err(|e| StoreError::Unavailable(format!("invalid age: {}", e)))?;
        let cutoff = Utc::now() - age;

        let tasks = self.tasks.read().await;
        Ok(tasks
            .values()
            .filter(|t| !t.is_terminal() && t.created_at < cutoff)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, task: Task) -> Result<(), StoreError> {
        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(&task.id) {
            return Err(StoreError::Conflict(task.id.to_string()));
        }
        tasks.insert(task.id.clone(), task);
        Ok(())
    }

    async fn list(&self, query: &TaskQuery) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;

        let mut matching: Vec<&Task> = tasks
            .values()
            .filter(|task| {
                if let Some(owner) = &query.owner {
                    if !task.is_owned_by(owner) {
                        return false;
                    }
                }
                if let Some(status) = query.status {
                    if task.status != status {
                        return false;
                    }
                }
                true
            })
            .collect();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        task.apply(patch)?;
        Ok(task.clone())
    }

    async fn delete(&self, id: &TaskId) -> Result<(), StoreError> {
        self.tasks
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
