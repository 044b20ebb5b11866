// src/services/task_service.rs

//! Task CRUD plus the cascading delete and coordinate-batch-update paths.

use std::sync::Arc;

use crate::domain::{Cid, Task, Tid};
use crate::errors::Result;
use crate::repository::{Query, RelationRepository, TaskRepository};

pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
    relations: Arc<dyn RelationRepository>,
}

/// One entry of a batch coordinate update: `(tid, x, y)`.
pub type CoordinateUpdate = (Tid, f64, f64);

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskRepository>, relations: Arc<dyn RelationRepository>) -> Self {
        Self { tasks, relations }
    }

    pub async fn get(&self, tid: Tid) -> Result<Task> {
        self.tasks.get(tid).await
    }

    pub async fn list(&self, query: &Query) -> Result<Vec<Task>> {
        self.tasks.list(query).await
    }

    pub async fn get_by_cid(&self, cid: Cid) -> Result<Vec<Task>> {
        self.tasks.get_by_cid(cid).await
    }

    pub async fn save(&self, task: Task) -> Result<Task> {
        self.tasks.save(task).await
    }

    /// Delete a task and every relation that references it, either as
    /// predecessor or successor.
    pub async fn delete(&self, tid: Tid) -> Result<()> {
        self.relations.delete_by_tid(tid).await?;
        self.relations.delete_by_next_tid(tid).await?;
        self.tasks.delete(tid).await
    }

    /// Apply a batch of UI coordinate updates, silently skipping any `tid`
    /// that no longer exists (the caller's UI state may be stale by the
    /// time the batch lands).
    pub async fn update_coordinates(&self, updates: &[CoordinateUpdate]) -> Result<()> {
        for &(tid, x, y) in updates {
            if self.tasks.update_coordinates(tid, x, y).await.is_err() {
                continue;
            }
        }
        Ok(())
    }
}
