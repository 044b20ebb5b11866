// src/repository/memory.rs

//! In-memory reference implementations of the repository traits.
//!
//! These exist so the crate is runnable and testable standalone (the demo
//! binary, integration tests, and the `chronodag-test-utils` builders all use
//! them). They are deliberately simple `Mutex`-guarded `HashMap`s, the same
//! shape as the teacher's `MockFileSystem` (`src/fs/mock.rs`).

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{Cid, Container, Relation, Rid, Task, TaskLog, Tid};
use crate::errors::{Error, Result};

use super::{ContainerRepository, Query, RelationRepository, TaskLogRepository, TaskRepository};

#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    rows: Mutex<HashMap<i64, Task>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn get(&self, tid: Tid) -> Result<Task> {
        self.rows
            .lock()
            .unwrap()
            .get(&tid.0)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("task {tid}")))
    }

    async fn list(&self, query: &Query) -> Result<Vec<Task>> {
        let rows = self.rows.lock().unwrap();
        let mut matched: Vec<Task> = rows
            .values()
            .filter(|t| query.cid.is_none_or(|cid| t.cid == cid))
            .filter(|t| query.name.as_deref().is_none_or(|n| t.name == n))
            .cloned()
            .collect();
        matched.sort_by_key(|t| t.tid.0);
        Ok(query.paginate(&matched).to_vec())
    }

    async fn get_by_cid(&self, cid: Cid) -> Result<Vec<Task>> {
        let mut rows: Vec<Task> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.cid == cid)
            .cloned()
            .collect();
        rows.sort_by_key(|t| t.tid.0);
        Ok(rows)
    }

    async fn save(&self, task: Task) -> Result<Task> {
        let mut rows = self.rows.lock().unwrap();
        rows.insert(task.tid.0, task.clone());
        Ok(task)
    }

    async fn delete(&self, tid: Tid) -> Result<()> {
        self.rows.lock().unwrap().remove(&tid.0);
        Ok(())
    }

    async fn delete_by_cid(&self, cid: Cid) -> Result<()> {
        self.rows.lock().unwrap().retain(|_, t| t.cid != cid);
        Ok(())
    }

    async fn update_coordinates(&self, tid: Tid, x: f64, y: f64) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(task) = rows.get_mut(&tid.0) {
            task.point_x = x;
            task.point_y = y;
        }
        // Missing tasks are silently skipped, per §4.6.
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryContainerRepository {
    rows: Mutex<HashMap<i64, Container>>,
}

impl InMemoryContainerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContainerRepository for InMemoryContainerRepository {
    async fn get(&self, cid: Cid) -> Result<Container> {
        self.rows
            .lock()
            .unwrap()
            .get(&cid.0)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("container {cid}")))
    }

    async fn list(&self, query: &Query) -> Result<Vec<Container>> {
        let rows = self.rows.lock().unwrap();
        let mut matched: Vec<Container> = rows
            .values()
            .filter(|c| query.name.as_deref().is_none_or(|n| c.name == n))
            .cloned()
            .collect();
        matched.sort_by_key(|c| c.cid.0);
        Ok(query.paginate(&matched).to_vec())
    }

    async fn find_all(&self) -> Result<Vec<Container>> {
        let mut rows: Vec<Container> = self.rows.lock().unwrap().values().cloned().collect();
        rows.sort_by_key(|c| c.cid.0);
        Ok(rows)
    }

    async fn save(&self, container: Container) -> Result<Container> {
        let mut rows = self.rows.lock().unwrap();
        rows.insert(container.cid.0, container.clone());
        Ok(container)
    }

    async fn delete(&self, cid: Cid) -> Result<()> {
        self.rows.lock().unwrap().remove(&cid.0);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRelationRepository {
    rows: Mutex<HashMap<i64, Relation>>,
}

impl InMemoryRelationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RelationRepository for InMemoryRelationRepository {
    async fn get_by_cid(&self, cid: Cid) -> Result<Vec<Relation>> {
        let mut rows: Vec<Relation> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.cid == cid)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.rid.0);
        Ok(rows)
    }

    async fn save(&self, relation: Relation) -> Result<Relation> {
        let mut rows = self.rows.lock().unwrap();
        rows.insert(relation.rid.0, relation.clone());
        Ok(relation)
    }

    async fn delete(&self, rid: Rid) -> Result<()> {
        self.rows.lock().unwrap().remove(&rid.0);
        Ok(())
    }

    async fn delete_by_tid(&self, tid: Tid) -> Result<()> {
        self.rows.lock().unwrap().retain(|_, r| r.tid != tid);
        Ok(())
    }

    async fn delete_by_next_tid(&self, tid: Tid) -> Result<()> {
        self.rows.lock().unwrap().retain(|_, r| r.next_tid != tid);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryTaskLogRepository {
    rows: Mutex<HashMap<String, TaskLog>>,
}

impl InMemoryTaskLogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskLogRepository for InMemoryTaskLogRepository {
    async fn list(&self, query: &Query) -> Result<Vec<TaskLog>> {
        let rows = self.rows.lock().unwrap();
        let mut matched: Vec<TaskLog> = rows
            .values()
            .filter(|l| query.cid.is_none_or(|cid| l.cid == cid))
            .filter(|l| query.tid.is_none_or(|tid| l.tid == tid))
            .filter(|l| query.left_ts.is_none_or(|ts| l.update_at >= ts))
            .filter(|l| query.right_ts.is_none_or(|ts| l.update_at <= ts))
            .cloned()
            .collect();
        matched.sort_by_key(|l| l.update_at);
        Ok(query.paginate(&matched).to_vec())
    }

    async fn save(&self, log: TaskLog) -> Result<TaskLog> {
        let mut rows = self.rows.lock().unwrap();
        rows.insert(log.lid.clone(), log.clone());
        Ok(log)
    }

    async fn delete_by_time_range(&self, query: &Query) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        rows.retain(|_, l| {
            let after_left = query.left_ts.is_none_or(|ts| l.update_at >= ts);
            let before_right = query.right_ts.is_none_or(|ts| l.update_at <= ts);
            !(after_left && before_right)
        });
        Ok(())
    }
}
