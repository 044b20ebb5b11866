// src/repository/mod.rs

//! Narrow repository traits the core depends on (§6).
//!
//! The persistence *engine* is explicitly out of scope for this crate — a
//! caller backs these traits with whatever relational store it likes. The
//! [`memory`] submodule provides an in-memory reference implementation used
//! by tests, the demo binary, and anyone embedding this crate without a
//! database.

pub mod memory;
pub mod query;

use async_trait::async_trait;

use crate::domain::{Cid, Container, Relation, Rid, Task, TaskLog, Tid};
use crate::errors::Result;

pub use query::Query;

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn get(&self, tid: Tid) -> Result<Task>;
    async fn list(&self, query: &Query) -> Result<Vec<Task>>;
    async fn get_by_cid(&self, cid: Cid) -> Result<Vec<Task>>;
    async fn save(&self, task: Task) -> Result<Task>;
    async fn delete(&self, tid: Tid) -> Result<()>;
    async fn delete_by_cid(&self, cid: Cid) -> Result<()>;
    async fn update_coordinates(&self, tid: Tid, x: f64, y: f64) -> Result<()>;
}

#[async_trait]
pub trait ContainerRepository: Send + Sync {
    async fn get(&self, cid: Cid) -> Result<Container>;
    async fn list(&self, query: &Query) -> Result<Vec<Container>>;
    async fn find_all(&self) -> Result<Vec<Container>>;
    async fn save(&self, container: Container) -> Result<Container>;
    async fn delete(&self, cid: Cid) -> Result<()>;
}

#[async_trait]
pub trait RelationRepository: Send + Sync {
    async fn get_by_cid(&self, cid: Cid) -> Result<Vec<Relation>>;
    async fn save(&self, relation: Relation) -> Result<Relation>;
    async fn delete(&self, rid: Rid) -> Result<()>;
    async fn delete_by_tid(&self, tid: Tid) -> Result<()>;
    async fn delete_by_next_tid(&self, tid: Tid) -> Result<()>;
}

#[async_trait]
pub trait TaskLogRepository: Send + Sync {
    async fn list(&self, query: &Query) -> Result<Vec<TaskLog>>;
    async fn save(&self, log: TaskLog) -> Result<TaskLog>;
    async fn delete_by_time_range(&self, query: &Query) -> Result<()>;
}
