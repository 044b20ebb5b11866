// src/services/container_service.rs

//! Container lifecycle: create/update/delete plus the cascading delete and
//! cron-rescheduling invariants that span the container, task, relation and
//! cron-scheduler boundaries.

use std::sync::Arc;

use crate::cron::CronScheduler;
use crate::domain::{Cid, Container, TaskStatus};
use crate::errors::Result;
use crate::repository::{ContainerRepository, Query, RelationRepository, TaskRepository};

pub struct ContainerService {
    containers: Arc<dyn ContainerRepository>,
    tasks: Arc<dyn TaskRepository>,
    relations: Arc<dyn RelationRepository>,
    cron: Arc<CronScheduler>,
}

impl ContainerService {
    pub fn new(
        containers: Arc<dyn ContainerRepository>,
        tasks: Arc<dyn TaskRepository>,
        relations: Arc<dyn RelationRepository>,
        cron: Arc<CronScheduler>,
    ) -> Self {
        Self {
            containers,
            tasks,
            relations,
            cron,
        }
    }

    pub async fn get(&self, cid: Cid) -> Result<Container> {
        self.containers.get(cid).await
    }

    pub async fn list(&self, query: &Query) -> Result<Vec<Container>> {
        self.containers.list(query).await
    }

    /// Persist `container` and reschedule its cron job so the schedule
    /// (and enabled/disabled state) agree with what's saved — saving a
    /// container with a stale `entry_id` from before an expression edit
    /// would otherwise leave the old schedule running alongside the new one.
    pub async fn save(&self, container: Container) -> Result<Container> {
        let cid = container.cid;
        let disable = container.disable;
        let saved = self.containers.save(container).await?;

        if disable {
            self.cron.remove_job_by_cid(cid).await;
        } else {
            self.cron.reschedule(cid).await?;
        }

        Ok(saved)
    }

    /// Delete a container and cascade: unschedule its cron job, delete its
    /// tasks, and delete every relation tagged with this `cid` directly
    /// (not just those touching the deleted tasks, in case a relation row
    /// ever outlives its task through a repository bug).
    pub async fn delete(&self, cid: Cid) -> Result<()> {
        self.cron.remove_job_by_cid(cid).await;

        let tasks = self.tasks.get_by_cid(cid).await?;
        for task in &tasks {
            self.relations.delete_by_tid(task.tid).await?;
            self.relations.delete_by_next_tid(task.tid).await?;
        }

        self.tasks.delete_by_cid(cid).await?;
        self.containers.delete(cid).await
    }

    /// Tally task statuses across the whole container set: `(pending,
    /// running, success, failure)`.
    pub async fn counters(&self) -> Result<Counters> {
        let containers = self.containers.find_all().await?;
        let mut counters = Counters::default();
        for container in containers {
            let tasks = self.tasks.get_by_cid(container.cid).await?;
            for task in tasks {
                match task.status {
                    TaskStatus::Pending => counters.pending += 1,
                    TaskStatus::Running => counters.running += 1,
                    TaskStatus::Success => counters.success += 1,
                    TaskStatus::Failure => counters.failure += 1,
                    TaskStatus::Cancelled => counters.cancelled += 1,
                }
            }
        }
        Ok(counters)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub pending: u64,
    pub running: u64,
    pub success: u64,
    pub failure: u64,
    pub cancelled: u64,
}
