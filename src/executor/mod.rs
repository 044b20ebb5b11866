// src/executor/mod.rs

//! DAG Executor (C4): runs a full container, stage by stage, via the
//! process runner (C3).
//!
//! Grounded on the teacher's `engine::runtime::Runtime` / `engine::core`
//! split (an async IO shell driving a scheduler's semantics) and on
//! `exec::executor_loop`'s `HashMap`-of-active-work discipline, generalized
//! from "one queued task name at a time" to "one container run at a time,
//! with per-task cancellation nested inside it".

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::dag::TaskGraph;
use crate::domain::{Cid, ContainerStatus, Tid};
use crate::errors::{Error, Result};
use crate::exec::{self, RunOutcome, RunRegistry, RunTaskArgs};
use crate::hub::EventHub;
use crate::repository::{ContainerRepository, RelationRepository, TaskLogRepository, TaskRepository};

/// How long a `cancel_run` entry lingers before being purged (§5).
const CANCEL_TTL: Duration = Duration::from_secs(10 * 60);

/// Coordinates container runs: admission control, stage ordering,
/// dependency gating and cancellation.
pub struct Executor {
    containers: Arc<dyn ContainerRepository>,
    tasks: Arc<dyn TaskRepository>,
    relations: Arc<dyn RelationRepository>,
    logs: Arc<dyn TaskLogRepository>,
    hub: Arc<EventHub>,
    registry: Arc<RunRegistry>,
    running_containers: RwLock<HashMap<i64, String>>,
    cancelled_runs: Arc<RwLock<HashSet<String>>>,
}

impl Executor {
    pub fn new(
        containers: Arc<dyn ContainerRepository>,
        tasks: Arc<dyn TaskRepository>,
        relations: Arc<dyn RelationRepository>,
        logs: Arc<dyn TaskLogRepository>,
        hub: Arc<EventHub>,
    ) -> Self {
        Self {
            containers,
            tasks,
            relations,
            logs,
            hub,
            registry: Arc::new(RunRegistry::new()),
            running_containers: RwLock::new(HashMap::new()),
            cancelled_runs: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Run a container's whole DAG once. Returns the generated `run_id`.
    ///
    /// If `container.blocking` is set and a previous run of this container
    /// is still in flight, this is a no-op that returns the in-flight
    /// `run_id` (§4.4 step 1).
    pub async fn run_container(&self, cid: Cid) -> Result<String> {
        let mut container = self.containers.get(cid).await?;

        if container.blocking {
            if let Some(existing) = self.running_containers.read().await.get(&cid.0).cloned() {
                info!(cid = cid.0, run_id = %existing, "blocking container already running; skipping trigger");
                return Ok(existing);
            }
        }

        let run_id = new_run_id();
        self.running_containers
            .write()
            .await
            .insert(cid.0, run_id.clone());

        container.status = ContainerStatus::Running;
        container.update_at = now_millis();
        self.containers.save(container.clone()).await?;

        let result = self.run_container_inner(cid, &run_id).await;

        self.running_containers.write().await.remove(&cid.0);
        container.status = ContainerStatus::Pending;
        container.update_at = now_millis();
        let _ = self.containers.save(container).await;

        result?;
        Ok(run_id)
    }

    async fn run_container_inner(&self, cid: Cid, run_id: &str) -> Result<()> {
        let tasks = self.tasks.get_by_cid(cid).await?;
        let relations = self.relations.get_by_cid(cid).await?;

        // Reset every task's status before the first stage so a prior run's
        // terminal states don't leak into this one (§4.4 step 5).
        for task in &tasks {
            let mut t = task.clone();
            t.status = crate::domain::TaskStatus::Pending;
            self.tasks.save(t).await?;
        }

        let ids: Vec<Tid> = tasks.iter().map(|t| t.tid).collect();
        let graph = TaskGraph::build(&ids, &relations);

        let stages = match graph.stages() {
            Ok(s) => s,
            Err(e) => {
                self.hub.publish(crate::domain::StreamEvent::meta(format!(
                    "container {}: {e}",
                    cid
                )));
                warn!(cid = cid.0, "cycle detected; terminating run");
                return Err(e);
            }
        };

        for stage in stages {
            if self.cancelled_runs.read().await.contains(run_id) {
                debug!(cid = cid.0, run_id, "run cancelled; stopping before next stage");
                break;
            }
            for tid in stage {
                self.run_task_by_id(cid, tid, run_id).await?;
            }
        }

        Ok(())
    }

    /// Execute a single task with dependency gating (§4.4).
    pub async fn run_task_by_id(&self, cid: Cid, tid: Tid, run_id: &str) -> Result<()> {
        if self.cancelled_runs.read().await.contains(run_id) {
            return Ok(());
        }

        let task = self.tasks.get(tid).await?;
        let relations = self.relations.get_by_cid(cid).await?;
        let predecessors = relations.iter().filter(|r| r.next_tid == tid).map(|r| r.tid);

        for pred in predecessors {
            let pred_task = self.tasks.get(pred).await?;
            if !pred_task.status.satisfies_dependency() {
                let mut blocked = task.clone();
                blocked.status = crate::domain::TaskStatus::Pending;
                blocked.update_at = now_millis();
                self.tasks.save(blocked).await?;
                return Ok(());
            }
        }

        if task.disable {
            debug!(tid = tid.0, "task disabled; leaving Pending");
            return Ok(());
        }

        exec::run_task(RunTaskArgs {
            task,
            run_id: run_id.to_string(),
            hub: self.hub.clone(),
            task_repo: self.tasks.clone(),
            log_repo: self.logs.clone(),
            registry: self.registry.clone(),
        })
        .await
        .map(|_| ())
    }

    /// Run a single task directly, outside of any container stage loop
    /// (e.g. a manual external trigger). Still honours the dependency gate.
    pub async fn run_task_standalone(&self, cid: Cid, tid: Tid) -> Result<RunOutcome> {
        let run_id = new_run_id();
        self.run_task_by_id(cid, tid, &run_id).await?;
        let task = self.tasks.get(tid).await?;
        Ok(match task.status {
            crate::domain::TaskStatus::Success => RunOutcome::Success,
            crate::domain::TaskStatus::Cancelled => RunOutcome::Cancelled,
            crate::domain::TaskStatus::Failure => RunOutcome::Failure(-1),
            _ => RunOutcome::Failure(-1),
        })
    }

    /// Best-effort cancel of one running task instance.
    pub async fn cancel_task(&self, cid: Cid, tid: Tid) -> bool {
        self.registry.cancel_task(cid, tid).await
    }

    /// Mark `run_id` cancelled and signal every currently-running task
    /// tagged with it. The entry is purged after a 10-minute TTL.
    pub async fn cancel_run(&self, cid: Cid, run_id: impl Into<String>) {
        let run_id = run_id.into();
        self.cancelled_runs.write().await.insert(run_id.clone());
        self.registry.cancel_run(cid, &run_id).await;

        let cancelled = Arc::clone(&self.cancelled_runs);
        let purge_id = run_id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(CANCEL_TTL).await;
            cancelled.write().await.remove(&purge_id);
        });
    }
}

fn new_run_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
