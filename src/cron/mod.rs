// src/cron/mod.rs

//! Cron Scheduler (C5): fires [`Executor::run_container`] on a schedule.
//!
//! Grounded on the teacher's `engine::runtime::Runtime` event-loop shape —
//! one long-lived background task per active job instead of a single
//! monolithic ticker — generalized from "watch a filesystem path" to "wait
//! out a cron/duration schedule, then trigger a run".
//!
//! Each scheduled container gets its own `tokio::task` sleeping until its
//! next fire time, then triggering the executor and rescheduling itself.
//! The closure captures only the container's `cid`, never the `Container`
//! value itself, so every fire reloads the container (and its tasks and
//! relations) fresh from the repository — a stale in-memory snapshot taken
//! at `add_job` time would silently diverge from edits made via the
//! services façade after scheduling.

pub mod expression;

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::Cid;
use crate::errors::{Error, Result};
use crate::executor::Executor;
use crate::repository::ContainerRepository;

use expression::Expression;

struct Job {
    entry_id: i64,
    handle: JoinHandle<()>,
}

/// Drives container triggers off cron/`@every` schedules.
pub struct CronScheduler {
    containers: Arc<dyn ContainerRepository>,
    executor: Arc<Executor>,
    jobs: Mutex<HashMap<i64, Job>>,
    next_entry_id: AtomicI64,
}

impl CronScheduler {
    pub fn new(containers: Arc<dyn ContainerRepository>, executor: Arc<Executor>) -> Self {
        Self {
            containers,
            executor,
            jobs: Mutex::new(HashMap::new()),
            next_entry_id: AtomicI64::new(1),
        }
    }

    /// Load every container, reset its scheduling state, and register a job
    /// for each one that isn't disabled (§4.5 step 1).
    pub async fn start(&self) -> Result<()> {
        let containers = self.containers.find_all().await?;
        for mut container in containers {
            container.entry_id = -1;
            let cid = container.cid;
            let disabled = container.disable;
            self.containers.save(container).await?;
            if !disabled {
                self.add_job(cid).await?;
            }
        }
        info!("cron scheduler started");
        Ok(())
    }

    /// Register (or re-register) a cron job for `cid`, storing the returned
    /// `entry_id` on the container. Invalid expressions surface as
    /// [`Error::Scheduler`] and leave the container unscheduled.
    pub async fn add_job(&self, cid: Cid) -> Result<i64> {
        let container = self.containers.get(cid).await?;
        if container.disable {
            return Err(Error::scheduler(format!(
                "container {cid} is disabled; refusing to schedule"
            )));
        }

        let expr = Expression::parse(&container.expression)?;
        let entry_id = self.next_entry_id.fetch_add(1, Ordering::SeqCst);

        let executor = self.executor.clone();
        let containers = self.containers.clone();
        let handle = tokio::spawn(run_job_loop(cid, expr, executor, containers));

        let mut jobs = self.jobs.lock().await;
        if let Some(old) = jobs.remove(&cid.0) {
            old.handle.abort();
        }
        jobs.insert(cid.0, Job { entry_id, handle });
        drop(jobs);

        let mut container = container;
        container.entry_id = entry_id;
        self.containers.save(container).await?;

        debug!(cid = cid.0, entry_id, "container scheduled");
        Ok(entry_id)
    }

    /// Remove the job backing `entry_id`, if any is currently registered.
    /// A no-op for `entry_id <= 0` (the "not scheduled" sentinel).
    pub async fn remove_job(&self, entry_id: i64) {
        if entry_id <= 0 {
            return;
        }
        let mut jobs = self.jobs.lock().await;
        let cid = jobs
            .iter()
            .find(|(_, job)| job.entry_id == entry_id)
            .map(|(cid, _)| *cid);
        if let Some(cid) = cid {
            if let Some(job) = jobs.remove(&cid) {
                job.handle.abort();
            }
        }
    }

    /// Remove `cid`'s job by container id directly (used by the services
    /// façade on container deletion, where the caller already has `cid`
    /// rather than the opaque `entry_id`).
    pub async fn remove_job_by_cid(&self, cid: Cid) {
        let mut jobs = self.jobs.lock().await;
        if let Some(job) = jobs.remove(&cid.0) {
            job.handle.abort();
        }
    }

    /// Reschedule `cid` from its current `expression` — removes the old job
    /// first so a container never ends up with two live jobs (§4.5's
    /// rescheduling invariant). Called by the services façade on every
    /// container save that changes the expression or re-enables a job.
    pub async fn reschedule(&self, cid: Cid) -> Result<i64> {
        self.remove_job_by_cid(cid).await;
        self.add_job(cid).await
    }

    /// Abort every registered job. In-flight container runs are left to
    /// finish; only future triggers are suppressed.
    pub async fn stop(&self) {
        let mut jobs = self.jobs.lock().await;
        for (_, job) in jobs.drain() {
            job.handle.abort();
        }
        info!("cron scheduler stopped");
    }
}

async fn run_job_loop(
    cid: Cid,
    expr: Expression,
    executor: Arc<Executor>,
    containers: Arc<dyn ContainerRepository>,
) {
    loop {
        let now = Utc::now();
        let Some(delay) = expr.next_delay(now) else {
            warn!(cid = cid.0, "cron expression has no further fire times; stopping job");
            return;
        };
        tokio::time::sleep(delay).await;

        match containers.get(cid).await {
            Ok(container) if container.disable => {
                debug!(cid = cid.0, "container disabled; skipping trigger");
                continue;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(cid = cid.0, error = %e, "container vanished; stopping job");
                return;
            }
        }

        if let Err(e) = executor.run_container(cid).await {
            warn!(cid = cid.0, error = %e, "triggered run failed");
        }
    }
}
