// src/exec/registry.rs

//! Shared table of in-flight task processes.
//!
//! Generalizes the teacher's `executor_loop::ActiveTask` map (keyed by task
//! name, one entry per task since the teacher never runs two instances of
//! the same task concurrently) to a `(Cid, Tid)` key, since here the executor
//! may have many containers running their own independent instance of the
//! same task definition at once.

use std::collections::HashMap;

use tokio::sync::{oneshot, RwLock};

use crate::domain::{Cid, Tid};

/// A cancellation handle for one running task instance.
struct ActiveTask {
    run_id: String,
    cancel: Option<oneshot::Sender<()>>,
}

/// Registry of currently-running `(cid, tid)` task instances.
#[derive(Debug, Default)]
pub struct RunRegistry {
    active: RwLock<HashMap<(i64, i64), ActiveTaskDebug>>,
}

// `oneshot::Sender` doesn't implement `Debug`; wrap it so the registry can
// still derive `Debug` for logging without leaking the inner channel.
struct ActiveTaskDebug(ActiveTask);

impl std::fmt::Debug for ActiveTaskDebug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveTask")
            .field("run_id", &self.0.run_id)
            .finish_non_exhaustive()
    }
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly-spawned task instance, returning the receiving half
    /// of its cancellation channel. The caller is responsible for calling
    /// [`RunRegistry::unregister`] once the instance finishes, in every exit
    /// path (success, failure, timeout, or cancellation) — mirrored by
    /// `run_task`'s use of a scope guard around the process lifetime.
    pub async fn register(&self, cid: Cid, tid: Tid, run_id: String) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        self.active.write().await.insert(
            (cid.0, tid.0),
            ActiveTaskDebug(ActiveTask {
                run_id,
                cancel: Some(tx),
            }),
        );
        rx
    }

    /// Request cancellation of a specific running task. Returns `true` if a
    /// live instance was found and signalled.
    pub async fn cancel_task(&self, cid: Cid, tid: Tid) -> bool {
        let mut active = self.active.write().await;
        if let Some(entry) = active.get_mut(&(cid.0, tid.0)) {
            if let Some(tx) = entry.0.cancel.take() {
                let _ = tx.send(());
                return true;
            }
        }
        false
    }

    /// Request cancellation of every task instance belonging to `run_id`
    /// within container `cid`.
    pub async fn cancel_run(&self, cid: Cid, run_id: &str) -> usize {
        let mut active = self.active.write().await;
        let mut cancelled = 0;
        for (key, entry) in active.iter_mut() {
            if key.0 == cid.0 && entry.0.run_id == run_id {
                if let Some(tx) = entry.0.cancel.take() {
                    let _ = tx.send(());
                    cancelled += 1;
                }
            }
        }
        cancelled
    }

    pub async fn is_running(&self, cid: Cid, tid: Tid) -> bool {
        self.active.read().await.contains_key(&(cid.0, tid.0))
    }

    pub async fn unregister(&self, cid: Cid, tid: Tid) {
        self.active.write().await.remove(&(cid.0, tid.0));
    }
}
