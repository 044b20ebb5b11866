// src/domain/container.rs

use serde::{Deserialize, Serialize};

use super::{Cid, ContainerStatus};

/// A named cron job: the root of one task DAG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    pub cid: Cid,
    pub name: String,
    /// Cron spec; `@every 1s`, `0 * * * *`, etc. See [`crate::cron::expression`].
    pub expression: String,
    pub status: ContainerStatus,
    /// Skip scheduling entirely when true.
    pub disable: bool,
    /// When true, a new trigger is skipped while a previous run is active.
    pub blocking: bool,
    /// Opaque handle returned by the cron driver; `-1` when not scheduled.
    pub entry_id: i64,
    pub update_at: i64,
}

impl Container {
    pub fn new(cid: Cid, name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            cid,
            name: name.into(),
            expression: expression.into(),
            status: ContainerStatus::Pending,
            disable: false,
            blocking: false,
            entry_id: -1,
            update_at: 0,
        }
    }

    /// `entry_id > 0` iff the container is currently registered with the cron.
    pub fn is_scheduled(&self) -> bool {
        self.entry_id > 0
    }
}
