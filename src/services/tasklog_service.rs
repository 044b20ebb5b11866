// src/services/tasklog_service.rs

//! Read/retention access to persisted `TaskLog` rows. Writing a `TaskLog` is
//! the process runner's job (§4.3 step 9); this façade only covers the
//! query and retention paths a caller embeds against.

use std::sync::Arc;

use crate::domain::TaskLog;
use crate::errors::Result;
use crate::repository::{Query, TaskLogRepository};

pub struct TaskLogService {
    logs: Arc<dyn TaskLogRepository>,
}

impl TaskLogService {
    pub fn new(logs: Arc<dyn TaskLogRepository>) -> Self {
        Self { logs }
    }

    pub async fn list(&self, query: &Query) -> Result<Vec<TaskLog>> {
        self.logs.list(query).await
    }

    /// Purge logs whose `update_at` falls within `query`'s `[left_ts,
    /// right_ts]` window, for callers implementing their own retention
    /// policy (the core has no opinion on how long logs should live).
    pub async fn delete_by_time_range(&self, query: &Query) -> Result<()> {
        self.logs.delete_by_time_range(query).await
    }
}
