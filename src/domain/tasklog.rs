// src/domain/tasklog.rs

use serde::{Deserialize, Serialize};

use super::{Cid, Tid};

/// Persisted post-execution capture of one task's stdout/stderr.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskLog {
    /// 8 hex characters from a fresh UUID (hyphens stripped).
    pub lid: String,
    pub tid: Tid,
    pub cid: Cid,
    pub std_out: String,
    pub std_err: String,
    pub update_at: i64,
}

impl TaskLog {
    pub fn new(lid: String, tid: Tid, cid: Cid, std_out: String, std_err: String) -> Self {
        Self {
            lid,
            tid,
            cid,
            std_out,
            std_err,
            update_at: 0,
        }
    }

    /// Generate a fresh `lid`: 8 hex characters from a v4 UUID with hyphens
    /// stripped, per `SPEC_FULL.md` §4.3 step 9.
    pub fn new_lid() -> String {
        let raw = uuid::Uuid::new_v4().simple().to_string();
        raw[..8].to_string()
    }
}
