// src/domain/task.rs

use serde::{Deserialize, Serialize};

use super::{Cid, TaskStatus, Tid};

/// One shell command belonging to a container's DAG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub tid: Tid,
    pub cid: Cid,
    /// Whitespace-tokenized argv; see [`Task::tokenize_command`].
    pub command: String,
    pub name: String,
    /// Working directory; empty means inherit the scheduler's own cwd.
    pub directory: String,
    pub disable: bool,
    pub status: TaskStatus,
    /// Seconds; `0` means no timeout.
    pub timeout: u64,
    /// Persist stdout/stderr as a `TaskLog` on completion.
    pub log_enable: bool,
    /// UI coordinates, opaque to the core.
    pub point_x: f64,
    pub point_y: f64,
    pub update_at: i64,
}

impl Task {
    pub fn new(tid: Tid, cid: Cid, name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            tid,
            cid,
            command: command.into(),
            name: name.into(),
            directory: String::new(),
            disable: false,
            status: TaskStatus::Pending,
            timeout: 0,
            log_enable: false,
            point_x: 0.0,
            point_y: 0.0,
            update_at: 0,
        }
    }

    /// Whitespace-tokenize `command` into an argv.
    ///
    /// Deliberately brittle: no shell interpretation, no quoting, no globs.
    /// See the "Duplicate tokenization" design note in `SPEC_FULL.md` §9 —
    /// this crate keeps the spec's exact brittle behaviour rather than
    /// silently upgrading to a POSIX-ish tokenizer.
    pub fn tokenize_command(&self) -> Vec<&str> {
        self.command.split_whitespace().collect()
    }
}
