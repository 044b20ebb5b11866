// src/domain/event.rs

use serde::{Deserialize, Serialize};

use super::{Cid, TaskStatus, Tid};

/// The kind of a [`StreamEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    TaskStart,
    TaskEnd,
    Stdout,
    Stderr,
    Meta,
}

/// An ephemeral, structured execution event, broadcast live by the
/// [`crate::hub::EventHub`] and never persisted (see `SPEC_FULL.md` non-goals:
/// "no persistent event replay").
///
/// Field presence mirrors §3/§6 of the spec: `status` is only meaningful on
/// `task_end`, and `run_id`/`tid`/`cid`/`task_name` are `None` only for
/// hub-internal `meta` events that are not task-scoped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamEvent {
    /// Monotonic per-hub id, assigned by the hub if left `0`.
    pub id: u64,
    /// Wall-clock millis, assigned by the hub if left `0`.
    pub ts: i64,
    pub kind: EventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tid: Option<Tid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cid: Option<Cid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub msg: String,
}

impl StreamEvent {
    /// Build a bare event of the given kind; `id`/`ts` are left `0` for the
    /// hub to assign on publish.
    pub fn new(kind: EventKind) -> Self {
        Self {
            id: 0,
            ts: 0,
            kind,
            run_id: None,
            tid: None,
            cid: None,
            task_name: None,
            status: None,
            duration_ms: None,
            msg: String::new(),
        }
    }

    pub fn task_start(run_id: impl Into<String>, cid: Cid, tid: Tid, task_name: impl Into<String>) -> Self {
        Self {
            run_id: Some(run_id.into()),
            cid: Some(cid),
            tid: Some(tid),
            task_name: Some(task_name.into()),
            ..Self::new(EventKind::TaskStart)
        }
    }

    pub fn task_end(
        run_id: impl Into<String>,
        cid: Cid,
        tid: Tid,
        task_name: impl Into<String>,
        status: TaskStatus,
        duration_ms: u64,
        msg: impl Into<String>,
    ) -> Self {
        Self {
            run_id: Some(run_id.into()),
            cid: Some(cid),
            tid: Some(tid),
            task_name: Some(task_name.into()),
            status: Some(status),
            duration_ms: Some(duration_ms),
            msg: msg.into(),
            ..Self::new(EventKind::TaskEnd)
        }
    }

    pub fn stdout_line(run_id: impl Into<String>, cid: Cid, tid: Tid, task_name: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            run_id: Some(run_id.into()),
            cid: Some(cid),
            tid: Some(tid),
            task_name: Some(task_name.into()),
            msg: line.into(),
            ..Self::new(EventKind::Stdout)
        }
    }

    pub fn stderr_line(run_id: impl Into<String>, cid: Cid, tid: Tid, task_name: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            run_id: Some(run_id.into()),
            cid: Some(cid),
            tid: Some(tid),
            task_name: Some(task_name.into()),
            msg: line.into(),
            ..Self::new(EventKind::Stderr)
        }
    }

    pub fn meta(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            ..Self::new(EventKind::Meta)
        }
    }
}
