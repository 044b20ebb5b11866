// src/domain/relation.rs

use serde::{Deserialize, Serialize};

use super::{Cid, Rid, Tid};

/// A directed dependency edge from `tid` (predecessor) to `next_tid`
/// (successor) within one container's DAG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relation {
    pub rid: Rid,
    pub cid: Cid,
    pub tid: Tid,
    pub next_tid: Tid,
    pub update_at: i64,
}

impl Relation {
    pub fn new(rid: Rid, cid: Cid, tid: Tid, next_tid: Tid) -> Self {
        Self {
            rid,
            cid,
            tid,
            next_tid,
            update_at: 0,
        }
    }
}
