// src/services/relation_service.rs

//! Relation (DAG edge) management. `add_relation` is the only write path
//! that can introduce a new edge, and it is the sole enforcement point for
//! the "no cycles" invariant (§4.2): load the container's current edges,
//! tentatively append the candidate, and run the edge set through
//! [`TaskGraph::check_acyclic`] before persisting anything.

use std::sync::Arc;

use crate::dag::TaskGraph;
use crate::domain::{Cid, Relation, Rid, Tid};
use crate::errors::{Error, Result};
use crate::repository::{RelationRepository, TaskRepository};

pub struct RelationService {
    tasks: Arc<dyn TaskRepository>,
    relations: Arc<dyn RelationRepository>,
}

impl RelationService {
    pub fn new(tasks: Arc<dyn TaskRepository>, relations: Arc<dyn RelationRepository>) -> Self {
        Self { tasks, relations }
    }

    pub async fn get_by_cid(&self, cid: Cid) -> Result<Vec<Relation>> {
        self.relations.get_by_cid(cid).await
    }

    /// Validate and persist a new edge `tid -> next_tid` within `cid`.
    /// Rejects with [`Error::Validation`] if either endpoint isn't a task of
    /// `cid` (§3's referential invariant) or the ordered pair is already
    /// wired (§3's uniqueness invariant), or with
    /// [`Error::CircularDependency`] if adding the edge would close a cycle.
    pub async fn add_relation(&self, rid: Rid, cid: Cid, tid: Tid, next_tid: Tid) -> Result<Relation> {
        let existing_tasks = self.tasks.get_by_cid(cid).await?;
        let existing_relations = self.relations.get_by_cid(cid).await?;

        let ids: Vec<Tid> = existing_tasks.iter().map(|t| t.tid).collect();
        if !ids.contains(&tid) || !ids.contains(&next_tid) {
            return Err(Error::Validation(format!(
                "relation {tid} -> {next_tid} references a task outside container {cid}"
            )));
        }
        if existing_relations
            .iter()
            .any(|r| r.tid == tid && r.next_tid == next_tid)
        {
            return Err(Error::Validation(format!(
                "relation {tid} -> {next_tid} already exists in container {cid}"
            )));
        }

        let candidate = Relation::new(rid, cid, tid, next_tid);
        let mut candidate_set = existing_relations.clone();
        candidate_set.push(candidate.clone());

        let graph = TaskGraph::build(&ids, &candidate_set);
        graph.check_acyclic()?;

        self.relations.save(candidate).await
    }

    pub async fn delete(&self, rid: Rid) -> Result<()> {
        self.relations.delete(rid).await
    }
}
