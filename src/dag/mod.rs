// src/dag/mod.rs

//! DAG representation, cycle detection and stage computation (C2).
//!
//! A container's tasks and relations form a directed graph: `relation.tid ->
//! relation.next_tid`. [`TaskGraph`] builds that graph for one container and
//! exposes two things the rest of the crate needs:
//!
//! - [`TaskGraph::check_acyclic`], used by `add_relation` to reject edges that
//!   would close a cycle (§4.2 invariant).
//! - [`TaskGraph::stages`], a Kahn's-algorithm level decomposition consumed by
//!   the executor's stage loop (§4.4) to run independent tasks concurrently.
//!
//! Grounded on the teacher's `config::validate::validate_dag`, which builds a
//! `petgraph::graphmap::DiGraphMap` over task names and calls `toposort` to
//! reject cycles; generalized here from "validate once at config load" to "a
//! reusable analyzer invoked both at edge-insertion time and at every run".

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::domain::{Relation, Tid};
use crate::errors::{Error, Result};

/// A container's task dependency graph, built fresh from its current
/// relations for each check or run (the core holds no long-lived graph
/// state; relations are the source of truth).
#[derive(Debug, Default)]
pub struct TaskGraph {
    graph: DiGraphMap<i64, ()>,
}

impl TaskGraph {
    /// Build a graph over `task_ids`, with one edge `tid -> next_tid` per
    /// relation whose endpoints are both known task ids. Isolated tasks (no
    /// edges) are still added as nodes so they appear as their own
    /// single-task stage. Relations referencing an id outside `task_ids`
    /// are dropped rather than pulling in a phantom node — they contribute
    /// nothing to in-degree, per §4.2's edge-case policy.
    pub fn build(task_ids: &[Tid], relations: &[Relation]) -> Self {
        let known: std::collections::HashSet<i64> = task_ids.iter().map(|t| t.0).collect();
        let mut graph = DiGraphMap::new();
        for tid in task_ids {
            graph.add_node(tid.0);
        }
        for rel in relations {
            if known.contains(&rel.tid.0) && known.contains(&rel.next_tid.0) {
                graph.add_edge(rel.tid.0, rel.next_tid.0, ());
            }
        }
        Self { graph }
    }

    /// Reject the graph if it contains a cycle, naming one offending node.
    pub fn check_acyclic(&self) -> Result<()> {
        match toposort(&self.graph, None) {
            Ok(_) => Ok(()),
            Err(cycle) => Err(Error::CircularDependency(format!(
                "task {} participates in a dependency cycle",
                cycle.node_id()
            ))),
        }
    }

    /// Decompose the graph into ordered stages (Kahn's algorithm): stage 0
    /// holds every task with no predecessors, stage 1 holds tasks whose
    /// predecessors are all in stage 0, and so on. Tasks within a stage have
    /// no dependency relationship and may run concurrently.
    ///
    /// Returns `Err(Error::CircularDependency)` if the graph isn't acyclic;
    /// callers that already validated via `check_acyclic` can `.expect()`
    /// in contexts where a cycle would be a logic bug rather than user input.
    pub fn stages(&self) -> Result<Vec<Vec<Tid>>> {
        let mut in_degree: std::collections::HashMap<i64, usize> = self
            .graph
            .nodes()
            .map(|n| (n, 0))
            .collect();
        for (_, target, _) in self.graph.all_edges() {
            *in_degree.entry(target).or_insert(0) += 1;
        }

        let mut remaining = in_degree.clone();
        let mut stages = Vec::new();
        let mut processed = 0usize;
        let total = remaining.len();

        loop {
            let ready: Vec<i64> = remaining
                .iter()
                .filter(|(_, &deg)| deg == 0)
                .map(|(&n, _)| n)
                .collect();

            if ready.is_empty() {
                break;
            }

            for &n in &ready {
                remaining.remove(&n);
            }
            for &n in &ready {
                for (_, target, _) in self.graph.edges(n) {
                    if let Some(deg) = remaining.get_mut(&target) {
                        *deg = deg.saturating_sub(1);
                    }
                }
            }

            processed += ready.len();
            let mut stage: Vec<Tid> = ready.into_iter().map(Tid).collect();
            stage.sort();
            stages.push(stage);
        }

        if processed != total {
            return Err(Error::CircularDependency(
                "dependency cycle prevents full stage ordering".to_string(),
            ));
        }

        Ok(stages)
    }

    /// Direct successors of `tid` (tasks gated on `tid` completing).
    pub fn successors_of(&self, tid: Tid) -> Vec<Tid> {
        self.graph.neighbors(tid.0).map(Tid).collect()
    }

    /// Direct predecessors of `tid` (tasks `tid` depends on).
    pub fn predecessors_of(&self, tid: Tid) -> Vec<Tid> {
        self.graph
            .neighbors_directed(tid.0, petgraph::Direction::Incoming)
            .map(Tid)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(rid: i64, tid: i64, next: i64) -> Relation {
        Relation::new(Rid(rid), Cid(1), Tid(tid), Tid(next))
    }

    use crate::domain::{Cid, Rid};

    #[test]
    fn linear_chain_has_three_stages() {
        let ids = vec![Tid(1), Tid(2), Tid(3)];
        let rels = vec![rel(1, 1, 2), rel(2, 2, 3)];
        let g = TaskGraph::build(&ids, &rels);
        g.check_acyclic().unwrap();
        let stages = g.stages().unwrap();
        assert_eq!(stages, vec![vec![Tid(1)], vec![Tid(2)], vec![Tid(3)]]);
    }

    #[test]
    fn diamond_has_two_middle_tasks_in_same_stage() {
        let ids = vec![Tid(1), Tid(2), Tid(3), Tid(4)];
        let rels = vec![rel(1, 1, 2), rel(2, 1, 3), rel(3, 2, 4), rel(4, 3, 4)];
        let g = TaskGraph::build(&ids, &rels);
        let stages = g.stages().unwrap();
        assert_eq!(stages, vec![vec![Tid(1)], vec![Tid(2), Tid(3)], vec![Tid(4)]]);
    }

    #[test]
    fn cycle_is_rejected() {
        let ids = vec![Tid(1), Tid(2)];
        let rels = vec![rel(1, 1, 2), rel(2, 2, 1)];
        let g = TaskGraph::build(&ids, &rels);
        assert!(g.check_acyclic().is_err());
        assert!(g.stages().is_err());
    }

    #[test]
    fn isolated_task_is_its_own_stage() {
        let ids = vec![Tid(1)];
        let g = TaskGraph::build(&ids, &[]);
        let stages = g.stages().unwrap();
        assert_eq!(stages, vec![vec![Tid(1)]]);
    }
}
