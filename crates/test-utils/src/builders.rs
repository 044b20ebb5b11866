#![allow(dead_code)]

use chronodag::domain::{Cid, Container, Relation, Rid, Task, Tid};

/// Builder for `Container`, defaulting to a disabled, never-firing schedule
/// so tests that only want a container as a DAG root don't accidentally
/// wake the cron scheduler.
pub struct ContainerBuilder {
    container: Container,
}

impl ContainerBuilder {
    pub fn new(cid: i64, name: &str) -> Self {
        Self {
            container: Container::new(Cid(cid), name, "@every 1h"),
        }
    }

    pub fn expression(mut self, expr: &str) -> Self {
        self.container.expression = expr.to_string();
        self
    }

    pub fn blocking(mut self, val: bool) -> Self {
        self.container.blocking = val;
        self
    }

    pub fn disable(mut self, val: bool) -> Self {
        self.container.disable = val;
        self
    }

    pub fn build(self) -> Container {
        self.container
    }
}

/// Builder for `Task`.
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new(tid: i64, cid: i64, name: &str, command: &str) -> Self {
        Self {
            task: Task::new(Tid(tid), Cid(cid), name, command),
        }
    }

    pub fn timeout(mut self, seconds: u64) -> Self {
        self.task.timeout = seconds;
        self
    }

    pub fn log_enable(mut self, val: bool) -> Self {
        self.task.log_enable = val;
        self
    }

    pub fn disable(mut self, val: bool) -> Self {
        self.task.disable = val;
        self
    }

    pub fn directory(mut self, dir: &str) -> Self {
        self.task.directory = dir.to_string();
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}

/// Builder for `Relation` (`tid -> next_tid` within one container).
pub struct RelationBuilder {
    relation: Relation,
}

impl RelationBuilder {
    pub fn new(rid: i64, cid: i64, tid: i64, next_tid: i64) -> Self {
        Self {
            relation: Relation::new(Rid(rid), Cid(cid), Tid(tid), Tid(next_tid)),
        }
    }

    pub fn build(self) -> Relation {
        self.relation
    }
}
