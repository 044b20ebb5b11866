use std::sync::Arc;

use chronodag::domain::{Cid, Container, Task, Tid};
use chronodag::executor::Executor;
use chronodag::hub::EventHub;
use chronodag::repository::memory::{
    InMemoryContainerRepository, InMemoryRelationRepository, InMemoryTaskLogRepository,
    InMemoryTaskRepository,
};
use chronodag::repository::{ContainerRepository, TaskRepository};

pub struct Harness {
    pub containers: Arc<InMemoryContainerRepository>,
    pub tasks: Arc<InMemoryTaskRepository>,
    pub relations: Arc<InMemoryRelationRepository>,
    pub logs: Arc<InMemoryTaskLogRepository>,
    pub hub: Arc<EventHub>,
    pub executor: Arc<Executor>,
}

impl Harness {
    pub fn new() -> Self {
        chronodag_test_utils::init_tracing();

        let containers = Arc::new(InMemoryContainerRepository::new());
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let relations = Arc::new(InMemoryRelationRepository::new());
        let logs = Arc::new(InMemoryTaskLogRepository::new());
        let hub = Arc::new(EventHub::default());

        let executor = Arc::new(Executor::new(
            containers.clone(),
            tasks.clone(),
            relations.clone(),
            logs.clone(),
            hub.clone(),
        ));

        Self {
            containers,
            tasks,
            relations,
            logs,
            hub,
            executor,
        }
    }

    pub async fn put_container(&self, container: Container) {
        self.containers.save(container).await.unwrap();
    }

    pub async fn put_task(&self, task: Task) {
        self.tasks.save(task).await.unwrap();
    }

    pub async fn task_status(&self, tid: Tid) -> chronodag::domain::TaskStatus {
        self.tasks.get(tid).await.unwrap().status
    }

    pub async fn container_status(&self, cid: Cid) -> chronodag::domain::ContainerStatus {
        self.containers.get(cid).await.unwrap().status
    }
}
