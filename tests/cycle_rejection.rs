mod common;

use chronodag::domain::{Cid, Container, Relation, Rid, Task, Tid};
use chronodag::errors::Error;
use chronodag::repository::RelationRepository;
use chronodag::services::RelationService;
use common::Harness;

/// Scenario 3 / invariant 1: an edge that would close a cycle is rejected
/// with `CircularDependency` and the relation set is left unchanged.
#[tokio::test]
async fn add_relation_rejects_cycle_and_leaves_edges_unchanged() {
    let h = Harness::new();
    let cid = Cid(1);

    h.put_container(Container::new(cid, "c", "@every 1h")).await;
    h.put_task(Task::new(Tid(1), cid, "t1", "echo a")).await;
    h.put_task(Task::new(Tid(2), cid, "t2", "echo b")).await;
    h.relations
        .save(Relation::new(Rid(1), cid, Tid(1), Tid(2)))
        .await
        .unwrap();

    let service = RelationService::new(h.tasks.clone(), h.relations.clone());

    let err = service
        .add_relation(Rid(2), cid, Tid(2), Tid(1))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CircularDependency(_)));

    let edges = h.relations.get_by_cid(cid).await.unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!((edges[0].tid, edges[0].next_tid), (Tid(1), Tid(2)));
}

#[tokio::test]
async fn add_relation_accepts_a_second_independent_edge() {
    let h = Harness::new();
    let cid = Cid(2);

    h.put_container(Container::new(cid, "c", "@every 1h")).await;
    h.put_task(Task::new(Tid(10), cid, "t1", "echo a")).await;
    h.put_task(Task::new(Tid(11), cid, "t2", "echo b")).await;
    h.put_task(Task::new(Tid(12), cid, "t3", "echo c")).await;

    let service = RelationService::new(h.tasks.clone(), h.relations.clone());
    service.add_relation(Rid(10), cid, Tid(10), Tid(11)).await.unwrap();
    service.add_relation(Rid(11), cid, Tid(10), Tid(12)).await.unwrap();

    let edges = h.relations.get_by_cid(cid).await.unwrap();
    assert_eq!(edges.len(), 2);
}

/// Self-loop is the smallest possible cycle and must also be rejected.
#[tokio::test]
async fn add_relation_rejects_self_loop() {
    let h = Harness::new();
    let cid = Cid(3);

    h.put_container(Container::new(cid, "c", "@every 1h")).await;
    h.put_task(Task::new(Tid(20), cid, "t1", "echo a")).await;

    let service = RelationService::new(h.tasks.clone(), h.relations.clone());
    let err = service
        .add_relation(Rid(20), cid, Tid(20), Tid(20))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CircularDependency(_)));
}

/// §3's referential invariant: a relation naming a task id outside the
/// container is rejected before it ever reaches the cycle check.
#[tokio::test]
async fn add_relation_rejects_unknown_task_id() {
    let h = Harness::new();
    let cid = Cid(4);

    h.put_container(Container::new(cid, "c", "@every 1h")).await;
    h.put_task(Task::new(Tid(30), cid, "t1", "echo a")).await;

    let service = RelationService::new(h.tasks.clone(), h.relations.clone());
    let err = service
        .add_relation(Rid(30), cid, Tid(30), Tid(999))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    assert!(h.relations.get_by_cid(cid).await.unwrap().is_empty());
}

/// §3's uniqueness invariant: at most one edge per ordered `(tid, next_tid)`
/// pair within a container.
#[tokio::test]
async fn add_relation_rejects_duplicate_ordered_pair() {
    let h = Harness::new();
    let cid = Cid(5);

    h.put_container(Container::new(cid, "c", "@every 1h")).await;
    h.put_task(Task::new(Tid(40), cid, "t1", "echo a")).await;
    h.put_task(Task::new(Tid(41), cid, "t2", "echo b")).await;

    let service = RelationService::new(h.tasks.clone(), h.relations.clone());
    service.add_relation(Rid(40), cid, Tid(40), Tid(41)).await.unwrap();

    let err = service
        .add_relation(Rid(41), cid, Tid(40), Tid(41))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(h.relations.get_by_cid(cid).await.unwrap().len(), 1);
}
