mod common;

use std::time::Duration;

use chronodag::domain::{Cid, Container, EventKind, Task, TaskStatus, Tid};
use common::Harness;

/// Scenario 4 / invariant 6: cancelling a run before its only task
/// completes must leave that task `Cancelled`, never `Success`, and the
/// hub must carry a `task_end` event with `status = Cancelled`.
#[tokio::test]
async fn cancel_run_stops_an_in_flight_task() {
    let h = Harness::new();
    let cid = Cid(1);

    h.put_container(Container::new(cid, "sleeper", "@every 1h")).await;
    h.put_task(Task::new(Tid(1), cid, "sleep", "sleep 60")).await;

    let mut rx = h.hub.subscribe();

    let executor = h.executor.clone();
    let run_handle = tokio::spawn(async move { executor.run_container(cid).await });

    // Wait for task_start so we know the child has actually been spawned,
    // and so we can recover the run_id cancel_run needs to target.
    let start = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let event = rx.recv().await.unwrap();
            if event.kind == EventKind::TaskStart {
                return event;
            }
        }
    })
    .await
    .expect("task_start not observed in time");
    assert_eq!(start.tid, Some(Tid(1)));
    let run_id = start.run_id.clone().expect("task_start carries a run_id");

    tokio::time::sleep(Duration::from_millis(200)).await;

    h.executor.cancel_run(cid, run_id).await;

    let end = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let event = rx.recv().await.unwrap();
            if event.kind == EventKind::TaskEnd {
                return event;
            }
        }
    })
    .await
    .expect("task_end not observed within 2s of cancellation");

    assert_eq!(end.status, Some(TaskStatus::Cancelled));
    assert_eq!(h.task_status(Tid(1)).await, TaskStatus::Cancelled);

    tokio::time::timeout(Duration::from_secs(2), run_handle)
        .await
        .expect("run_container did not finish after cancellation")
        .unwrap()
        .unwrap();
}

/// `cancel_task` targets one running task without touching the rest of a
/// run; a task that isn't running is a no-op, never a panic.
#[tokio::test]
async fn cancel_task_is_a_noop_when_nothing_is_running() {
    let h = Harness::new();
    let cid = Cid(2);
    let cancelled = h.executor.cancel_task(cid, Tid(999)).await;
    assert!(!cancelled);
}

/// A task with a 1s timeout running a 10s sleep must be killed within 2s
/// of the deadline, end `Failure`, and carry "timeout" in its message
/// (§8 boundary test; §9 "Timeout + cancel race" design note).
#[tokio::test]
async fn timeout_kills_the_child_and_reports_failure() {
    let h = Harness::new();
    let cid = Cid(3);

    h.put_container(Container::new(cid, "timeout-demo", "@every 1h")).await;
    let mut task = Task::new(Tid(1), cid, "slow", "sleep 10");
    task.timeout = 1;
    h.put_task(task).await;

    let mut rx = h.hub.subscribe();
    let started = std::time::Instant::now();

    h.executor.run_container(cid).await.unwrap();

    let mut end_event = None;
    while let Ok(Some(event)) =
        tokio::time::timeout(Duration::from_secs(3), rx.recv()).await
    {
        if event.kind == EventKind::TaskEnd {
            end_event = Some(event);
            break;
        }
    }
    let end_event = end_event.expect("task_end not observed");

    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(end_event.status, Some(TaskStatus::Failure));
    assert!(
        end_event.msg.contains("timeout"),
        "msg should mention timeout, got: {:?}",
        end_event.msg
    );
    assert_eq!(h.task_status(Tid(1)).await, TaskStatus::Failure);
}
