// src/main.rs

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use chronodag::cli::{CliArgs, Command};
use chronodag::cron::CronScheduler;
use chronodag::domain::{Cid, Container, EventKind, Relation, Rid, Task, Tid};
use chronodag::executor::Executor;
use chronodag::hub::EventHub;
use chronodag::logging;
use chronodag::repository::memory::{
    InMemoryContainerRepository, InMemoryRelationRepository, InMemoryTaskLogRepository,
    InMemoryTaskRepository,
};
use chronodag::services::ContainerService;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    logging::init_logging(args.log_level)?;

    let containers = Arc::new(InMemoryContainerRepository::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let relations = Arc::new(InMemoryRelationRepository::new());
    let logs = Arc::new(InMemoryTaskLogRepository::new());
    let hub = Arc::new(EventHub::default());

    let cid = seed_demo_dag(&containers, &tasks, &relations).await?;

    let executor = Arc::new(Executor::new(
        containers.clone(),
        tasks.clone(),
        relations.clone(),
        logs.clone(),
        hub.clone(),
    ));
    let cron = Arc::new(CronScheduler::new(containers.clone(), executor.clone()));
    let container_service =
        ContainerService::new(containers.clone(), tasks.clone(), relations.clone(), cron.clone());

    spawn_event_printer(hub.clone());

    match args.command {
        Command::RunOnce => {
            let run_id = executor.run_container(cid).await?;
            info!(run_id, "demo container run finished");
        }
        Command::Serve => {
            cron.start().await?;
            info!("serving; press Ctrl-C to stop");
            tokio::signal::ctrl_c().await?;
            cron.stop().await;
            let counters = container_service.counters().await?;
            info!(?counters, "final task status tally");
        }
    }

    Ok(())
}

/// Populate the in-memory repositories with a three-task linear DAG:
/// `echo-start -> echo-middle -> echo-end`, scheduled to fire every minute.
async fn seed_demo_dag(
    containers: &Arc<InMemoryContainerRepository>,
    tasks: &Arc<InMemoryTaskRepository>,
    relations: &Arc<InMemoryRelationRepository>,
) -> Result<Cid> {
    use chronodag::repository::{ContainerRepository, RelationRepository, TaskRepository};

    let cid = Cid(1);
    let container = Container::new(cid, "demo", "@every 1m");
    containers.save(container).await?;

    let t1 = Task::new(Tid(1), cid, "echo-start", "echo start");
    let t2 = Task::new(Tid(2), cid, "echo-middle", "echo middle");
    let t3 = Task::new(Tid(3), cid, "echo-end", "echo end");
    tasks.save(t1).await?;
    tasks.save(t2).await?;
    tasks.save(t3).await?;

    relations
        .save(Relation::new(Rid(1), cid, Tid(1), Tid(2)))
        .await?;
    relations
        .save(Relation::new(Rid(2), cid, Tid(2), Tid(3)))
        .await?;

    Ok(cid)
}

/// Drain the hub's events to stdout so the demo is observable without a
/// transport layer.
fn spawn_event_printer(hub: Arc<EventHub>) {
    let mut rx = hub.subscribe();
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event.kind {
                EventKind::TaskStart => println!("[start] task {:?}", event.task_name),
                EventKind::TaskEnd => println!(
                    "[end]   task {:?} status={:?} ({}ms) {}",
                    event.task_name,
                    event.status,
                    event.duration_ms.unwrap_or(0),
                    event.msg
                ),
                EventKind::Stdout => println!("[out]   {}", event.msg),
                EventKind::Stderr => println!("[err]   {}", event.msg),
                EventKind::Meta => println!("[meta]  {}", event.msg),
            }
        }
    });
}
