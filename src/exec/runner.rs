// src/exec/runner.rs

//! Spawns a single task's shell command and drives it to completion.
//!
//! Grounded on the teacher's `exec::task_runner::run_task_inner`: a `sh -c`
//! child process with piped stdout/stderr, `kill_on_drop(true)`, and a
//! `tokio::select!` race between the process exiting and an external signal.
//! Generalized here to race three branches instead of two (exit, timeout,
//! cancel) and to resolve the outcome by explicit priority afterward, rather
//! than trusting `select!` branch order, since two signals can both be
//! ready in the same poll.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;

use crate::domain::{Task, TaskLog, TaskStatus};
use crate::errors::{Error, Result};
use crate::hub::EventHub;
use crate::repository::{TaskLogRepository, TaskRepository};

use super::registry::RunRegistry;

/// Stdout/stderr readers accumulate at most this many bytes into the
/// persisted `TaskLog`; beyond that, lines are still streamed to the hub but
/// dropped from the stored log so a chatty task can't exhaust memory.
const MAX_LOG_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    Failure(i32),
    Timeout,
    Cancelled,
}

impl RunOutcome {
    pub fn status(&self) -> TaskStatus {
        match self {
            RunOutcome::Success => TaskStatus::Success,
            RunOutcome::Failure(_) => TaskStatus::Failure,
            RunOutcome::Timeout => TaskStatus::Failure,
            RunOutcome::Cancelled => TaskStatus::Cancelled,
        }
    }
}

pub struct RunTaskArgs {
    pub task: Task,
    pub run_id: String,
    pub hub: Arc<EventHub>,
    pub task_repo: Arc<dyn TaskRepository>,
    pub log_repo: Arc<dyn TaskLogRepository>,
    pub registry: Arc<RunRegistry>,
}

/// Run one task process end to end: spawn, stream output, resolve an
/// outcome, persist the `TaskLog`, and emit `task_start`/`task_end` events.
///
/// Returns the resolved outcome. Spawn failures (command not found, etc.)
/// resolve as `RunOutcome::Failure(-1)` rather than propagating a `Result`
/// error, since a task that fails to start is a normal scheduling outcome,
/// not a caller-facing bug — callers that need the underlying error can read
/// the emitted `Meta` event's message.
pub async fn run_task(args: RunTaskArgs) -> Result<RunOutcome> {
    let RunTaskArgs {
        task,
        run_id,
        hub,
        task_repo,
        log_repo,
        registry,
    } = args;

    let started_at = std::time::Instant::now();

    // §4.3 step 2 (validate) must complete before step 3 (emit task_start):
    // an empty command never produces a task_start event.
    let tokens = task.tokenize_command();
    let Some((program, rest)) = tokens.split_first() else {
        let outcome = RunOutcome::Failure(-1);
        finish(&hub, &task_repo, &log_repo, &task, &run_id, outcome, started_at, String::new(), "empty command".to_string()).await?;
        return Ok(outcome);
    };

    let mut cancel_rx = registry.register(task.cid, task.tid, run_id.clone()).await;

    hub.publish(crate::domain::StreamEvent::task_start(
        run_id.clone(),
        task.cid,
        task.tid,
        task.name.clone(),
    ));

    let mut cmd = Command::new(program);
    cmd.args(rest).stdout(Stdio::piped()).stderr(Stdio::piped()).kill_on_drop(true);
    if !task.directory.is_empty() {
        cmd.current_dir(&task.directory);
    }

    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            registry.unregister(task.cid, task.tid).await;
            let outcome = RunOutcome::Failure(-1);
            finish(&hub, &task_repo, &log_repo, &task, &run_id, outcome, started_at, String::new(), format!("spawn error: {e}")).await?;
            return Ok(outcome);
        }
    };

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let out_handle: JoinHandle<String> = spawn_line_reader(
        stdout,
        hub.clone(),
        run_id.clone(),
        task.cid,
        task.tid,
        task.name.clone(),
        crate::domain::EventKind::Stdout,
    );
    let err_handle: JoinHandle<String> = spawn_line_reader(
        stderr,
        hub.clone(),
        run_id.clone(),
        task.cid,
        task.tid,
        task.name.clone(),
        crate::domain::EventKind::Stderr,
    );

    let timeout_fut = async {
        if task.timeout > 0 {
            tokio::time::sleep(Duration::from_secs(task.timeout)).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    enum Race {
        Exited(std::io::Result<std::process::ExitStatus>),
        TimedOut,
        Cancelled,
    }

    let race = tokio::select! {
        status = child.wait() => Race::Exited(status),
        _ = timeout_fut => Race::TimedOut,
        _ = &mut cancel_rx => Race::Cancelled,
    };

    // Outcome priority: Cancelled > Timeout > runtime error > Success.
    // `select!` only tells us which branch happened to win the poll, not
    // which signals were actually pending, so after it returns we re-check
    // `cancel_rx` explicitly: a cancel can be pending at the same time the
    // timeout fires or the child happens to exit, and it must still win.
    let outcome = match race {
        Race::Cancelled => {
            let _ = child.kill().await;
            RunOutcome::Cancelled
        }
        Race::TimedOut => {
            let _ = child.kill().await;
            if cancel_rx.try_recv().is_ok() {
                RunOutcome::Cancelled
            } else {
                RunOutcome::Timeout
            }
        }
        Race::Exited(result) => {
            if cancel_rx.try_recv().is_ok() {
                let _ = child.kill().await;
                RunOutcome::Cancelled
            } else {
                match result {
                    Ok(status) if status.success() => RunOutcome::Success,
                    Ok(status) => RunOutcome::Failure(status.code().unwrap_or(-1)),
                    Err(_) => RunOutcome::Failure(-1),
                }
            }
        }
    };

    let std_out = out_handle.await.unwrap_or_default();
    let std_err = err_handle.await.unwrap_or_default();

    registry.unregister(task.cid, task.tid).await;

    let meta = match outcome {
        RunOutcome::Success => String::new(),
        RunOutcome::Failure(code) => format!("exited with code {code}"),
        RunOutcome::Timeout => format!("task {} timeout", task.name),
        RunOutcome::Cancelled => "cancelled".to_string(),
    };

    finish(
        &hub,
        &task_repo,
        &log_repo,
        &task,
        &run_id,
        outcome,
        started_at,
        std_out,
        std_err_or_meta(std_err, meta),
    )
    .await?;

    Ok(outcome)
}

fn std_err_or_meta(std_err: String, meta: String) -> String {
    if meta.is_empty() {
        std_err
    } else if std_err.is_empty() {
        meta
    } else {
        format!("{std_err}\n[{meta}]")
    }
}

async fn finish(
    hub: &EventHub,
    task_repo: &Arc<dyn TaskRepository>,
    log_repo: &Arc<dyn TaskLogRepository>,
    task: &Task,
    run_id: &str,
    outcome: RunOutcome,
    started_at: std::time::Instant,
    std_out: String,
    std_err: String,
) -> Result<()> {
    let duration_ms = started_at.elapsed().as_millis() as u64;
    let status = outcome.status();

    if task.log_enable {
        let mut log = TaskLog::new(TaskLog::new_lid(), task.tid, task.cid, std_out, std_err);
        log.update_at = now_millis();
        log_repo
            .save(log)
            .await
            .map_err(|e| Error::database(format!("persisting task log: {e}")))?;
    }

    let mut updated = task.clone();
    updated.status = status;
    updated.update_at = now_millis();
    task_repo
        .save(updated)
        .await
        .map_err(|e| Error::database(format!("persisting task status: {e}")))?;

    hub.publish(crate::domain::StreamEvent::task_end(
        run_id.to_string(),
        task.cid,
        task.tid,
        task.name.clone(),
        status,
        duration_ms,
        match outcome {
            RunOutcome::Success => String::new(),
            RunOutcome::Failure(code) => format!("exited with code {code}"),
            RunOutcome::Timeout => format!("task {} timeout", task.name),
            RunOutcome::Cancelled => "cancelled".to_string(),
        },
    ));

    Ok(())
}

fn spawn_line_reader<R>(
    pipe: Option<R>,
    hub: Arc<EventHub>,
    run_id: String,
    cid: crate::domain::Cid,
    tid: crate::domain::Tid,
    task_name: String,
    kind: crate::domain::EventKind,
) -> JoinHandle<String>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let Some(pipe) = pipe else {
            return String::new();
        };
        let mut reader = BufReader::with_capacity(MAX_LOG_BYTES, pipe).lines();
        let mut accumulated = String::new();
        loop {
            let line = match reader.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    // §4.3 step 5: a scan error (e.g. invalid UTF-8, a pipe
                    // I/O error) doesn't end the capture, it's reported and
                    // the reader keeps going.
                    hub.publish(crate::domain::StreamEvent::meta(format!(
                        "{task_name}: error reading {} output: {e}",
                        kind_label(kind)
                    )));
                    continue;
                }
            };

            let event = match kind {
                crate::domain::EventKind::Stderr => crate::domain::StreamEvent::stderr_line(
                    run_id.clone(),
                    cid,
                    tid,
                    task_name.clone(),
                    line.clone(),
                ),
                _ => crate::domain::StreamEvent::stdout_line(
                    run_id.clone(),
                    cid,
                    tid,
                    task_name.clone(),
                    line.clone(),
                ),
            };
            hub.publish(event);

            if accumulated.len() < MAX_LOG_BYTES {
                if !accumulated.is_empty() {
                    accumulated.push('\n');
                }
                accumulated.push_str(&line);
            }
        }
        accumulated
    })
}

fn kind_label(kind: crate::domain::EventKind) -> &'static str {
    match kind {
        crate::domain::EventKind::Stderr => "stderr",
        _ => "stdout",
    }
}

fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
