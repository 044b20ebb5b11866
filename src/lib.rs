// src/lib.rs

//! Single-node DAG job scheduler core.
//!
//! Containers (cron-scheduled jobs) own a DAG of tasks (shell commands)
//! connected by relations (dependency edges). Six components cover the
//! whole lifecycle:
//!
//! - [`hub`] — C1, the in-process broadcast event hub.
//! - [`dag`] — C2, cycle detection and stage decomposition.
//! - [`exec`] — C3, the single-task process runner.
//! - [`executor`] — C4, the stage-by-stage DAG executor.
//! - [`cron`] — C5, the cron/`@every` scheduler.
//! - [`services`] — C6, the CRUD + invariant-enforcing façade over the rest.
//!
//! Persistence, HTTP/SSE transport, auth and metrics are explicitly out of
//! scope; [`repository`] defines the narrow traits a caller backs with
//! whatever store it likes, with an in-memory reference implementation for
//! tests and the demo binary.

pub mod cli;
pub mod cron;
pub mod dag;
pub mod domain;
pub mod errors;
pub mod exec;
pub mod executor;
pub mod hub;
pub mod logging;
pub mod repository;
pub mod services;
