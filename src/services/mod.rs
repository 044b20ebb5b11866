// src/services/mod.rs

//! Services façade (C6): the write paths a caller embeds against directly,
//! layered over the repositories plus C2/C4/C5. These are the only places
//! that enforce cross-entity invariants — cycle rejection on edge insertion,
//! cascading deletes, and cron rescheduling — rather than leaving callers to
//! remember to do it themselves.

pub mod container_service;
pub mod relation_service;
pub mod task_service;
pub mod tasklog_service;

pub use container_service::ContainerService;
pub use relation_service::RelationService;
pub use task_service::TaskService;
pub use tasklog_service::TaskLogService;
