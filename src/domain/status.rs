// src/domain/status.rs

//! Status enums for containers and tasks.
//!
//! Per the design note in `SPEC_FULL.md` §9, external encoders must map
//! through these enums explicitly rather than serializing the status codes
//! from §6 (`1=Pending, 2=Running, ...`) as raw integers.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    Pending,
    Running,
    Success,
    Failure,
}

impl ContainerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerStatus::Pending => "pending",
            ContainerStatus::Running => "running",
            ContainerStatus::Success => "success",
            ContainerStatus::Failure => "failure",
        }
    }

    /// The ordinal status code from §6, for legacy external encoders only.
    pub fn code(&self) -> u8 {
        match self {
            ContainerStatus::Pending => 1,
            ContainerStatus::Running => 2,
            ContainerStatus::Success => 3,
            ContainerStatus::Failure => 4,
        }
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Success,
    Failure,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Success => "success",
            TaskStatus::Failure => "failure",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    /// The ordinal status code from §6, for legacy external encoders only.
    pub fn code(&self) -> u8 {
        match self {
            TaskStatus::Pending => 1,
            TaskStatus::Running => 2,
            TaskStatus::Success => 3,
            TaskStatus::Failure => 4,
            TaskStatus::Cancelled => 5,
        }
    }

    /// Whether a dependent may treat this status as "predecessor satisfied".
    pub fn satisfies_dependency(&self) -> bool {
        matches!(self, TaskStatus::Success)
    }

    /// Whether this status blocks a dependent from ever running this run
    /// (it must fall back to `Pending` per the dependency gate in §4.4).
    pub fn blocks_dependent(&self) -> bool {
        matches!(
            self,
            TaskStatus::Failure | TaskStatus::Cancelled | TaskStatus::Pending
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
