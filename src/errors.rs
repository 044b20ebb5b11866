// src/errors.rs

//! Crate-wide error taxonomy.
//!
//! Every fallible operation in the core returns [`Error`], which classifies
//! failures into the six kinds an outer API layer is expected to map onto
//! transport-level responses (e.g. `NotFound` -> 404, `Validation` -> 400).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("circular dependency: {0}")]
    CircularDependency(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("scheduler error: {0}")]
    Scheduler(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap an arbitrary repository failure as [`Error::Database`].
    pub fn database(err: impl std::fmt::Display) -> Self {
        Error::Database(err.to_string())
    }

    /// Wrap a cron-registration failure as [`Error::Scheduler`].
    pub fn scheduler(err: impl std::fmt::Display) -> Self {
        Error::Scheduler(err.to_string())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
