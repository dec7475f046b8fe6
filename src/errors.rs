// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Task failures are *not* errors at this level: they are captured per task
//! and reported through the pipeline's failure list. `SchedulerError` covers
//! configuration problems handed to the public API.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown package: {0}")]
    UnknownPackage(String),

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Cycle detected in package graph: {0}")]
    DagCycle(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SchedulerError>;
