// src/exec/mod.rs

//! Execution of individual task instances.
//!
//! - [`task_runner`] runs one task in one package: captures its output,
//!   turns errors and panics into failures, and reports the result.
//! - [`command`] adapts a shell command line into a task run callback,
//!   using `tokio::process::Command`.

pub mod command;
pub mod task_runner;

pub use command::run_command;
pub use task_runner::{TaskFailure, TaskResult, TaskRun, TaskRunner};
