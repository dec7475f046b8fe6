// src/engine/mod.rs

//! Orchestration of a pipeline run.
//!
//! This module ties together:
//! - the task graph builder (which task instances, in which order)
//! - the DAG executor (when each instance starts)
//! - the task runner (running and reporting one instance)
//! - the shared run state (bail flag, ordered failures)
//!
//! [`Pipeline`] is the public entry point.

pub mod env;
pub mod options;
pub mod pipeline;
pub mod state;

pub use env::{ConsoleLogger, Logger, PipelineEnv, TracingLogger, default_error_formatter};
pub use options::{DEFAULT_OUTPUT_GRACE, PipelineOptions};
pub use pipeline::{Pipeline, Targets};
pub use state::{RunReport, RunState};
