// src/lib.rs

//! Dependency-aware task scheduling for monorepos.
//!
//! Named tasks (`build`, `test`, `lint`, ...) are run across a graph of
//! packages. Each task declares:
//! - `deps`: tasks in the same package that must finish first,
//! - `topo_deps`: tasks that must finish first in the packages this package
//!   depends on,
//!
//! and extra edges between arbitrary task instances can be added by hand.
//! A run expands the requested targets into a task-level DAG and executes it
//! with bounded concurrency and per-task priority. The first failure stops
//! new work from starting, the rest of the graph drains, and all failures
//! are reported at the end.
//!
//! Layout:
//! - [`task_id`]: `package#task` keys
//! - [`graph`]: package graph input and task-graph generation
//! - [`task`]: task definitions and output sinks
//! - [`dag`]: the priority/concurrency bounded executor
//! - [`exec`]: running and reporting a single task instance
//! - [`output`]: `Done` / `Failed` block formatting
//! - [`engine`]: the [`Pipeline`] orchestrator and its environment

pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod graph;
pub mod logging;
pub mod output;
pub mod task;
pub mod task_id;
pub mod types;

pub use engine::{Logger, Pipeline, PipelineEnv, PipelineOptions, RunReport, Targets};
pub use errors::{Result, SchedulerError};
pub use graph::{PackageGraph, PackageInfo, RawPackageGraph, TaskEdge};
pub use task::{OutputSink, TaskContext, TaskDefinition};
pub use task_id::TaskId;
