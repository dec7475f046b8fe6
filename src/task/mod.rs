// src/task/mod.rs

//! Task definitions and their run-time context.
//!
//! - [`definition`] holds [`TaskDefinition`], the run callback abstraction
//!   and the name-keyed [`TaskRegistry`].
//! - [`sink`] provides the in-memory [`OutputSink`] that captures what a task
//!   writes to stdout/stderr.

pub mod definition;
pub mod sink;

pub use definition::{TaskAction, TaskContext, TaskDefinition, TaskFuture, TaskRegistry};
pub use sink::OutputSink;
