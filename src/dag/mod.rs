// src/dag/mod.rs

//! Concurrency- and priority-bounded execution of a node DAG.
//!
//! - [`node`] defines [`ExecutionNode`], the unit the executor runs.
//! - [`ready`] holds the priority-ordered pool of nodes whose predecessors
//!   have all completed.
//! - [`scheduler`] contains [`DagExecutor`], which drains every node exactly
//!   once regardless of what the individual node actions do.

pub mod node;
pub mod ready;
pub mod scheduler;

pub use node::{ExecutionNode, NodeFuture};
pub use ready::ReadyPool;
pub use scheduler::{DagExecutor, ExecutionSummary};
