// src/graph/mod.rs

//! Package graph input and task-graph generation.
//!
//! - [`package_graph`] holds the static package → dependencies mapping.
//! - [`validate`] checks a raw package graph (known names, no cycles).
//! - [`task_graph`] expands targets over the package graph into task edges.

pub mod package_graph;
pub mod task_graph;
pub mod validate;

pub use package_graph::{PackageGraph, PackageInfo, RawPackageGraph};
pub use task_graph::{TaskEdge, TaskGraphBuilder, dedupe_edges, nodes_of};
