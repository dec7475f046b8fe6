// src/graph/task_graph.rs

//! Expansion of requested targets into a task-level edge list.
//!
//! The builder walks breadth-first from every `(package, target)` pair in
//! scope and, for each task instance it reaches, adds the edges that must be
//! satisfied before that instance may start:
//!
//! - `topo_deps`: the named task in each package this package depends on,
//! - `deps`: the named task in the same package,
//! - manual edges whose target is this instance.
//!
//! An instance that receives no edge from any of these gets a single edge
//! from its package's sentinel id, so every real task has at least one
//! predecessor.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::graph::package_graph::PackageGraph;
use crate::task::TaskRegistry;
use crate::task_id::TaskId;

/// `to` must not start before `from` has completed (or the run has bailed).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskEdge {
    pub from: TaskId,
    pub to: TaskId,
}

impl TaskEdge {
    pub fn new(from: TaskId, to: TaskId) -> Self {
        Self { from, to }
    }
}

impl From<(TaskId, TaskId)> for TaskEdge {
    fn from((from, to): (TaskId, TaskId)) -> Self {
        Self { from, to }
    }
}

/// Predicate deciding whether a task exists in a package:
/// `(task_name, package) -> bool`.
pub type Availability<'a> = &'a (dyn Fn(&str, &str) -> bool + Send + Sync);

/// Pure generator of the task edge list for one run.
///
/// ```
/// use task_scheduler::graph::{PackageGraph, TaskGraphBuilder};
/// use task_scheduler::task::TaskRegistry;
///
/// let graph = PackageGraph::default();
/// let tasks = TaskRegistry::new();
/// let scope: Vec<String> = Vec::new();
/// let targets = vec!["build".to_string()];
///
/// let edges = TaskGraphBuilder::new(&scope, &targets, &tasks, &graph).build();
/// assert!(edges.is_empty());
/// ```
pub struct TaskGraphBuilder<'a> {
    scope: &'a [String],
    targets: &'a [String],
    tasks: &'a TaskRegistry,
    packages: &'a PackageGraph,
    manual_edges: &'a [TaskEdge],
    targets_only: bool,
    availability: Option<Availability<'a>>,
}

impl<'a> TaskGraphBuilder<'a> {
    pub fn new(
        scope: &'a [String],
        targets: &'a [String],
        tasks: &'a TaskRegistry,
        packages: &'a PackageGraph,
    ) -> Self {
        Self {
            scope,
            targets,
            tasks,
            packages,
            manual_edges: &[],
            targets_only: false,
            availability: None,
        }
    }

    pub fn manual_edges(mut self, edges: &'a [TaskEdge]) -> Self {
        self.manual_edges = edges;
        self
    }

    /// Only follow `deps` entries that are themselves targets.
    ///
    /// The stored definitions are left untouched; the narrowing applies to
    /// this traversal only.
    pub fn targets_only(mut self, targets_only: bool) -> Self {
        self.targets_only = targets_only;
        self
    }

    pub fn availability(mut self, can_run: Availability<'a>) -> Self {
        self.availability = Some(can_run);
        self
    }

    /// Run the traversal. The result may contain duplicate edges; see
    /// [`dedupe_edges`].
    pub fn build(&self) -> Vec<TaskEdge> {
        let mut edges = Vec::new();
        let mut queue: VecDeque<TaskId> = VecDeque::new();
        let mut visited: HashSet<TaskId> = HashSet::new();

        for pkg in self.scope {
            for target in self.targets {
                if self.can_run(target, pkg) {
                    queue.push_back(TaskId::new(pkg, target));
                }
            }
        }

        while let Some(id) = queue.pop_front() {
            if visited.contains(&id) {
                continue;
            }

            let (pkg, task_name) = id.parts();
            let Some(task) = self.tasks.get(task_name) else {
                debug!(task = %id, "no definition for task; skipping");
                continue;
            };
            visited.insert(id.clone());

            let before = edges.len();

            for from in &task.topo_deps {
                for dep_pkg in self.packages.dependencies_of(pkg) {
                    if self.can_run(from, dep_pkg) {
                        let from_id = TaskId::new(dep_pkg, from);
                        edges.push(TaskEdge::new(from_id.clone(), id.clone()));
                        queue.push_back(from_id);
                    }
                }
            }

            for from in task.deps.iter().filter(|d| self.follows_dep(d)) {
                if self.can_run(from, pkg) {
                    let from_id = TaskId::new(pkg, from);
                    edges.push(TaskEdge::new(from_id.clone(), id.clone()));
                    queue.push_back(from_id);
                }
            }

            for manual in self.manual_edges.iter().filter(|e| e.to == id) {
                if self.can_run(manual.from.task(), manual.from.package()) {
                    edges.push(manual.clone());
                    queue.push_back(manual.from.clone());
                }
            }

            if edges.len() == before {
                edges.push(TaskEdge::new(TaskId::sentinel(pkg), id.clone()));
            }

            debug!(task = %id, added = edges.len() - before, "expanded task");
        }

        edges
    }

    fn can_run(&self, task: &str, package: &str) -> bool {
        self.availability.is_none_or(|f| f(task, package))
    }

    fn follows_dep(&self, dep: &str) -> bool {
        !self.targets_only || self.targets.iter().any(|t| t == dep)
    }
}

/// Drop repeated edges, keeping the first occurrence of each pair.
pub fn dedupe_edges(edges: Vec<TaskEdge>) -> Vec<TaskEdge> {
    let mut seen = HashSet::new();
    edges
        .into_iter()
        .filter(|e| seen.insert(e.clone()))
        .collect()
}

/// Distinct task ids mentioned by `edges`, in order of first appearance.
pub fn nodes_of(edges: &[TaskEdge]) -> Vec<TaskId> {
    let mut seen = HashSet::new();
    let mut nodes = Vec::new();
    for edge in edges {
        for id in [&edge.from, &edge.to] {
            if seen.insert(id.clone()) {
                nodes.push(id.clone());
            }
        }
    }
    nodes
}
