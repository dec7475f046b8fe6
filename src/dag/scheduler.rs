// src/dag/scheduler.rs

use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info, warn};

use crate::dag::node::{ExecutionNode, NodeFuture};
use crate::dag::ready::ReadyPool;
use crate::graph::TaskEdge;
use crate::task_id::TaskId;

/// What happened during one [`DagExecutor::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionSummary {
    /// Node ids in the order their actions were started.
    pub started: Vec<TaskId>,
    /// Nodes whose action panicked. They still count as completed.
    pub panicked: Vec<TaskId>,
    /// Nodes that could never become ready (only possible with a cycle).
    pub unreached: Vec<TaskId>,
}

/// Dependency-driven executor.
///
/// Every node starts once all of its predecessors have completed. Among
/// ready nodes the highest priority starts first, and at most `concurrency`
/// actions are in flight at once (unbounded if `None`).
///
/// Node actions are polled on the calling task; an action that wants to run
/// on another worker thread spawns its own work.
#[derive(Debug, Clone, Copy, Default)]
pub struct DagExecutor {
    concurrency: Option<usize>,
}

impl DagExecutor {
    pub fn new(concurrency: Option<usize>) -> Self {
        Self { concurrency }
    }

    pub fn unbounded() -> Self {
        Self { concurrency: None }
    }

    pub fn concurrency(&self) -> Option<usize> {
        self.concurrency
    }

    /// Run every node to completion.
    ///
    /// Duplicate edges are ignored, as are edges naming an id that has no
    /// node. This never fails: a panicking action is recorded in the summary
    /// and treated as completed so its dependents are still released.
    pub async fn run(&self, nodes: Vec<ExecutionNode>, edges: &[TaskEdge]) -> ExecutionSummary {
        let total = nodes.len();
        let limit = self.concurrency.map(|c| c.max(1));

        let mut ids = Vec::with_capacity(total);
        let mut priorities = Vec::with_capacity(total);
        let mut actions: Vec<Option<NodeFuture>> = Vec::with_capacity(total);
        let mut index: HashMap<TaskId, usize> = HashMap::with_capacity(total);

        for node in nodes {
            let (id, priority, action) = node.into_parts();
            if index.contains_key(&id) {
                warn!(node = %id, "duplicate execution node; keeping the first");
                continue;
            }
            index.insert(id.clone(), ids.len());
            ids.push(id);
            priorities.push(priority);
            actions.push(Some(action));
        }

        let count = ids.len();
        let mut in_degree = vec![0usize; count];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
        let mut seen: HashSet<(usize, usize)> = HashSet::new();

        for edge in edges {
            let (Some(&from), Some(&to)) = (index.get(&edge.from), index.get(&edge.to)) else {
                warn!(from = %edge.from, to = %edge.to, "edge references unknown node; ignoring");
                continue;
            };
            if seen.insert((from, to)) {
                in_degree[to] += 1;
                dependents[from].push(to);
            }
        }

        let mut ready = ReadyPool::new();
        for (i, degree) in in_degree.iter().enumerate() {
            if *degree == 0 {
                ready.push(i, priorities[i]);
            }
        }

        debug!(
            nodes = count,
            edges = seen.len(),
            roots = ready.len(),
            concurrency = ?limit,
            "executor starting"
        );

        let mut summary = ExecutionSummary::default();
        let mut running = FuturesUnordered::new();
        let mut finished = 0usize;

        loop {
            while limit.is_none_or(|l| running.len() < l) {
                let Some(i) = ready.pop() else {
                    break;
                };
                let Some(action) = actions[i].take() else {
                    continue;
                };
                debug!(node = %ids[i], priority = priorities[i], running = running.len(), "starting node");
                summary.started.push(ids[i].clone());
                running.push(async move {
                    let completed = AssertUnwindSafe(action).catch_unwind().await.is_ok();
                    (i, completed)
                });
            }

            let Some((i, completed)) = running.next().await else {
                break;
            };

            finished += 1;
            if !completed {
                warn!(node = %ids[i], "node action panicked; releasing dependents");
                summary.panicked.push(ids[i].clone());
            }

            for &d in &dependents[i] {
                in_degree[d] -= 1;
                if in_degree[d] == 0 {
                    ready.push(d, priorities[d]);
                }
            }
        }

        if finished < count {
            summary.unreached = ids
                .iter()
                .zip(actions.iter())
                .filter(|(_, action)| action.is_some())
                .map(|(id, _)| id.clone())
                .collect();
            warn!(
                unreached = summary.unreached.len(),
                "executor stopped with nodes that never became ready; the edge list contains a cycle"
            );
        }

        info!(completed = finished, nodes = count, "executor drained");
        summary
    }
}
