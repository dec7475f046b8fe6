// src/dag/node.rs

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::task_id::TaskId;

/// Boxed, not-yet-started node action. It does nothing until the executor
/// polls it, so creating nodes up front has no side effects.
pub type NodeFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// One schedulable unit of the DAG.
///
/// The action must capture its own failures; the executor only cares that it
/// finishes.
pub struct ExecutionNode {
    pub id: TaskId,
    pub priority: i32,
    action: NodeFuture,
}

impl fmt::Debug for ExecutionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionNode")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

impl ExecutionNode {
    pub fn new<F>(id: TaskId, priority: i32, action: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            id,
            priority,
            action: Box::pin(action),
        }
    }

    /// A node that completes immediately (sentinels, undefined tasks).
    pub fn noop(id: TaskId) -> Self {
        Self::new(id, 0, async {})
    }

    pub fn into_parts(self) -> (TaskId, i32, NodeFuture) {
        (self.id, self.priority, self.action)
    }
}
