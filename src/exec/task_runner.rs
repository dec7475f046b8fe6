// src/exec/task_runner.rs

//! Runner for a single task instance.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tracing::{debug, info, warn};

use crate::engine::PipelineEnv;
use crate::engine::RunState;
use crate::output::{format_output, output_result};
use crate::task::{OutputSink, TaskContext, TaskDefinition};
use crate::types::Outcome;

/// Captured outcome of one task instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// A failed task instance, with its formatted output block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    pub task: String,
    pub package: String,
    pub message: String,
}

/// How a runner invocation ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRun {
    /// The task ran and succeeded; its `Done` block has been logged.
    Completed,
    /// The run had already bailed, so the task was not started.
    Skipped,
}

/// Runs task instances against a [`PipelineEnv`].
#[derive(Debug, Clone)]
pub struct TaskRunner {
    env: PipelineEnv,
    output_grace: Duration,
}

impl TaskRunner {
    pub fn new(env: PipelineEnv, output_grace: Duration) -> Self {
        Self { env, output_grace }
    }

    /// Run `task` in `package`, located at `location` under the env's cwd.
    ///
    /// - If `state` has bailed, returns `Skipped` without touching the task.
    /// - On success, logs the `Done` block and returns `Completed`.
    /// - On failure, nothing is logged; the formatted block is returned as a
    ///   [`TaskFailure`] for the caller to record and report later.
    pub async fn run(
        &self,
        task: &Arc<TaskDefinition>,
        package: &str,
        location: &str,
        state: &RunState,
    ) -> Result<TaskRun, TaskFailure> {
        if state.should_bail() {
            debug!(task = %task.name, package, "run has bailed; not starting task");
            return Ok(TaskRun::Skipped);
        }

        let cwd = (self.env.cwd)().join(location);
        info!(task = %task.name, package, cwd = %cwd.display(), "starting task");

        let stdout = OutputSink::new();
        let stderr = OutputSink::new();
        let ctx = TaskContext {
            cwd,
            stdout: stdout.clone(),
            stderr: stderr.clone(),
            package: package.to_string(),
        };

        let settled = self.invoke(task, ctx).await;

        if !self.output_grace.is_zero() {
            tokio::time::sleep(self.output_grace).await;
        }

        let result = match settled {
            Ok(success) => TaskResult {
                success,
                stdout: stdout.contents(),
                stderr: stderr.contents(),
            },
            Err(err) => {
                stderr.write_str(&format!("\n{}", (self.env.error_formatter)(&err)));
                TaskResult {
                    success: false,
                    stdout: stdout.contents(),
                    stderr: stderr.contents(),
                }
            }
        };

        let message = format_output(&result);
        if result.success {
            info!(task = %task.name, package, "task succeeded");
            output_result(&message, package, &task.name, Outcome::Success, self.env.logger.as_ref());
            Ok(TaskRun::Completed)
        } else {
            warn!(task = %task.name, package, "task failed");
            Err(TaskFailure {
                task: task.name.clone(),
                package: package.to_string(),
                message,
            })
        }
    }

    /// Run the callback on its own tokio task so a panic surfaces as an
    /// error instead of unwinding through the executor.
    async fn invoke(&self, task: &Arc<TaskDefinition>, ctx: TaskContext) -> anyhow::Result<bool> {
        let future = task.run.run(ctx);
        match tokio::spawn(future).await {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => Err(anyhow!(
                "task panicked: {}",
                panic_message(join_err.into_panic())
            )),
            Err(join_err) => Err(anyhow!("task was cancelled: {join_err}")),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
