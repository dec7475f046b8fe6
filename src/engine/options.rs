// src/engine/options.rs

use std::time::Duration;

use crate::errors::{Result, SchedulerError};

/// Pause after a task settles before its captured output is read, so writes
/// still in flight from helpers the task spawned can land.
pub const DEFAULT_OUTPUT_GRACE: Duration = Duration::from_millis(50);

/// Tunables for a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Maximum number of task instances running at once; `None` = unbounded.
    pub concurrency: Option<usize>,
    /// See [`DEFAULT_OUTPUT_GRACE`]. `Duration::ZERO` disables the pause.
    pub output_grace: Duration,
    /// Only follow a task's `deps` when they are themselves targets.
    pub targets_only: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            concurrency: None,
            output_grace: DEFAULT_OUTPUT_GRACE,
            targets_only: false,
        }
    }
}

impl PipelineOptions {
    pub fn concurrency(mut self, limit: usize) -> Self {
        self.concurrency = Some(limit);
        self
    }

    pub fn output_grace(mut self, grace: Duration) -> Self {
        self.output_grace = grace;
        self
    }

    pub fn targets_only(mut self, targets_only: bool) -> Self {
        self.targets_only = targets_only;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == Some(0) {
            return Err(SchedulerError::ConfigError(
                "concurrency must be >= 1 (got 0)".to_string(),
            ));
        }
        Ok(())
    }
}
