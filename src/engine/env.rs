// src/engine/env.rs

//! Hooks into the outside world used by a pipeline run.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Line-oriented sink for task results.
///
/// Multi-line messages are passed through as-is; splitting them is up to the
/// implementation.
pub trait Logger: Send + Sync {
    fn log(&self, message: &str);
    fn error(&self, message: &str);
}

/// Writes `log` to stdout and `error` to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// Forwards task results into the diagnostic `tracing` stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::info!(target: "task_scheduler::output", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "task_scheduler::output", "{message}");
    }
}

pub type CwdFn = Arc<dyn Fn() -> PathBuf + Send + Sync>;
pub type ExitFn = Arc<dyn Fn(i32) + Send + Sync>;
pub type ErrorFormatter = Arc<dyn Fn(&anyhow::Error) -> String + Send + Sync>;

/// Environment of a pipeline: where results go, the base working directory,
/// how to exit, and how to render a task error.
#[derive(Clone)]
pub struct PipelineEnv {
    pub logger: Arc<dyn Logger>,
    pub cwd: CwdFn,
    pub exit: ExitFn,
    pub error_formatter: ErrorFormatter,
}

impl fmt::Debug for PipelineEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineEnv").finish_non_exhaustive()
    }
}

impl Default for PipelineEnv {
    /// Console output, the process working directory, real process exit.
    fn default() -> Self {
        Self {
            logger: Arc::new(ConsoleLogger),
            cwd: Arc::new(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))),
            exit: Arc::new(exit_process),
            error_formatter: Arc::new(default_error_formatter),
        }
    }
}

impl PipelineEnv {
    pub fn with_logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    pub fn with_cwd(mut self, cwd: impl Fn() -> PathBuf + Send + Sync + 'static) -> Self {
        self.cwd = Arc::new(cwd);
        self
    }

    pub fn with_exit(mut self, exit: impl Fn(i32) + Send + Sync + 'static) -> Self {
        self.exit = Arc::new(exit);
        self
    }

    pub fn with_error_formatter(
        mut self,
        formatter: impl Fn(&anyhow::Error) -> String + Send + Sync + 'static,
    ) -> Self {
        self.error_formatter = Arc::new(formatter);
        self
    }
}

fn exit_process(code: i32) {
    std::process::exit(code)
}

/// Message plus cause chain, plus a backtrace when one was captured.
pub fn default_error_formatter(err: &anyhow::Error) -> String {
    format!("{err:?}")
}
