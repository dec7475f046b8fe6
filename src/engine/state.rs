// src/engine/state.rs

//! Shared per-run state: the bail flag and the ordered failure list.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::exec::TaskFailure;

#[derive(Debug, Default)]
struct Inner {
    bailed: bool,
    failures: Vec<TaskFailure>,
    completed: usize,
    skipped: usize,
}

/// State mutated by concurrently finishing task instances.
///
/// `bailed` starts `false` and flips to `true` on the first recorded
/// failure; it is never reset within a run.
#[derive(Debug, Default)]
pub struct RunState {
    inner: Mutex<Inner>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a failure has been observed and new work should not start.
    pub fn should_bail(&self) -> bool {
        self.lock().bailed
    }

    /// A task instance ran and succeeded.
    pub fn record_completed(&self) {
        self.lock().completed += 1;
    }

    /// A task instance was short-circuited because the run had bailed.
    pub fn record_skipped(&self) {
        self.lock().skipped += 1;
    }

    /// A task instance ran and failed. Sets the bail flag.
    pub fn record_failure(&self, failure: TaskFailure) {
        let mut inner = self.lock();
        if !inner.bailed {
            warn!(
                task = %failure.task,
                package = %failure.package,
                "first task failure; no new tasks will be started"
            );
            inner.bailed = true;
        }
        inner.completed += 1;
        inner.failures.push(failure);
    }

    pub fn report(&self) -> RunReport {
        let inner = self.lock();
        RunReport {
            failures: inner.failures.clone(),
            completed: inner.completed,
            skipped: inner.skipped,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Outcome of one `Pipeline::go`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Failures in the order they were observed.
    pub failures: Vec<TaskFailure>,
    /// Task instances that ran to completion, successful or not.
    pub completed: usize,
    /// Task instances that never ran because the run had bailed.
    pub skipped: usize,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
