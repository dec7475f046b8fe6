// src/task/definition.rs

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use crate::task::sink::OutputSink;

/// Everything a run callback receives for one task instance.
#[derive(Debug, Clone)]
pub struct TaskContext {
    /// Working directory of the package (`cwd() / location`).
    pub cwd: PathBuf,
    pub stdout: OutputSink,
    pub stderr: OutputSink,
    /// Name of the package the task runs in.
    pub package: String,
}

/// Boxed future returned by a run callback.
///
/// `Ok(true)` is success; `Ok(false)` and `Err(_)` are failures. An `Err`
/// additionally gets its formatted error appended to the captured stderr.
pub type TaskFuture = Pin<Box<dyn Future<Output = anyhow::Result<bool>> + Send + 'static>>;

/// The work a task performs in one package.
///
/// Closures `Fn(TaskContext) -> impl Future<Output = anyhow::Result<bool>>`
/// implement this automatically.
pub trait TaskAction: Send + Sync {
    fn run(&self, ctx: TaskContext) -> TaskFuture;
}

impl<F, Fut> TaskAction for F
where
    F: Fn(TaskContext) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<bool>> + Send + 'static,
{
    fn run(&self, ctx: TaskContext) -> TaskFuture {
        Box::pin(self(ctx))
    }
}

/// A named task and its ordering rules.
///
/// - `deps`: tasks in the *same* package that must finish first
///   (e.g. `test` after `build`).
/// - `topo_deps`: tasks that must finish first in every package this package
///   depends on (e.g. `build` after the dependencies' `build`).
#[derive(Clone)]
pub struct TaskDefinition {
    pub name: String,
    pub run: Arc<dyn TaskAction>,
    pub deps: Vec<String>,
    pub topo_deps: Vec<String>,
    /// Scheduling priority when more tasks are ready than may run.
    pub priority: Option<i32>,
    /// Per-package overrides of `priority`.
    pub priorities_by_package: HashMap<String, i32>,
}

impl fmt::Debug for TaskDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskDefinition")
            .field("name", &self.name)
            .field("deps", &self.deps)
            .field("topo_deps", &self.topo_deps)
            .field("priority", &self.priority)
            .field("priorities_by_package", &self.priorities_by_package)
            .finish_non_exhaustive()
    }
}

impl TaskDefinition {
    pub fn new<F, Fut>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<bool>> + Send + 'static,
    {
        Self::from_action(name, Arc::new(run))
    }

    pub fn from_action(name: impl Into<String>, run: Arc<dyn TaskAction>) -> Self {
        Self {
            name: name.into(),
            run,
            deps: Vec::new(),
            topo_deps: Vec::new(),
            priority: None,
            priorities_by_package: HashMap::new(),
        }
    }

    /// A task that runs `command` through the platform shell in the
    /// package directory. See [`crate::exec::command`].
    pub fn command(name: impl Into<String>, command: impl Into<String>) -> Self {
        let command: Arc<str> = Arc::from(command.into());
        Self::new(name, move |ctx| {
            let command = Arc::clone(&command);
            async move { crate::exec::command::run_command(&command, ctx).await }
        })
    }

    pub fn deps<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deps = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn topo_deps<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topo_deps = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn package_priority(mut self, package: impl Into<String>, priority: i32) -> Self {
        self.priorities_by_package.insert(package.into(), priority);
        self
    }

    /// Effective priority of this task inside `package`.
    pub fn priority_in(&self, package: &str) -> i32 {
        self.priorities_by_package
            .get(package)
            .copied()
            .or(self.priority)
            .unwrap_or(0)
    }
}

/// Task definitions keyed by name. Registering a name twice replaces the
/// earlier definition.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: BTreeMap<String, Arc<TaskDefinition>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `task`, returning the definition it replaced, if any.
    pub fn insert(&mut self, task: TaskDefinition) -> Option<Arc<TaskDefinition>> {
        self.tasks.insert(task.name.clone(), Arc::new(task))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<TaskDefinition>> {
        self.tasks.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl FromIterator<TaskDefinition> for TaskRegistry {
    fn from_iter<I: IntoIterator<Item = TaskDefinition>>(iter: I) -> Self {
        let mut registry = TaskRegistry::new();
        for task in iter {
            registry.insert(task);
        }
        registry
    }
}
