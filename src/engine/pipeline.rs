// src/engine/pipeline.rs

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::dag::{DagExecutor, ExecutionNode};
use crate::engine::env::PipelineEnv;
use crate::engine::options::PipelineOptions;
use crate::engine::state::{RunReport, RunState};
use crate::errors::{Result, SchedulerError};
use crate::exec::{TaskRun, TaskRunner};
use crate::graph::{PackageGraph, TaskEdge, TaskGraphBuilder, dedupe_edges, nodes_of};
use crate::output::output_result;
use crate::task::{TaskDefinition, TaskRegistry};
use crate::task_id::TaskId;
use crate::types::Outcome;

type AvailabilityFn = Arc<dyn Fn(&str, &str) -> bool + Send + Sync>;

/// Which packages and tasks a run covers. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targets {
    pub packages: Option<Vec<String>>,
    pub tasks: Option<Vec<String>>,
}

impl Targets {
    /// Every registered task in every package.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packages = Some(packages.into_iter().map(Into::into).collect());
        self
    }

    pub fn tasks<I, S>(mut self, tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tasks = Some(tasks.into_iter().map(Into::into).collect());
        self
    }
}

/// Builder and runner for task executions over a package graph.
///
/// ```no_run
/// use task_scheduler::engine::{Pipeline, Targets};
/// use task_scheduler::graph::{PackageGraph, PackageInfo, RawPackageGraph};
/// use task_scheduler::task::TaskDefinition;
///
/// # async fn demo() -> task_scheduler::errors::Result<()> {
/// let mut raw = RawPackageGraph::new();
/// raw.insert("app", PackageInfo::new("packages/app").depends_on("lib"));
/// raw.insert("lib", PackageInfo::new("packages/lib"));
///
/// let report = Pipeline::new(PackageGraph::try_from(raw)?)
///     .add_task(TaskDefinition::command("build", "make").topo_deps(["build"]))
///     .add_task(TaskDefinition::command("test", "make test").deps(["build"]))
///     .go(Targets::all().tasks(["test"]))
///     .await?;
/// assert!(report.is_success());
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    graph: Arc<PackageGraph>,
    tasks: TaskRegistry,
    manual_edges: Vec<TaskEdge>,
    env: PipelineEnv,
    options: PipelineOptions,
    availability: AvailabilityFn,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("graph", &self.graph)
            .field("tasks", &self.tasks)
            .field("manual_edges", &self.manual_edges)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    pub fn new(graph: PackageGraph) -> Self {
        Self {
            graph: Arc::new(graph),
            tasks: TaskRegistry::new(),
            manual_edges: Vec::new(),
            env: PipelineEnv::default(),
            options: PipelineOptions::default(),
            availability: Arc::new(|_: &str, _: &str| true),
        }
    }

    pub fn with_env(mut self, env: PipelineEnv) -> Self {
        self.env = env;
        self
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Install the `(task_name, package) -> bool` predicate saying whether a
    /// task exists in a package. Unavailable instances are neither run nor
    /// waited on.
    pub fn with_availability(
        mut self,
        can_run: impl Fn(&str, &str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.availability = Arc::new(can_run);
        self
    }

    /// Register a task, replacing any earlier task of the same name.
    pub fn add_task(mut self, task: TaskDefinition) -> Self {
        if self.tasks.insert(task).is_some() {
            debug!("task definition replaced");
        }
        self
    }

    /// Declare that `to` (package, task) must wait for `from`.
    pub fn add_dep(mut self, from: (&str, &str), to: (&str, &str)) -> Result<Self> {
        for (package, _) in [from, to] {
            if !self.graph.contains(package) {
                return Err(SchedulerError::UnknownPackage(package.to_string()));
            }
        }
        let edge = TaskEdge::new(
            TaskId::try_new(from.0, from.1)?,
            TaskId::try_new(to.0, to.1)?,
        );
        debug!(from = %edge.from, to = %edge.to, "manual dependency added");
        self.manual_edges.push(edge);
        Ok(self)
    }

    pub fn tasks(&self) -> &TaskRegistry {
        &self.tasks
    }

    pub fn graph(&self) -> &PackageGraph {
        &self.graph
    }

    /// The deduplicated task edge list a run with `targets` would execute.
    pub fn task_graph(&self, targets: &Targets) -> Result<Vec<TaskEdge>> {
        let (packages, tasks) = self.resolve_targets(targets)?;
        let edges = TaskGraphBuilder::new(&packages, &tasks, &self.tasks, &self.graph)
            .manual_edges(&self.manual_edges)
            .targets_only(self.options.targets_only)
            .availability(&*self.availability)
            .build();
        Ok(dedupe_edges(edges))
    }

    /// Run every task instance reachable from `targets`.
    ///
    /// Returns once the whole graph has drained. Failures are logged after
    /// the drain, in the order they happened, and the exit hook is called
    /// once with code 1. Only configuration problems produce `Err`.
    pub async fn go(&self, targets: Targets) -> Result<RunReport> {
        self.options.validate()?;

        let edges = self.task_graph(&targets)?;
        let ids = nodes_of(&edges);

        if let Ok(order) = self.graph.dependency_order() {
            debug!(?order, "package dependency order");
        }

        let state = Arc::new(RunState::new());
        let runner = Arc::new(TaskRunner::new(self.env.clone(), self.options.output_grace));

        let mut nodes = Vec::with_capacity(ids.len());
        for id in ids {
            nodes.push(self.execution_node(id, &runner, &state)?);
        }

        info!(
            nodes = nodes.len(),
            edges = edges.len(),
            concurrency = ?self.options.concurrency,
            "starting pipeline run"
        );

        DagExecutor::new(self.options.concurrency).run(nodes, &edges).await;

        let report = state.report();
        if !report.failures.is_empty() {
            for failure in &report.failures {
                output_result(
                    &failure.message,
                    &failure.package,
                    &failure.task,
                    Outcome::Failure,
                    self.env.logger.as_ref(),
                );
            }
            (self.env.exit)(1);
        }

        info!(
            completed = report.completed,
            skipped = report.skipped,
            failed = report.failures.len(),
            "pipeline run finished"
        );
        Ok(report)
    }

    fn resolve_targets(&self, targets: &Targets) -> Result<(Vec<String>, Vec<String>)> {
        let packages = match &targets.packages {
            Some(packages) => {
                if let Some(unknown) = packages.iter().find(|p| !self.graph.contains(p)) {
                    return Err(SchedulerError::UnknownPackage(unknown.clone()));
                }
                packages.clone()
            }
            None => self.graph.package_names().map(str::to_string).collect(),
        };
        let tasks = match &targets.tasks {
            Some(tasks) => tasks.clone(),
            None => self.tasks.names().map(str::to_string).collect(),
        };
        Ok((packages, tasks))
    }

    fn execution_node(
        &self,
        id: TaskId,
        runner: &Arc<TaskRunner>,
        state: &Arc<RunState>,
    ) -> Result<ExecutionNode> {
        if id.is_sentinel() {
            return Ok(ExecutionNode::noop(id));
        }
        let Some(task) = self.tasks.get(id.task()).cloned() else {
            debug!(task = %id, "edge references undefined task; running as no-op");
            return Ok(ExecutionNode::noop(id));
        };

        let package = id.package().to_string();
        let location = self
            .graph
            .location_of(&package)
            .ok_or_else(|| SchedulerError::UnknownPackage(package.clone()))?
            .to_string();
        let priority = task.priority_in(&package);
        let runner = Arc::clone(runner);
        let state = Arc::clone(state);

        Ok(ExecutionNode::new(id, priority, async move {
            match runner.run(&task, &package, &location, &state).await {
                Ok(TaskRun::Completed) => state.record_completed(),
                Ok(TaskRun::Skipped) => state.record_skipped(),
                Err(failure) => state.record_failure(failure),
            }
        }))
    }
}
