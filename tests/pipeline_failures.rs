mod common;

use common::{
    Behaviour, CapturingEnv, TaskTracer, fast_options, init_tracing, single_package_graph,
    two_package_graph, with_timeout,
};
use task_scheduler::SchedulerError;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use task_scheduler::engine::{Pipeline, PipelineEnv, PipelineOptions, Targets};

#[tokio::test]
async fn failing_step_fails_the_run() {
    init_tracing();
    let tracer = TaskTracer::new();
    let step = tracer.task_with(Behaviour::failing());
    let capture = CapturingEnv::new();

    let report = with_timeout(
        Pipeline::new(single_package_graph())
            .with_env(capture.env())
            .with_options(fast_options())
            .add_task(step.definition())
            .go(Targets::all()),
    )
    .await
    .unwrap();

    assert_eq!(capture.exit_codes(), vec![1]);
    assert!(!report.is_success());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].task, step.name);
    assert_eq!(report.failures[0].package, "A");
}

#[tokio::test]
async fn dependent_step_does_not_start_after_failure() {
    init_tracing();
    let tracer = TaskTracer::new();
    let task1 = tracer.task_with(Behaviour::failing());
    let task2 = tracer.task();
    let capture = CapturingEnv::new();

    let report = with_timeout(
        Pipeline::new(single_package_graph())
            .with_env(capture.env())
            .with_options(fast_options())
            .add_task(task1.definition())
            .add_task(task2.definition().deps([task1.name.clone()]))
            .go(Targets::all()),
    )
    .await
    .unwrap();

    assert_eq!(tracer.count(&task1.started("/a")), 1);
    assert_eq!(tracer.count(&task2.started("/a")), 0);
    assert_eq!(report.completed, 1);
    assert_eq!(report.skipped, 1);
}

#[tokio::test]
async fn bailing_does_not_deadlock_dependents() {
    init_tracing();
    let tracer = TaskTracer::new();
    let task = tracer.task_with(Behaviour::failing());
    let capture = CapturingEnv::new();

    let report = with_timeout(
        Pipeline::new(two_package_graph())
            .with_env(capture.env())
            .with_options(fast_options())
            .add_task(task.definition().topo_deps([task.name.clone()]))
            .go(Targets::all()),
    )
    .await
    .unwrap();

    assert_eq!(tracer.count(&task.started("/b")), 1);
    assert_eq!(tracer.count(&task.started("/a")), 0);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].package, "B");
    assert_eq!(report.skipped, 1);
    assert_eq!(capture.exit_codes(), vec![1]);
}

#[tokio::test]
async fn exit_is_called_once_for_many_failures() {
    init_tracing();
    let tracer = TaskTracer::new();
    let task = tracer.task_with(Behaviour::failing());
    let capture = CapturingEnv::new();

    let report = with_timeout(
        Pipeline::new(two_package_graph())
            .with_env(capture.env())
            .with_options(fast_options())
            .add_task(task.definition())
            .go(Targets::all()),
    )
    .await
    .unwrap();

    assert_eq!(report.failures.len(), 2);
    assert_eq!(capture.exit_codes(), vec![1]);
}

#[tokio::test]
async fn successful_run_never_exits() {
    init_tracing();
    let tracer = TaskTracer::new();
    let task = tracer.task();
    let capture = CapturingEnv::new();

    let report = with_timeout(
        Pipeline::new(two_package_graph())
            .with_env(capture.env())
            .with_options(fast_options())
            .add_task(task.definition())
            .go(Targets::all()),
    )
    .await
    .unwrap();

    assert!(report.is_success());
    assert!(capture.exit_codes().is_empty());
    assert!(capture.stderr().is_empty());
}

#[tokio::test]
async fn erroring_step_is_a_failure() {
    init_tracing();
    let tracer = TaskTracer::new();
    let task = tracer.task_with(Behaviour::erroring("failing miserably"));
    let capture = CapturingEnv::new();

    let report = with_timeout(
        Pipeline::new(single_package_graph())
            .with_env(capture.env())
            .with_options(fast_options())
            .add_task(task.definition())
            .go(Targets::all()),
    )
    .await
    .unwrap();

    assert_eq!(report.failures.len(), 1);
    assert!(
        report.failures[0]
            .message
            .contains("stack trace for following error: failing miserably")
    );
    assert_eq!(capture.exit_codes(), vec![1]);
}

#[tokio::test]
async fn unknown_scope_package_is_rejected() {
    let tracer = TaskTracer::new();
    let capture = CapturingEnv::new();

    let result = Pipeline::new(two_package_graph())
        .with_env(capture.env())
        .add_task(tracer.task().definition())
        .go(Targets::all().packages(["C"]))
        .await;

    assert!(matches!(result, Err(SchedulerError::UnknownPackage(p)) if p == "C"));
    assert!(tracer.logs().is_empty());
    assert!(capture.exit_codes().is_empty());
}

#[tokio::test]
async fn zero_concurrency_is_rejected() {
    let capture = CapturingEnv::new();

    let result = Pipeline::new(single_package_graph())
        .with_env(capture.env())
        .with_options(PipelineOptions::default().concurrency(0))
        .go(Targets::all())
        .await;

    match result {
        Err(SchedulerError::ConfigError(msg)) => assert!(msg.contains("concurrency")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn add_dep_validates_packages_and_names() {
    let unknown = Pipeline::new(two_package_graph()).add_dep(("C", "build"), ("A", "build"));
    assert!(matches!(unknown, Err(SchedulerError::UnknownPackage(p)) if p == "C"));

    let reserved = Pipeline::new(two_package_graph()).add_dep(("B", "bu#ild"), ("A", "build"));
    assert!(matches!(reserved, Err(SchedulerError::InvalidName { .. })));
}

#[test]
fn debug_formatting_does_not_call_env_hooks() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let env = PipelineEnv::default().with_cwd(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        PathBuf::from("/")
    });

    let rendered = format!("{env:?}");
    let pipeline = format!("{:?}", Pipeline::new(single_package_graph()).with_env(env));

    assert!(rendered.starts_with("PipelineEnv"));
    assert!(pipeline.starts_with("Pipeline"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
