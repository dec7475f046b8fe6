mod common;

use common::{
    CapturingEnv, TaskTracer, fast_options, init_tracing, single_package_graph,
    two_package_graph, with_timeout,
};
use task_scheduler::engine::{Pipeline, Targets};
use task_scheduler::graph::TaskEdge;

#[tokio::test]
async fn topological_steps_wait_for_dependencies() {
    init_tracing();
    let tracer = TaskTracer::new();
    let task = tracer.task();
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

    assert_eq!(
        tracer.logs(),
        vec![
            task.started("/b"),
            task.finished("/b"),
            task.started("/a"),
            task.finished("/a"),
        ]
    );
    assert!(report.is_success());
    assert_eq!(report.completed, 2);
    assert!(capture.exit_codes().is_empty());
}

#[tokio::test]
async fn dependency_result_is_logged_before_dependent_starts() {
    init_tracing();
    let capture = CapturingEnv::new();
    let tracer = capture.tracer();
    let task = tracer.task();

    with_timeout(
        Pipeline::new(two_package_graph())
            .with_env(capture.env())
            .with_options(fast_options())
            .add_task(task.definition().topo_deps([task.name.clone()]))
            .go(Targets::all()),
    )
    .await
    .unwrap();

    assert_eq!(
        capture.stdout(),
        vec![
            task.started("/b"),
            task.finished("/b"),
            format!("Done {} in B", task.name),
            String::new(),
            task.started("/a"),
            task.finished("/a"),
            format!("Done {} in A", task.name),
            String::new(),
        ]
    );
}

#[tokio::test]
async fn parallel_steps_do_not_wait_for_dependencies() {
    init_tracing();
    let tracer = TaskTracer::new();
    let task = tracer.task();
    let capture = CapturingEnv::new();

    with_timeout(
        Pipeline::new(two_package_graph())
            .with_env(capture.env())
            .with_options(fast_options())
            .add_task(task.definition())
            .go(Targets::all()),
    )
    .await
    .unwrap();

    let logs = tracer.logs();
    assert_eq!(logs.len(), 4);
    assert!(logs[..2].contains(&task.started("/a")));
    assert!(logs[..2].contains(&task.started("/b")));
    assert!(logs[2..].contains(&task.finished("/a")));
    assert!(logs[2..].contains(&task.finished("/b")));
}

#[tokio::test]
async fn steps_wait_for_the_previous_step_in_the_same_package() {
    init_tracing();
    let tracer = TaskTracer::new();
    let task1 = tracer.task();
    let task2 = tracer.task();
    let capture = CapturingEnv::new();

    with_timeout(
        Pipeline::new(two_package_graph())
            .with_env(capture.env())
            .with_options(fast_options())
            .add_task(task1.definition())
            .add_task(task2.definition().deps([task1.name.clone()]))
            .go(Targets::all()),
    )
    .await
    .unwrap();

    assert_eq!(
        tracer.logs_containing("/b"),
        vec![
            task1.started("/b"),
            task1.finished("/b"),
            task2.started("/b"),
            task2.finished("/b"),
        ]
    );
}

#[tokio::test]
async fn independent_steps_run_in_parallel_in_the_same_package() {
    init_tracing();
    let tracer = TaskTracer::new();
    let task1 = tracer.task();
    let task2 = tracer.task();
    let capture = CapturingEnv::new();

    with_timeout(
        Pipeline::new(two_package_graph())
            .with_env(capture.env())
            .with_options(fast_options())
            .add_task(task1.definition())
            .add_task(task2.definition())
            .go(Targets::all()),
    )
    .await
    .unwrap();

    let in_b = tracer.logs_containing("/b");
    assert_eq!(in_b.len(), 4);
    assert!(in_b[..2].contains(&task1.started("/b")));
    assert!(in_b[..2].contains(&task2.started("/b")));
}

#[tokio::test]
async fn targets_restrict_packages_and_tasks() {
    init_tracing();
    let tracer = TaskTracer::new();
    let task1 = tracer.task();
    let task2 = tracer.task();
    let capture = CapturingEnv::new();

    let pipeline = Pipeline::new(two_package_graph())
        .with_env(capture.env())
        .with_options(fast_options())
        .add_task(task1.definition())
        .add_task(task2.definition());

    with_timeout(pipeline.go(Targets::all().packages(["B"]).tasks([task2.name.clone()])))
        .await
        .unwrap();

    assert_eq!(tracer.logs(), vec![task2.started("/b"), task2.finished("/b")]);
}

#[tokio::test]
async fn manual_dependency_orders_across_packages() {
    init_tracing();
    let tracer = TaskTracer::new();
    let build = tracer.task();
    let deploy = tracer.task();
    let capture = CapturingEnv::new();

    let pipeline = Pipeline::new(two_package_graph())
        .with_env(capture.env())
        .with_options(fast_options())
        .add_task(build.definition())
        .add_task(deploy.definition())
        .add_dep(("B", build.name.as_str()), ("A", deploy.name.as_str()))
        .unwrap();

    let targets = Targets::all().packages(["A"]).tasks([deploy.name.clone()]);
    let edges = pipeline.task_graph(&targets).unwrap();
    assert_eq!(
        edges,
        vec![
            TaskEdge::new(
                format!("B#{}", build.name).parse().unwrap(),
                format!("A#{}", deploy.name).parse().unwrap(),
            ),
            TaskEdge::new("B#".parse().unwrap(), format!("B#{}", build.name).parse().unwrap()),
        ]
    );

    with_timeout(pipeline.go(targets)).await.unwrap();

    assert_eq!(
        tracer.logs(),
        vec![
            build.started("/b"),
            build.finished("/b"),
            deploy.started("/a"),
            deploy.finished("/a"),
        ]
    );
}

#[tokio::test]
async fn priority_decides_among_ready_tasks() {
    init_tracing();
    let tracer = TaskTracer::new();
    let low = tracer.task();
    let high = tracer.task();
    let mid = tracer.task();
    let capture = CapturingEnv::new();

    with_timeout(
        Pipeline::new(single_package_graph())
            .with_env(capture.env())
            .with_options(fast_options().concurrency(1))
            .add_task(low.definition().priority(1))
            .add_task(high.definition().priority(1).package_priority("A", 10))
            .add_task(mid.definition().priority(5))
            .go(Targets::all()),
    )
    .await
    .unwrap();

    assert_eq!(
        tracer.logs(),
        vec![
            high.started("/a"),
            high.finished("/a"),
            mid.started("/a"),
            mid.finished("/a"),
            low.started("/a"),
            low.finished("/a"),
        ]
    );
}

#[tokio::test]
async fn availability_excludes_instances() {
    init_tracing();
    let tracer = TaskTracer::new();
    let task = tracer.task();
    let capture = CapturingEnv::new();

    with_timeout(
        Pipeline::new(two_package_graph())
            .with_env(capture.env())
            .with_options(fast_options())
            .with_availability(|_task, package| package != "B")
            .add_task(task.definition().topo_deps([task.name.clone()]))
            .go(Targets::all()),
    )
    .await
    .unwrap();

    assert_eq!(tracer.logs(), vec![task.started("/a"), task.finished("/a")]);
}

#[tokio::test]
async fn targets_only_runs_are_repeatable() {
    init_tracing();
    let tracer = TaskTracer::new();
    let build = tracer.task();
    let bundle = tracer.task();
    let capture = CapturingEnv::new();

    let pipeline = Pipeline::new(single_package_graph())
        .with_env(capture.env())
        .with_options(fast_options().targets_only(true))
        .add_task(build.definition())
        .add_task(bundle.definition().deps([build.name.clone()]));

    let targets = Targets::all().tasks([bundle.name.clone()]);
    with_timeout(pipeline.go(targets.clone())).await.unwrap();
    with_timeout(pipeline.go(targets)).await.unwrap();

    assert_eq!(tracer.count(&build.started("/a")), 0);
    assert_eq!(tracer.count(&bundle.started("/a")), 2);
    assert_eq!(
        pipeline.tasks().get(&bundle.name).unwrap().deps,
        vec![build.name.clone()]
    );
}
