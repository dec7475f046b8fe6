#![allow(dead_code, unused_imports)]

pub use task_scheduler_test_utils::builders::{
    PackageGraphBuilder, single_package_graph, two_package_graph,
};
pub use task_scheduler_test_utils::env::CapturingEnv;
pub use task_scheduler_test_utils::tracer::{Behaviour, TaskTracer, TracedTask};
pub use task_scheduler_test_utils::{init_tracing, with_timeout};

use std::time::Duration;

use task_scheduler::engine::PipelineOptions;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Default options with the output grace shortened so tests stay quick.
pub fn fast_options() -> PipelineOptions {
    PipelineOptions::default().output_grace(Duration::from_millis(5))
}
