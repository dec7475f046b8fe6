//! Shared fixtures for the `task-scheduler` integration tests.
//!
//! - [`builders`]: package graph fixtures.
//! - [`env`]: a `PipelineEnv` whose logger lines and exit codes can be read
//!   back after a run.
//! - [`tracer`]: task callbacks that record when they were called and when
//!   they finished, per package directory.

pub mod builders;
pub mod env;
pub mod tracer;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Upper bound for a single pipeline run in tests. A run that outlives it
/// almost always means the executor stopped releasing nodes.
pub const RUN_TIMEOUT: Duration = Duration::from_secs(5);

/// Route scheduler diagnostics into the test harness's captured output.
///
/// Filter with `RUST_LOG`, e.g. `RUST_LOG=task_scheduler=debug` to see
/// graph expansion and scheduling decisions; defaults to `info`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Await `f`, failing the test if it takes longer than [`RUN_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(RUN_TIMEOUT, f).await {
        Ok(value) => value,
        Err(_) => panic!("run did not finish within {RUN_TIMEOUT:?}"),
    }
}
