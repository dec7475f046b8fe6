// src/logging.rs

//! Diagnostic logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. the level passed by the embedding program (if any)
//! 2. `TASK_SCHEDULER_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`
//!
//! Diagnostics go to STDERR. Task results (`Done` / `Failed` blocks) are not
//! diagnostics; they flow through [`crate::engine::Logger`].

use anyhow::{Result, anyhow};
use tracing_subscriber::fmt;

use crate::types::LogLevel;

/// Environment variable consulted when no explicit level is given.
pub const LOG_ENV_VAR: &str = "TASK_SCHEDULER_LOG";

/// Initialise the global logging subscriber.
///
/// Returns an error if a global subscriber has already been installed.
pub fn init_logging(level: Option<LogLevel>) -> Result<()> {
    let level = resolve_level(level, std::env::var(LOG_ENV_VAR).ok().as_deref());

    fmt()
        .with_max_level(tracing::Level::from(level))
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing tracing subscriber: {e}"))?;

    Ok(())
}

/// Pick the effective level from an explicit choice and the raw env value.
pub fn resolve_level(explicit: Option<LogLevel>, env_value: Option<&str>) -> LogLevel {
    explicit
        .or_else(|| env_value.and_then(|s| s.parse().ok()))
        .unwrap_or_default()
}
