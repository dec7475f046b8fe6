// src/output.rs

//! Human-readable rendering of task results.
//!
//! A task with captured output is reported as a bracketed block:
//!
//! ```text
//!  / Done build in app
//!  | STDOUT
//!  |  | compiled 3 files
//!  \ Done build in app
//! ```
//!
//! A task without output gets a single `Done build in app` line.

use crate::engine::Logger;
use crate::exec::TaskResult;
use crate::types::Outcome;

/// Prefix put in front of every line of captured output.
pub const LINE_PREFIX: &str = " | ";

/// Prefix each non-empty line of `message` with `prefix`.
pub fn prefix_lines(message: &str, prefix: &str) -> String {
    let body = message
        .lines()
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(&format!("\n{prefix}"));
    format!("{prefix}{body}")
}

/// Render stdout and stderr under `STDOUT` / `STDERR` headers. Empty streams
/// contribute nothing, so a task with no output yields an empty string.
pub fn format_output(result: &TaskResult) -> String {
    let mut message = String::new();
    for (header, stream) in [("STDOUT", &result.stdout), ("STDERR", &result.stderr)] {
        if !stream.is_empty() {
            message.push_str(header);
            message.push('\n');
            message.push_str(&prefix_lines(stream, LINE_PREFIX));
            message.push('\n');
        }
    }
    message
}

/// Send a task's result to the logger: successes on `log`, failures on
/// `error`.
pub fn output_result(message: &str, package: &str, task: &str, outcome: Outcome, logger: &dyn Logger) {
    let emit = |line: &str| match outcome {
        Outcome::Success => logger.log(line),
        Outcome::Failure => logger.error(line),
    };
    let header = format!("{outcome} {task} in {package}");

    if message.is_empty() {
        emit(&format!("{header}\n"));
    } else {
        emit(&format!(" / {header}"));
        emit(&prefix_lines(message, LINE_PREFIX));
        emit(&format!(" \\ {header}\n"));
    }
}
