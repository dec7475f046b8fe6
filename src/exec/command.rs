// src/exec/command.rs

//! Shell-command task callback.

use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::task::{OutputSink, TaskContext};

/// Give up on a stream after this many consecutive failed reads.
const MAX_READ_ERRORS: usize = 3;

/// Run `command` through the platform shell in `ctx.cwd`, streaming its
/// stdout/stderr line by line into the task's sinks.
///
/// Output is copied as raw bytes, so non-UTF-8 output is kept (and decoded
/// lossily when the sink is read) instead of cutting the stream short.
///
/// Resolves to `Ok(true)` on a zero exit status and `Ok(false)` otherwise.
/// Failing to spawn or wait on the process is an `Err`.
pub async fn run_command(command: &str, ctx: TaskContext) -> Result<bool> {
    info!(
        package = %ctx.package,
        cwd = %ctx.cwd.display(),
        cmd = %command,
        "starting task process"
    );

    let mut cmd = shell_command(command);
    cmd.current_dir(&ctx.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning `{}` in {}", command, ctx.cwd.display()))?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (status, _, _) = tokio::join!(
        child.wait(),
        pump_output(stdout, ctx.stdout.clone(), "stdout"),
        pump_output(stderr, ctx.stderr.clone(), "stderr"),
    );
    let status = status.with_context(|| format!("waiting for `{}`", command))?;

    debug!(
        package = %ctx.package,
        cmd = %command,
        exit_code = status.code().unwrap_or(-1),
        success = status.success(),
        "task process exited"
    );

    Ok(status.success())
}

/// Build a shell command appropriate for the platform.
fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    }
}

/// Copy `reader` into `sink` until EOF.
///
/// The pipe is kept open until the child closes it; dropping it early would
/// kill the child with SIGPIPE on its next write.
async fn pump_output<R>(reader: Option<R>, sink: OutputSink, stream: &'static str)
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return;
    };
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut errors = 0usize;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                errors = 0;
                sink.write_bytes(&buf);
            }
            Err(err) => {
                sink.write_bytes(&buf);
                errors += 1;
                warn!(stream, error = %err, attempt = errors, "reading task output failed");
                if errors >= MAX_READ_ERRORS {
                    warn!(stream, "giving up on task output stream");
                    break;
                }
            }
        }
    }
}
