use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use task_scheduler::engine::{Logger, PipelineEnv};

use crate::tracer::TaskTracer;

/// Logger that records every line it is given.
///
/// Messages are split on `\n`, so `"Done x in A\n"` records
/// `["Done x in A", ""]`.
#[derive(Debug, Clone)]
pub struct CapturingLogger {
    stdout: Arc<Mutex<Vec<String>>>,
    stderr: Arc<Mutex<Vec<String>>>,
}

impl Logger for CapturingLogger {
    fn log(&self, message: &str) {
        let mut out = self.stdout.lock().unwrap();
        out.extend(message.split('\n').map(str::to_string));
    }

    fn error(&self, message: &str) {
        let mut err = self.stderr.lock().unwrap();
        err.extend(message.split('\n').map(str::to_string));
    }
}

/// Test environment: captured logger output, recorded exit codes, cwd `/`,
/// and a deterministic error formatter.
#[derive(Debug, Clone)]
pub struct CapturingEnv {
    logger: CapturingLogger,
    exit_codes: Arc<Mutex<Vec<i32>>>,
}

impl CapturingEnv {
    pub fn new() -> Self {
        Self::with_streams(Arc::new(Mutex::new(Vec::new())), Arc::new(Mutex::new(Vec::new())))
    }

    /// Both channels write into one shared list, to check interleaving.
    pub fn merged() -> Self {
        let shared = Arc::new(Mutex::new(Vec::new()));
        Self::with_streams(Arc::clone(&shared), shared)
    }

    fn with_streams(stdout: Arc<Mutex<Vec<String>>>, stderr: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            logger: CapturingLogger { stdout, stderr },
            exit_codes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn env(&self) -> PipelineEnv {
        let exit_codes = Arc::clone(&self.exit_codes);
        PipelineEnv::default()
            .with_logger(self.logger.clone())
            .with_cwd(|| PathBuf::from("/"))
            .with_exit(move |code| exit_codes.lock().unwrap().push(code))
            .with_error_formatter(|err| format!("stack trace for following error: {err}"))
    }

    /// A tracer writing into this env's `log` channel, interleaved with
    /// `Done` blocks in the order they happen.
    pub fn tracer(&self) -> TaskTracer {
        TaskTracer::with_log(Arc::clone(&self.logger.stdout))
    }

    pub fn stdout(&self) -> Vec<String> {
        self.logger.stdout.lock().unwrap().clone()
    }

    pub fn stderr(&self) -> Vec<String> {
        self.logger.stderr.lock().unwrap().clone()
    }

    pub fn exit_codes(&self) -> Vec<i32> {
        self.exit_codes.lock().unwrap().clone()
    }
}

impl Default for CapturingEnv {
    fn default() -> Self {
        Self::new()
    }
}
