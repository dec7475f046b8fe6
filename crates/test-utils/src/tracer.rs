use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use task_scheduler::task::TaskDefinition;

/// What a traced task does when run.
#[derive(Debug, Clone)]
pub struct Behaviour {
    /// `Ok(success)` to resolve, `Err(message)` to fail with an error.
    pub result: Result<bool, String>,
    pub stdout: String,
    pub stderr: String,
    pub delay: Duration,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            result: Ok(true),
            stdout: String::new(),
            stderr: String::new(),
            delay: Duration::from_millis(50),
        }
    }
}

impl Behaviour {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            result: Ok(false),
            ..Self::default()
        }
    }

    pub fn erroring(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            ..Self::default()
        }
    }

    pub fn stdout(mut self, s: &str) -> Self {
        self.stdout = s.to_string();
        self
    }

    pub fn stderr(mut self, s: &str) -> Self {
        self.stderr = s.to_string();
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Shared log of `called <task> for <cwd>` / `finished <task> for <cwd>`
/// lines written by traced tasks, in the order they happened.
#[derive(Debug, Clone, Default)]
pub struct TaskTracer {
    logs: Arc<Mutex<Vec<String>>>,
    counter: Arc<AtomicUsize>,
}

impl TaskTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracer that appends its lines to `logs`, e.g. a capturing logger's
    /// list, so callback events and result blocks share one timeline.
    pub fn with_log(logs: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            logs,
            counter: Arc::default(),
        }
    }

    pub fn task(&self) -> TracedTask {
        self.task_with(Behaviour::default())
    }

    pub fn task_with(&self, behaviour: Behaviour) -> TracedTask {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        TracedTask {
            name: format!("task_{n}"),
            behaviour,
            logs: Arc::clone(&self.logs),
        }
    }

    pub fn logs(&self) -> Vec<String> {
        self.logs.lock().unwrap().clone()
    }

    /// Log lines mentioning `needle`.
    pub fn logs_containing(&self, needle: &str) -> Vec<String> {
        self.logs()
            .into_iter()
            .filter(|l| l.contains(needle))
            .collect()
    }

    /// How many times `line` was logged.
    pub fn count(&self, line: &str) -> usize {
        self.logs().iter().filter(|l| *l == line).count()
    }
}

/// A task whose run callback records start/finish lines.
#[derive(Debug, Clone)]
pub struct TracedTask {
    pub name: String,
    behaviour: Behaviour,
    logs: Arc<Mutex<Vec<String>>>,
}

impl TracedTask {
    pub fn started(&self, cwd: &str) -> String {
        format!("called {} for {}", self.name, cwd)
    }

    pub fn finished(&self, cwd: &str) -> String {
        format!("finished {} for {}", self.name, cwd)
    }

    /// A fresh definition for this task, ready for further configuration.
    pub fn definition(&self) -> TaskDefinition {
        let name = self.name.clone();
        let behaviour = self.behaviour.clone();
        let logs = Arc::clone(&self.logs);

        TaskDefinition::new(self.name.clone(), move |ctx| {
            let name = name.clone();
            let behaviour = behaviour.clone();
            let logs = Arc::clone(&logs);
            async move {
                let cwd = ctx.cwd.to_string_lossy().replace('\\', "/");
                logs.lock().unwrap().push(format!("called {name} for {cwd}"));
                ctx.stdout.write_str(&behaviour.stdout);
                ctx.stderr.write_str(&behaviour.stderr);
                tokio::time::sleep(behaviour.delay).await;
                logs.lock().unwrap().push(format!("finished {name} for {cwd}"));
                match behaviour.result {
                    Ok(success) => anyhow::Ok(success),
                    Err(message) => Err(anyhow!(message)),
                }
            }
        })
    }
}
