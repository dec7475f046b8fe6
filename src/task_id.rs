// src/task_id.rs

//! Encoding of `(package, task)` pairs into a single key.
//!
//! A [`TaskId`] is `package#task`. The delimiter `#` is reserved: it must not
//! appear in package or task names. The form `package#` (empty task name) is
//! the *sentinel* id for a package, meaning "no prerequisite".

use std::fmt;
use std::str::FromStr;

use crate::errors::{Result, SchedulerError};

/// Reserved separator between package and task name.
pub const DELIMITER: char = '#';

/// Opaque key for one task instance (a task name inside one package).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(String);

impl TaskId {
    /// Encode a package/task pair. Names must not contain [`DELIMITER`].
    pub fn new(package: &str, task: &str) -> Self {
        debug_assert!(!package.contains(DELIMITER), "package name contains '#'");
        debug_assert!(!task.contains(DELIMITER), "task name contains '#'");
        Self(format!("{package}{DELIMITER}{task}"))
    }

    /// Like [`TaskId::new`], but rejects names containing the delimiter.
    pub fn try_new(package: &str, task: &str) -> Result<Self> {
        check_name(package)?;
        check_name(task)?;
        Ok(Self::new(package, task))
    }

    /// The "always satisfied" id for `package`.
    pub fn sentinel(package: &str) -> Self {
        Self::new(package, "")
    }

    pub fn package(&self) -> &str {
        self.parts().0
    }

    pub fn task(&self) -> &str {
        self.parts().1
    }

    /// Split back into `(package, task)` on the first delimiter.
    pub fn parts(&self) -> (&str, &str) {
        decode(&self.0)
    }

    pub fn is_sentinel(&self) -> bool {
        self.task().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TaskId {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(DELIMITER) {
            Some((package, task)) => TaskId::try_new(package, task),
            None => Err(SchedulerError::InvalidName {
                name: s.to_string(),
                reason: format!("task id must have the form package{DELIMITER}task"),
            }),
        }
    }
}

/// Free-function form of [`TaskId::new`].
pub fn encode(package: &str, task: &str) -> TaskId {
    TaskId::new(package, task)
}

/// Split an encoded id on the first delimiter.
///
/// A string without the delimiter decodes to `(id, "")`.
pub fn decode(id: &str) -> (&str, &str) {
    id.split_once(DELIMITER).unwrap_or((id, ""))
}

fn check_name(name: &str) -> Result<()> {
    if name.contains(DELIMITER) {
        return Err(SchedulerError::InvalidName {
            name: name.to_string(),
            reason: format!("'{DELIMITER}' is reserved as the task id delimiter"),
        });
    }
    Ok(())
}
