// src/task/sink.rs

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

/// Cloneable in-memory byte buffer handed to a task as its stdout or stderr.
///
/// All clones share one buffer, so writes from helper tasks spawned by a
/// run callback land in the same place as the callback's own writes.
#[derive(Debug, Clone, Default)]
pub struct OutputSink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl OutputSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_str(&self, s: &str) {
        self.write_bytes(s.as_bytes());
    }

    /// Write `line` followed by a newline.
    pub fn write_line(&self, line: &str) {
        let mut buf = self.lock();
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
    }

    pub fn write_bytes(&self, bytes: &[u8]) {
        self.lock().extend_from_slice(bytes);
    }

    /// Everything written so far, decoded lossily as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<u8>> {
        self.buf.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl io::Write for OutputSink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.write_bytes(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
