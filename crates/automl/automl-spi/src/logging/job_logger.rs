//! Deferred per-job log buffer.

use serde::{Deserialize, Serialize};

use crate::contract::Logger;

/// Severity of a buffered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// Records log messages during a job instead of emitting them.
///
/// Jobs running concurrently would otherwise interleave their output; the
/// buffer is written to a real logger once the job has finished so that all
/// of a job's messages appear together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobLogger {
    logs: Vec<(LogLevel, String)>,
}

impl JobLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffered entries in call order.
    pub fn logs(&self) -> &[(LogLevel, String)] {
        &self.logs
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    /// Drain every buffered message into `logger`, first in, first out.
    ///
    /// Buffered errors are written as warnings.
    pub fn write_to_logger(&mut self, logger: &mut dyn Logger) {
        for (level, message) in self.logs.drain(..) {
            match level {
                LogLevel::Debug => logger.debug(&message),
                LogLevel::Info => logger.info(&message),
                LogLevel::Warning | LogLevel::Error => logger.warning(&message),
            }
        }
    }

    fn push(&mut self, level: LogLevel, message: &str) {
        self.logs.push((level, message.to_string()));
    }
}

impl Logger for JobLogger {
    fn debug(&mut self, message: &str) {
        self.push(LogLevel::Debug, message);
    }

    fn info(&mut self, message: &str) {
        self.push(LogLevel::Info, message);
    }

    fn warning(&mut self, message: &str) {
        self.push(LogLevel::Warning, message);
    }

    fn error(&mut self, message: &str) {
        self.push(LogLevel::Error, message);
    }
}
