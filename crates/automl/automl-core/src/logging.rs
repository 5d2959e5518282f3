//! `tracing` backend for the [`Logger`] capability.

use automl_spi::Logger;

/// Writes every message as a `tracing` event under the `automl` target.
///
/// Flush a finished job's [`automl_spi::JobLogger`] into this to get its
/// messages into the process log in one contiguous block.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn debug(&mut self, message: &str) {
        tracing::debug!(target: "automl", "{}", message);
    }

    fn info(&mut self, message: &str) {
        tracing::info!(target: "automl", "{}", message);
    }

    fn warning(&mut self, message: &str) {
        tracing::warn!(target: "automl", "{}", message);
    }

    fn error(&mut self, message: &str) {
        tracing::error!(target: "automl", "{}", message);
    }
}
