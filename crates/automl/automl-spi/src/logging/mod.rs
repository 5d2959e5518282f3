//! Logging module containing the deferred job logger.

mod job_logger;

pub use job_logger::{JobLogger, LogLevel};
