//! Logging capability shared by real loggers and buffered job loggers.

/// Severity-based logging sink.
///
/// Procedures only ever log through this trait, so the same code can write
/// to a live backend or to a per-job buffer that is flushed later.
pub trait Logger: Send {
    fn debug(&mut self, message: &str);

    fn info(&mut self, message: &str);

    fn warning(&mut self, message: &str);

    fn error(&mut self, message: &str);
}

impl<L: Logger + ?Sized> Logger for &mut L {
    fn debug(&mut self, message: &str) {
        (**self).debug(message);
    }

    fn info(&mut self, message: &str) {
        (**self).info(message);
    }

    fn warning(&mut self, message: &str) {
        (**self).warning(message);
    }

    fn error(&mut self, message: &str) {
        (**self).error(message);
    }
}
