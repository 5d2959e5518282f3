//! Panic containment and stack trace capture.

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use automl_spi::AutoMLError;

thread_local! {
    /// Number of active [`contain`] scopes on this thread.
    static CONTAINING: Cell<usize> = const { Cell::new(0) };
    /// Trace recorded by the panic hook for the innermost scope.
    static PANIC_TRACE: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
}

static INSTALL_HOOK: Once = Once::new();

/// A failure caught by [`contain`], with the trace of where it was observed.
#[derive(Debug)]
pub struct Failure {
    pub error: AutoMLError,
    pub traceback: Vec<String>,
}

/// Stack trace of the calling context, one frame line per entry.
///
/// Always captured, regardless of `RUST_BACKTRACE`. Empty on platforms
/// without backtrace support.
pub fn capture_traceback() -> Vec<String> {
    render(&Backtrace::force_capture())
}

fn render(backtrace: &Backtrace) -> Vec<String> {
    if backtrace.status() != BacktraceStatus::Captured {
        return Vec::new();
    }
    backtrace.to_string().lines().map(str::to_string).collect()
}

/// Message carried by a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Chain a hook that records the panic-site trace while a scope is active.
///
/// Panics outside any scope reach the previously installed hook unchanged.
fn install_panic_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CONTAINING.with(Cell::get) == 0 {
                previous(info);
                return;
            }
            let trace = capture_traceback();
            PANIC_TRACE.with(|slot| *slot.borrow_mut() = Some(trace));
        }));
    });
}

/// Run `f`, turning both errors and panics into a [`Failure`].
///
/// A panic becomes [`AutoMLError::Panicked`] with the trace taken at the
/// panic site. An error returned by `f` carries the trace of this call.
pub fn contain<T>(f: impl FnOnce() -> automl_spi::Result<T>) -> Result<T, Failure> {
    install_panic_hook();
    CONTAINING.with(|depth| depth.set(depth.get() + 1));
    let outcome = panic::catch_unwind(AssertUnwindSafe(f));
    CONTAINING.with(|depth| depth.set(depth.get() - 1));

    match outcome {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(Failure {
            error,
            traceback: capture_traceback(),
        }),
        Err(payload) => Err(Failure {
            error: AutoMLError::Panicked(panic_message(payload.as_ref())),
            traceback: PANIC_TRACE
                .with(|slot| slot.borrow_mut().take())
                .unwrap_or_default(),
        }),
    }
}
