//! Computation handle contract.

use crate::Result;

/// Handle on a pending or finished unit of engine work.
pub trait EngineComputation: Send {
    type Output;

    /// Block until the work finishes and return its result.
    ///
    /// Failures raised while the work ran are returned here, wrapped in
    /// [`AutoMLError::JobFailed`](crate::AutoMLError::JobFailed) with the
    /// trace captured where the job executed.
    fn get_result(self: Box<Self>) -> Result<Self::Output>;

    /// Whether the work has finished. Never blocks.
    fn done(&self) -> bool;

    /// Request cancellation.
    ///
    /// Advisory: a finished computation ignores it and keeps its result.
    fn cancel(&self);
}
