//! Error module containing AutoML error types.
//!
//! This module defines the error kinds raised by pipeline training,
//! scoring and evaluation, including the partial scoring failure.

mod automl_error;
mod pipeline_score_error;

pub use automl_error::AutoMLError;
pub use pipeline_score_error::PipelineScoreError;
