//! Ready-made error callbacks.
//!
//! Each matches the [`automl_api::ErrorCallback`] signature; wrap one in an
//! `Arc` to install it:
//!
//! ```rust,ignore
//! let config = AutoMLConfigBuilder::new(problem_type, objective, splitter)
//!     .error_callback(Arc::new(log_error_callback))
//!     .build()?;
//! ```

use automl_api::AutoMLConfig;
use automl_spi::{AutoMLError, Pipeline, Result};

fn describe_fold(fold_num: Option<usize>) -> String {
    match fold_num {
        Some(fold) => format!("fold {fold}"),
        None => "holdout pass".to_string(),
    }
}

/// Ignore the failure; the fold is still recorded with NaN scores.
pub fn silent_error_callback(
    _error: &AutoMLError,
    _traceback: &[String],
    _config: &AutoMLConfig,
    _fold_num: Option<usize>,
    _pipeline: &dyn Pipeline,
) -> Result<()> {
    Ok(())
}

/// Log the failure and its trace, then keep evaluating.
pub fn log_error_callback(
    error: &AutoMLError,
    traceback: &[String],
    _config: &AutoMLConfig,
    fold_num: Option<usize>,
    pipeline: &dyn Pipeline,
) -> Result<()> {
    tracing::error!(
        target: "automl",
        pipeline = pipeline.name(),
        "Exception during automl search ({}): {}",
        describe_fold(fold_num),
        error
    );
    if !traceback.is_empty() {
        tracing::debug!(target: "automl", "Traceback:\n{}", traceback.join("\n"));
    }
    Ok(())
}

/// Log the failure, then abort the evaluation.
pub fn raise_error_callback(
    error: &AutoMLError,
    traceback: &[String],
    _config: &AutoMLConfig,
    fold_num: Option<usize>,
    pipeline: &dyn Pipeline,
) -> Result<()> {
    tracing::info!(
        target: "automl",
        pipeline = pipeline.name(),
        "AutoML search raised a fatal exception: {}",
        error
    );
    if !traceback.is_empty() {
        tracing::info!(target: "automl", "{}", traceback.join("\n"));
    }
    Err(AutoMLError::Callback(format!(
        "{} of '{}' failed: {}",
        describe_fold(fold_num),
        pipeline.name(),
        error
    )))
}
