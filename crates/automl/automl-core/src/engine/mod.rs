//! Engine implementations.
//!
//! - [`SequentialEngine`]: runs each job inline at submission
//! - [`ThreadPoolEngine`]: runs jobs concurrently on a rayon pool

mod pool;
mod sequential;

use std::sync::Arc;

use automl_api::{AutoMLConfig, EvaluationResult};
use automl_spi::{
    AutoMLError, FeatureTable, JobLogger, Objective, ObjectiveScores, Pipeline, Result, Target,
};

use crate::failure::{contain, Failure};
use crate::procedure::{evaluate_pipeline, score_pipeline, train_pipeline};

pub use pool::{PooledComputation, ThreadPoolEngine};
pub use sequential::{SequentialComputation, SequentialEngine};

/// Run a job body, wrapping any failure with its traceback.
pub(crate) fn execute<T>(job: impl FnOnce() -> Result<T>) -> Result<T> {
    contain(job).map_err(|Failure { error, traceback }| AutoMLError::JobFailed {
        source: Box::new(error),
        traceback,
    })
}

pub(crate) fn evaluation_job(
    config: Arc<AutoMLConfig>,
    pipeline: Arc<dyn Pipeline>,
    x: FeatureTable,
    y: Target,
    x_holdout: Option<FeatureTable>,
    y_holdout: Option<Target>,
    logger: JobLogger,
) -> impl FnOnce() -> Result<EvaluationResult> + Send + 'static {
    move || {
        evaluate_pipeline(
            pipeline,
            &config,
            &x,
            &y,
            logger,
            x_holdout.as_ref(),
            y_holdout.as_ref(),
        )
    }
}

/// Holdout data is accepted for symmetry with evaluation jobs but unused.
pub(crate) fn training_job(
    config: Arc<AutoMLConfig>,
    pipeline: Arc<dyn Pipeline>,
    x: FeatureTable,
    y: Target,
) -> impl FnOnce() -> Result<Box<dyn Pipeline>> + Send + 'static {
    move || {
        train_pipeline(pipeline.as_ref(), &x, &y, &config, true, false).map(|(fitted, _)| fitted)
    }
}

pub(crate) fn scoring_job(
    config: Arc<AutoMLConfig>,
    pipeline: Arc<dyn Pipeline>,
    x: FeatureTable,
    y: Target,
    objectives: Vec<Arc<dyn Objective>>,
    x_train: Option<FeatureTable>,
    y_train: Option<Target>,
) -> impl FnOnce() -> Result<ObjectiveScores> + Send + 'static {
    move || {
        score_pipeline(
            pipeline.as_ref(),
            &x,
            &y,
            &objectives,
            x_train.as_ref(),
            y_train.as_ref(),
            config.x_schema.as_ref(),
            config.y_schema.as_ref(),
        )
    }
}
