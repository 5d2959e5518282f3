//! Decision threshold tuning helpers.

use std::sync::Arc;

use automl_api::AutoMLConfig;
use automl_spi::{
    AutoMLError, DataSplitter, FeatureTable, Objective, Pipeline, ProblemType, Result, Target,
};

use crate::splitter::TrainingValidationSplit;

/// Share of the training rows set aside for threshold tuning.
pub const THRESHOLD_TUNING_SIZE: f64 = 0.2;

/// Threshold every binary pipeline starts from.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Training rows split into a fitting part and a threshold-tuning part.
#[derive(Debug, Clone)]
pub struct ResplitData {
    pub x_train: FeatureTable,
    pub x_tuning: FeatureTable,
    pub y_train: Target,
    pub y_tuning: Target,
}

/// Objective to tune the threshold for, and whether the training data
/// must be resplit to get a dedicated tuning slice.
///
/// When the primary objective scores probabilities the threshold is tuned
/// for the alternate thresholding objective instead.
pub fn get_threshold_tuning_info(
    config: &AutoMLConfig,
    pipeline: &dyn Pipeline,
) -> (Arc<dyn Objective>, bool) {
    let mut objective = Arc::clone(&config.objective);
    if config.problem_type.is_binary()
        && config.optimize_thresholds
        && objective.score_needs_proba()
    {
        if let Some(alternate) = &config.alternate_thresholding_objective {
            objective = Arc::clone(alternate);
        }
    }
    let needs_resplit = config.problem_type.is_binary()
        && config.optimize_thresholds
        && config.threshold_tuning_resplit
        && pipeline.can_tune_threshold_with_objective(objective.as_ref());
    (objective, needs_resplit)
}

/// Carve a seeded tuning slice out of `(x, y)`.
///
/// Classification stratifies; time series keeps the last rows for tuning.
pub fn resplit_training_data(
    pipeline: &dyn Pipeline,
    x: &FeatureTable,
    y: &Target,
) -> Result<ResplitData> {
    let problem_type = pipeline.problem_type();
    let mut splitter = TrainingValidationSplit::new(THRESHOLD_TUNING_SIZE);
    if !problem_type.is_time_series() {
        splitter = splitter.shuffled(pipeline.random_seed());
        if problem_type.is_classification() {
            splitter = splitter.stratified();
        }
    }

    let split = splitter
        .split(x, y)?
        .into_iter()
        .next()
        .ok_or_else(|| AutoMLError::InsufficientData {
            required: 2,
            actual: y.len(),
        })?;

    Ok(ResplitData {
        x_train: x.take(&split.train)?,
        x_tuning: x.take(&split.validation)?,
        y_train: y.take(&split.train)?,
        y_tuning: y.take(&split.validation)?,
    })
}

/// Set the starting threshold of a binary pipeline and tune it when asked.
///
/// Tuning uses the dedicated slice when one was carved out, otherwise the
/// data the pipeline was fitted on.
#[allow(clippy::too_many_arguments)]
pub fn tune_binary_threshold(
    pipeline: &mut dyn Pipeline,
    objective: &dyn Objective,
    problem_type: ProblemType,
    optimize_thresholds: bool,
    x_tuning: Option<&FeatureTable>,
    y_tuning: Option<&Target>,
    x: &FeatureTable,
    y: &Target,
) -> Result<()> {
    if !problem_type.is_binary() {
        return Ok(());
    }
    pipeline.set_threshold(Some(DEFAULT_THRESHOLD));
    if !optimize_thresholds || !pipeline.can_tune_threshold_with_objective(objective) {
        return Ok(());
    }
    match (x_tuning, y_tuning) {
        (Some(x_tuning), Some(y_tuning)) => pipeline.optimize_threshold(x_tuning, y_tuning, objective),
        _ => pipeline.optimize_threshold(x, y, objective),
    }
}
