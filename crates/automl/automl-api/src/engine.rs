//! Engine contract.

use std::sync::Arc;

use automl_spi::{
    EngineComputation, FeatureTable, JobLogger, Objective, ObjectiveScores, Pipeline, Target,
};

use crate::{AutoMLConfig, EvaluationResult};

/// Handle returned for an evaluation job.
pub type EvaluationComputation = Box<dyn EngineComputation<Output = EvaluationResult>>;
/// Handle returned for a training job; resolves to the fitted pipeline.
pub type TrainingComputation = Box<dyn EngineComputation<Output = Box<dyn Pipeline>>>;
/// Handle returned for a scoring job.
pub type ScoringComputation = Box<dyn EngineComputation<Output = ObjectiveScores>>;

/// Submits evaluation, training and scoring work and hands back computation handles.
///
/// Implementations choose how jobs run (inline, on a worker pool, remotely).
/// Each job gets its own pipeline clone and its own [`JobLogger`].
pub trait Engine: Send + Sync {
    /// Fresh logger for one job.
    fn setup_job_log(&self) -> JobLogger {
        JobLogger::new()
    }

    /// Cross-validate `pipeline` on `(x, y)`, plus a holdout pass when both
    /// holdout parts are given.
    fn submit_evaluation_job(
        &self,
        config: Arc<AutoMLConfig>,
        pipeline: Arc<dyn Pipeline>,
        x: FeatureTable,
        y: Target,
        x_holdout: Option<FeatureTable>,
        y_holdout: Option<Target>,
    ) -> EvaluationComputation;

    /// Fit a clone of `pipeline` on `(x, y)`, tuning its threshold when applicable.
    fn submit_training_job(
        &self,
        config: Arc<AutoMLConfig>,
        pipeline: Arc<dyn Pipeline>,
        x: FeatureTable,
        y: Target,
        x_holdout: Option<FeatureTable>,
        y_holdout: Option<Target>,
    ) -> TrainingComputation;

    /// Score an already fitted `pipeline` on `(x, y)`.
    #[allow(clippy::too_many_arguments)]
    fn submit_scoring_job(
        &self,
        config: Arc<AutoMLConfig>,
        pipeline: Arc<dyn Pipeline>,
        x: FeatureTable,
        y: Target,
        objectives: Vec<Arc<dyn Objective>>,
        x_train: Option<FeatureTable>,
        y_train: Option<Target>,
    ) -> ScoringComputation;
}
