//! Inline engine.

use std::sync::Arc;

use automl_api::{
    AutoMLConfig, Engine, EvaluationComputation, ScoringComputation, TrainingComputation,
};
use automl_spi::{EngineComputation, FeatureTable, Objective, Pipeline, Result, Target};

use super::{evaluation_job, execute, scoring_job, training_job};

/// Result of a job that already ran.
#[derive(Debug)]
pub struct SequentialComputation<T> {
    result: Result<T>,
}

impl<T> SequentialComputation<T> {
    pub fn new(result: Result<T>) -> Self {
        Self { result }
    }
}

impl<T: Send> EngineComputation for SequentialComputation<T> {
    type Output = T;

    fn get_result(self: Box<Self>) -> Result<T> {
        self.result
    }

    fn done(&self) -> bool {
        true
    }

    /// Nothing left to cancel.
    fn cancel(&self) {}
}

/// Runs every job on the calling thread as soon as it is submitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialEngine;

impl SequentialEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Engine for SequentialEngine {
    fn submit_evaluation_job(
        &self,
        config: Arc<AutoMLConfig>,
        pipeline: Arc<dyn Pipeline>,
        x: FeatureTable,
        y: Target,
        x_holdout: Option<FeatureTable>,
        y_holdout: Option<Target>,
    ) -> EvaluationComputation {
        tracing::debug!(target: "automl", pipeline = pipeline.name(), "running evaluation job");
        let logger = self.setup_job_log();
        let job = evaluation_job(config, pipeline, x, y, x_holdout, y_holdout, logger);
        Box::new(SequentialComputation::new(execute(job)))
    }

    fn submit_training_job(
        &self,
        config: Arc<AutoMLConfig>,
        pipeline: Arc<dyn Pipeline>,
        x: FeatureTable,
        y: Target,
        _x_holdout: Option<FeatureTable>,
        _y_holdout: Option<Target>,
    ) -> TrainingComputation {
        tracing::debug!(target: "automl", pipeline = pipeline.name(), "running training job");
        let job = training_job(config, pipeline, x, y);
        Box::new(SequentialComputation::new(execute(job)))
    }

    fn submit_scoring_job(
        &self,
        config: Arc<AutoMLConfig>,
        pipeline: Arc<dyn Pipeline>,
        x: FeatureTable,
        y: Target,
        objectives: Vec<Arc<dyn Objective>>,
        x_train: Option<FeatureTable>,
        y_train: Option<Target>,
    ) -> ScoringComputation {
        tracing::debug!(target: "automl", pipeline = pipeline.name(), "running scoring job");
        let job = scoring_job(config, pipeline, x, y, objectives, x_train, y_train);
        Box::new(SequentialComputation::new(execute(job)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use automl_spi::{AutoMLError, ProblemType};

    use crate::objective::{MeanSquaredError, R2};
    use crate::splitter::KFold;
    use crate::testing::{build, config_for, Fault, MockPipeline};

    fn config() -> Arc<AutoMLConfig> {
        Arc::new(build(config_for(
            ProblemType::Regression,
            Arc::new(R2),
            Arc::new(KFold::new(2)),
        )))
    }

    fn data() -> (FeatureTable, Target) {
        (FeatureTable::empty(6), Target::from_f64(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]))
    }

    #[test]
    fn test_evaluation_job() {
        let (x, y) = data();
        let pipeline: Arc<dyn Pipeline> = Arc::new(MockPipeline::new(ProblemType::Regression));
        let computation =
            SequentialEngine::new().submit_evaluation_job(config(), pipeline, x, y, None, None);
        assert!(computation.done());
        computation.cancel();
        let result = computation.get_result().unwrap();
        assert_eq!(result.scores.cv_data.len(), 2);
        assert!(!result.logger.is_empty());
    }

    #[test]
    fn test_training_job_returns_fitted_clone() {
        let (x, y) = data();
        let template = MockPipeline::new(ProblemType::Regression);
        let pipeline: Arc<dyn Pipeline> = Arc::new(template.clone());
        let fitted = SequentialEngine::new()
            .submit_training_job(config(), pipeline, x, y, None, None)
            .get_result()
            .unwrap();
        assert!(!fitted.component_instances().is_empty());
        assert_eq!(template.journal(), vec!["fit:6"]);
    }

    #[test]
    fn test_training_failure_is_wrapped() {
        let (x, y) = data();
        let pipeline: Arc<dyn Pipeline> =
            Arc::new(MockPipeline::new(ProblemType::Regression).with_fault(Fault::Fit, None));
        let err = SequentialEngine::new()
            .submit_training_job(config(), pipeline, x, y, None, None)
            .get_result()
            .unwrap_err();
        assert!(matches!(err, AutoMLError::JobFailed { .. }));
        assert!(matches!(err.root_cause(), AutoMLError::FitError(_)));
    }

    #[test]
    fn test_scoring_job() {
        let (x, y) = data();
        let mut fitted = MockPipeline::new(ProblemType::Regression).with_score(0.25);
        fitted.fit(&x, &y).unwrap();
        let pipeline: Arc<dyn Pipeline> = Arc::new(fitted);
        let objectives: Vec<Arc<dyn Objective>> = vec![Arc::new(MeanSquaredError)];
        let scores = SequentialEngine::new()
            .submit_scoring_job(config(), pipeline, x, y, objectives, None, None)
            .get_result()
            .unwrap();
        assert_eq!(scores.get("MSE"), Some(0.25));
    }
}
