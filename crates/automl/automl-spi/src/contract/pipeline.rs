//! Pipeline contract.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::AutoMLError;
use crate::model::{FeatureTable, ObjectiveScores, ProblemType, Target, Value};
use crate::Result;

use super::Objective;

/// A fitted sub-component of a pipeline (transformer or estimator).
pub trait Component: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Enable downcasting to concrete component types.
    fn as_any(&self) -> &dyn Any;
}

/// Fitted components of a pipeline keyed by component name.
pub type ComponentInstances = BTreeMap<String, Arc<dyn Component>>;

/// A cloneable, fittable, scorable sequence of transform/estimate steps.
///
/// Evaluation never fits the instance it is handed: it works on clones
/// obtained through [`Pipeline::clone_pipeline`].
pub trait Pipeline: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn problem_type(&self) -> ProblemType;

    /// Seed used for any randomness inside the pipeline, including the
    /// threshold-tuning resplit.
    fn random_seed(&self) -> u64 {
        0
    }

    /// Unfitted copy with the same parameters.
    fn clone_pipeline(&self) -> Box<dyn Pipeline>;

    fn fit(&mut self, x: &FeatureTable, y: &Target) -> Result<()>;

    fn predict(&self, x: &FeatureTable) -> Result<Vec<Value>>;

    /// Positive-class probabilities (binary problems).
    fn predict_proba(&self, _x: &FeatureTable) -> Result<Vec<f64>> {
        Err(AutoMLError::PredictionError(format!(
            "pipeline '{}' does not produce probabilities",
            self.name()
        )))
    }

    /// Score with every objective, in order.
    ///
    /// Returns [`AutoMLError::PipelineScore`] when only some objectives
    /// failed. `x_train`/`y_train` give time-series pipelines their lookback.
    fn score(
        &self,
        x: &FeatureTable,
        y: &Target,
        objectives: &[Arc<dyn Objective>],
        x_train: Option<&FeatureTable>,
        y_train: Option<&Target>,
    ) -> Result<ObjectiveScores>;

    /// Decision threshold for binary classification, if set.
    fn threshold(&self) -> Option<f64> {
        None
    }

    fn set_threshold(&mut self, _threshold: Option<f64>) {}

    fn can_tune_threshold_with_objective(&self, objective: &dyn Objective) -> bool {
        self.problem_type().is_binary() && objective.can_optimize_threshold()
    }

    /// Tune the decision threshold on `(x, y)` for `objective`.
    fn optimize_threshold(
        &mut self,
        _x: &FeatureTable,
        _y: &Target,
        objective: &dyn Objective,
    ) -> Result<()> {
        Err(AutoMLError::ThresholdTuning(format!(
            "pipeline '{}' cannot tune its threshold for '{}'",
            self.name(),
            objective.name()
        )))
    }

    /// Fitted sub-components, for reuse across folds with identical rows.
    fn component_instances(&self) -> ComponentInstances {
        ComponentInstances::new()
    }
}
