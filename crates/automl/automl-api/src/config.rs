//! Evaluation configuration.

use std::fmt;
use std::sync::Arc;

use automl_spi::{
    AutoMLError, ColumnSchema, DataSplitter, Objective, Pipeline, ProblemType, Result,
    TableSchema,
};

/// Called once for every fold (or holdout pass) whose training or scoring failed.
///
/// Receives the error, the formatted stack trace, the configuration, the fold
/// number (`None` for the holdout pass) and the pipeline template. An error
/// returned from the callback aborts the evaluation.
pub type ErrorCallback = Arc<
    dyn Fn(&AutoMLError, &[String], &AutoMLConfig, Option<usize>, &dyn Pipeline) -> Result<()>
        + Send
        + Sync,
>;

/// Immutable configuration shared by every evaluation in a search.
#[derive(Clone)]
pub struct AutoMLConfig {
    /// Produces the folds to evaluate on.
    pub data_splitter: Arc<dyn DataSplitter>,
    pub problem_type: ProblemType,
    /// Primary objective; its score is the fold's mean CV score.
    pub objective: Arc<dyn Objective>,
    pub additional_objectives: Vec<Arc<dyn Objective>>,
    /// Used for threshold tuning when the primary objective scores probabilities.
    pub alternate_thresholding_objective: Option<Arc<dyn Objective>>,
    pub optimize_thresholds: bool,
    /// Carve a dedicated tuning slice out of the training rows before fitting.
    pub threshold_tuning_resplit: bool,
    pub error_callback: Option<ErrorCallback>,
    pub random_seed: u64,
    pub x_schema: Option<TableSchema>,
    pub y_schema: Option<ColumnSchema>,
}

impl AutoMLConfig {
    /// Primary objective followed by the additional objectives.
    pub fn objectives_to_score(&self) -> Vec<Arc<dyn Objective>> {
        std::iter::once(Arc::clone(&self.objective))
            .chain(self.additional_objectives.iter().cloned())
            .collect()
    }

    pub fn objective_name(&self) -> &str {
        self.objective.name()
    }
}

impl fmt::Debug for AutoMLConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoMLConfig")
            .field("data_splitter", &self.data_splitter)
            .field("problem_type", &self.problem_type)
            .field("objective", &self.objective.name())
            .field(
                "additional_objectives",
                &self
                    .additional_objectives
                    .iter()
                    .map(|o| o.name())
                    .collect::<Vec<_>>(),
            )
            .field(
                "alternate_thresholding_objective",
                &self.alternate_thresholding_objective.as_ref().map(|o| o.name()),
            )
            .field("optimize_thresholds", &self.optimize_thresholds)
            .field("threshold_tuning_resplit", &self.threshold_tuning_resplit)
            .field("error_callback", &self.error_callback.is_some())
            .field("random_seed", &self.random_seed)
            .field("x_schema", &self.x_schema)
            .field("y_schema", &self.y_schema)
            .finish()
    }
}
