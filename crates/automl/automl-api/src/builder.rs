//! Configuration builder.

use std::collections::HashSet;
use std::sync::Arc;

use automl_spi::{
    AutoMLError, ColumnSchema, DataSplitter, Objective, ProblemType, Result, TableSchema,
};

use crate::{AutoMLConfig, ErrorCallback};

/// Builder for [`AutoMLConfig`].
#[derive(Clone)]
pub struct AutoMLConfigBuilder {
    config: AutoMLConfig,
}

impl AutoMLConfigBuilder {
    pub fn new(
        problem_type: ProblemType,
        objective: Arc<dyn Objective>,
        data_splitter: Arc<dyn DataSplitter>,
    ) -> Self {
        Self {
            config: AutoMLConfig {
                data_splitter,
                problem_type,
                objective,
                additional_objectives: Vec::new(),
                alternate_thresholding_objective: None,
                optimize_thresholds: true,
                threshold_tuning_resplit: true,
                error_callback: None,
                random_seed: 0,
                x_schema: None,
                y_schema: None,
            },
        }
    }

    // ========== Objective Methods ==========

    /// Add an objective scored alongside the primary one.
    pub fn additional_objective(mut self, objective: Arc<dyn Objective>) -> Self {
        self.config.additional_objectives.push(objective);
        self
    }

    /// Replace the additional objectives.
    pub fn additional_objectives(mut self, objectives: Vec<Arc<dyn Objective>>) -> Self {
        self.config.additional_objectives = objectives;
        self
    }

    pub fn alternate_thresholding_objective(mut self, objective: Arc<dyn Objective>) -> Self {
        self.config.alternate_thresholding_objective = Some(objective);
        self
    }

    // ========== Configuration Methods ==========

    pub fn optimize_thresholds(mut self, enabled: bool) -> Self {
        self.config.optimize_thresholds = enabled;
        self
    }

    pub fn threshold_tuning_resplit(mut self, enabled: bool) -> Self {
        self.config.threshold_tuning_resplit = enabled;
        self
    }

    pub fn error_callback(mut self, callback: ErrorCallback) -> Self {
        self.config.error_callback = Some(callback);
        self
    }

    pub fn random_seed(mut self, seed: u64) -> Self {
        self.config.random_seed = seed;
        self
    }

    pub fn x_schema(mut self, schema: TableSchema) -> Self {
        self.config.x_schema = Some(schema);
        self
    }

    pub fn y_schema(mut self, schema: ColumnSchema) -> Self {
        self.config.y_schema = Some(schema);
        self
    }

    /// Validate and build the configuration.
    ///
    /// Objective names must be unique across the primary and additional
    /// objectives, since they key the score mappings.
    pub fn build(self) -> Result<AutoMLConfig> {
        let mut seen = HashSet::new();
        for objective in self.config.objectives_to_score() {
            if !seen.insert(objective.name().to_string()) {
                return Err(AutoMLError::InvalidConfig(format!(
                    "objective '{}' is listed more than once",
                    objective.name()
                )));
            }
        }
        if self.config.data_splitter.n_splits() == 0 {
            return Err(AutoMLError::InvalidConfig(
                "data splitter must produce at least one split".to_string(),
            ));
        }
        Ok(self.config)
    }
}
