//! Serializable evaluation settings.

use serde::{Deserialize, Serialize};

use automl_spi::{ColumnSchema, ProblemType, Result, TableSchema};

/// How the training data is split into folds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SplitStrategy {
    /// Pick the splitter from the problem type.
    Auto { n_splits: usize },
    KFold { n_splits: usize, shuffle: bool },
    StratifiedKFold { n_splits: usize, shuffle: bool },
    TrainingValidation {
        test_size: f64,
        shuffle: bool,
        stratify: bool,
    },
    TimeSeries { n_splits: usize, gap: usize },
}

impl Default for SplitStrategy {
    fn default() -> Self {
        SplitStrategy::Auto { n_splits: 3 }
    }
}

/// Evaluation settings that can be stored as JSON.
///
/// Objectives are referenced by name and resolved when the settings are
/// turned into an `AutoMLConfig`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoMLSettings {
    pub problem_type: ProblemType,
    /// Primary objective; the problem type's default when absent.
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default)]
    pub additional_objectives: Vec<String>,
    #[serde(default)]
    pub alternate_thresholding_objective: Option<String>,
    #[serde(default = "default_true")]
    pub optimize_thresholds: bool,
    #[serde(default = "default_true")]
    pub threshold_tuning_resplit: bool,
    #[serde(default)]
    pub data_splitter: SplitStrategy,
    #[serde(default)]
    pub random_seed: u64,
    #[serde(default)]
    pub x_schema: Option<TableSchema>,
    #[serde(default)]
    pub y_schema: Option<ColumnSchema>,
}

fn default_true() -> bool {
    true
}

impl AutoMLSettings {
    /// Settings with defaults for everything but the problem type.
    pub fn new(problem_type: ProblemType) -> Self {
        Self {
            problem_type,
            objective: None,
            additional_objectives: Vec::new(),
            alternate_thresholding_objective: None,
            optimize_thresholds: true,
            threshold_tuning_resplit: true,
            data_splitter: SplitStrategy::default(),
            random_seed: 0,
            x_schema: None,
            y_schema: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn objective(mut self, name: impl Into<String>) -> Self {
        self.objective = Some(name.into());
        self
    }

    pub fn additional_objectives(mut self, names: &[&str]) -> Self {
        self.additional_objectives = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn data_splitter(mut self, strategy: SplitStrategy) -> Self {
        self.data_splitter = strategy;
        self
    }

    pub fn random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn optimize_thresholds(mut self, enabled: bool) -> Self {
        self.optimize_thresholds = enabled;
        self
    }
}
