//! Evaluation result types.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use automl_spi::{ComponentInstances, JobLogger, ObjectiveScores, Pipeline};

/// Key under which a fold's training-set size is recorded.
pub const TRAINING_COUNT_KEY: &str = "# Training";
/// Key under which a fold's validation-set size is recorded.
pub const VALIDATION_COUNT_KEY: &str = "# Validation";

/// Fitted components keyed by the hash of the rows they were trained on.
pub type PipelineCache = HashMap<u64, ComponentInstances>;

/// Result of one fold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationEntry {
    /// Primary objective, additional objectives, then the two row counts.
    pub all_objective_scores: ObjectiveScores,
    /// The fold's primary objective score.
    pub mean_cv_score: f64,
    /// Tuned decision threshold (binary problems only).
    pub binary_classification_threshold: Option<f64>,
}

impl EvaluationEntry {
    pub fn training_rows(&self) -> Option<usize> {
        self.all_objective_scores
            .get(TRAINING_COUNT_KEY)
            .map(|n| n as usize)
    }

    pub fn validation_rows(&self) -> Option<usize> {
        self.all_objective_scores
            .get(VALIDATION_COUNT_KEY)
            .map(|n| n as usize)
    }
}

/// Scores aggregated over folds and the optional holdout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvScores {
    /// One entry per fold, in splitter order.
    pub cv_data: Vec<EvaluationEntry>,
    /// Wall-clock time of the whole evaluation.
    pub training_time: Duration,
    /// Per-fold primary objective scores.
    pub cv_scores: Vec<f64>,
    /// Mean of `cv_scores`; NaN if any fold is NaN.
    pub cv_score_mean: f64,
    pub holdout_score: Option<f64>,
    pub holdout_scores: Option<ObjectiveScores>,
}

/// Everything an evaluation job hands back to the orchestrator.
#[derive(Debug, Clone)]
pub struct EvaluationResult {
    pub scores: CvScores,
    pub cached_data: PipelineCache,
    /// Pipeline produced by the last training pass (the template if it failed).
    pub pipeline: Arc<dyn Pipeline>,
    /// Messages recorded during the job, not yet written anywhere.
    pub logger: JobLogger,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_row_counts() {
        let mut scores = ObjectiveScores::new();
        scores.insert("F1", 0.5);
        scores.insert(TRAINING_COUNT_KEY, 80.0);
        scores.insert(VALIDATION_COUNT_KEY, 20.0);
        let entry = EvaluationEntry {
            all_objective_scores: scores,
            mean_cv_score: 0.5,
            binary_classification_threshold: None,
        };
        assert_eq!(entry.training_rows(), Some(80));
        assert_eq!(entry.validation_rows(), Some(20));
    }

    #[test]
    fn test_cv_scores_serialize_nan_as_null() {
        let scores = CvScores {
            cv_data: vec![],
            training_time: Duration::from_millis(1500),
            cv_scores: vec![f64::NAN],
            cv_score_mean: f64::NAN,
            holdout_score: None,
            holdout_scores: None,
        };
        let json = serde_json::to_value(&scores).unwrap();
        assert!(json["cv_score_mean"].is_null());
        assert_eq!(json["training_time"]["secs"], 1);
    }
}
