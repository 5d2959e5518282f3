//! Objective implementations, name registry and multi-objective scoring.

mod classification;
mod regression;

use std::collections::BTreeMap;
use std::sync::Arc;

use automl_spi::{AutoMLError, Objective, ObjectiveScores, PipelineScoreError, ProblemType, Result};

pub use classification::{AccuracyBinary, AccuracyMulticlass, LogLossBinary, F1};
pub use regression::{MeanSquaredError, R2};

pub(crate) fn check_inputs(name: &str, y_true: &[f64], y_predicted: &[f64]) -> Result<()> {
    if y_true.len() != y_predicted.len() {
        return Err(AutoMLError::LengthMismatch {
            context: format!("'{name}' targets vs predictions"),
            left: y_true.len(),
            right: y_predicted.len(),
        });
    }
    if y_true.is_empty() {
        return Err(AutoMLError::ObjectiveError {
            objective: name.to_string(),
            reason: "cannot score an empty target".to_string(),
        });
    }
    Ok(())
}

/// Every built-in objective.
pub fn all_objectives() -> Vec<Arc<dyn Objective>> {
    vec![
        Arc::new(LogLossBinary),
        Arc::new(F1),
        Arc::new(AccuracyBinary),
        Arc::new(AccuracyMulticlass),
        Arc::new(MeanSquaredError),
        Arc::new(R2),
    ]
}

/// Look up a built-in objective by name, case-insensitively.
pub fn get_objective(name: &str) -> Result<Arc<dyn Objective>> {
    let wanted = name.trim().to_lowercase();
    if wanted == "mean squared error" {
        return Ok(Arc::new(MeanSquaredError));
    }
    all_objectives()
        .into_iter()
        .find(|o| o.name().to_lowercase() == wanted)
        .ok_or_else(|| AutoMLError::UnknownObjective(name.to_string()))
}

/// Primary objective used when none is configured.
pub fn default_objective(problem_type: ProblemType) -> Arc<dyn Objective> {
    if problem_type.is_binary() {
        Arc::new(LogLossBinary)
    } else if problem_type.is_multiclass() {
        Arc::new(AccuracyMulticlass)
    } else {
        Arc::new(R2)
    }
}

/// Threshold-tuning objective used when the primary one scores probabilities.
pub fn default_alternate_thresholding_objective() -> Arc<dyn Objective> {
    Arc::new(F1)
}

/// Score every objective, in order, against labels or probabilities.
///
/// Objectives that need probabilities get `y_pred_proba`; the rest get
/// `y_pred`. When some objectives fail the successful scores travel inside
/// [`PipelineScoreError`].
pub fn score_all_objectives(
    objectives: &[Arc<dyn Objective>],
    y_true: &[f64],
    y_pred: &[f64],
    y_pred_proba: Option<&[f64]>,
) -> Result<ObjectiveScores> {
    let mut scores = ObjectiveScores::new();
    let mut exceptions = BTreeMap::new();
    let mut scored_successfully = BTreeMap::new();

    for objective in objectives {
        let result = if objective.score_needs_proba() {
            match y_pred_proba {
                Some(proba) => objective.score(y_true, proba),
                None => Err(AutoMLError::ObjectiveError {
                    objective: objective.name().to_string(),
                    reason: "objective requires probabilities".to_string(),
                }),
            }
        } else {
            objective.score(y_true, y_pred)
        };
        match result {
            Ok(score) => {
                scores.insert(objective.name(), score);
                scored_successfully.insert(objective.name().to_string(), score);
            }
            Err(e) => {
                exceptions.insert(objective.name().to_string(), e.to_string());
            }
        }
    }

    if exceptions.is_empty() {
        Ok(scores)
    } else {
        Err(PipelineScoreError::new(exceptions, scored_successfully).into())
    }
}
