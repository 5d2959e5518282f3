//! Objective (scoring function) contract.

use std::fmt;

use crate::error::AutoMLError;
use crate::Result;

/// Number of evenly spaced candidates the default threshold search visits.
const THRESHOLD_GRID_STEPS: usize = 100;

/// A named scoring function.
///
/// Targets and predictions are numeric: class indices for label objectives,
/// positive-class probabilities for objectives that need probabilities, raw
/// values for regression.
pub trait Objective: Send + Sync + fmt::Debug {
    /// Stable display name used as the key in score mappings.
    fn name(&self) -> &str;

    /// Polarity, consumed by reporting and threshold search.
    fn greater_is_better(&self) -> bool;

    /// Whether `score` expects probabilities instead of labels.
    fn score_needs_proba(&self) -> bool {
        false
    }

    /// Score predictions against the true values.
    fn score(&self, y_true: &[f64], y_predicted: &[f64]) -> Result<f64>;

    /// Whether a binary decision threshold can be tuned for this objective.
    fn can_optimize_threshold(&self) -> bool {
        false
    }

    /// Find the decision threshold that optimizes this objective.
    ///
    /// `y_true` holds 0/1 labels and `y_pred_proba` positive-class
    /// probabilities. The default searches `[0, 1]` in 0.01 steps; ties go to
    /// the lowest threshold.
    fn optimize_threshold(&self, y_pred_proba: &[f64], y_true: &[f64]) -> Result<f64> {
        if !self.can_optimize_threshold() {
            return Err(AutoMLError::ThresholdTuning(format!(
                "objective '{}' does not support threshold optimization",
                self.name()
            )));
        }
        if y_pred_proba.len() != y_true.len() {
            return Err(AutoMLError::LengthMismatch {
                context: "threshold tuning probabilities vs targets".to_string(),
                left: y_pred_proba.len(),
                right: y_true.len(),
            });
        }

        let mut best: Option<(f64, f64)> = None;
        for step in 0..=THRESHOLD_GRID_STEPS {
            let threshold = step as f64 / THRESHOLD_GRID_STEPS as f64;
            let predicted: Vec<f64> = y_pred_proba
                .iter()
                .map(|&p| if p > threshold { 1.0 } else { 0.0 })
                .collect();
            let score = self.score(y_true, &predicted)?;
            if score.is_nan() {
                continue;
            }
            let improves = match best {
                None => true,
                Some((_, best_score)) if self.greater_is_better() => score > best_score,
                Some((_, best_score)) => score < best_score,
            };
            if improves {
                best = Some((threshold, score));
            }
        }

        best.map(|(threshold, _)| threshold).ok_or_else(|| {
            AutoMLError::ThresholdTuning(format!(
                "objective '{}' produced no finite score for any threshold",
                self.name()
            ))
        })
    }
}
