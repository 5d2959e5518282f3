//! Classification objectives.
//!
//! Labels are class indices as `f64`; binary objectives treat `1.0` as the
//! positive class.

use automl_spi::{Objective, Result};

use super::check_inputs;

/// Probabilities are clipped away from 0 and 1 before taking logs.
const LOG_LOSS_EPSILON: f64 = 1e-15;

/// Binary cross-entropy over positive-class probabilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLossBinary;

impl Objective for LogLossBinary {
    fn name(&self) -> &str {
        "Log Loss Binary"
    }

    fn greater_is_better(&self) -> bool {
        false
    }

    fn score_needs_proba(&self) -> bool {
        true
    }

    fn score(&self, y_true: &[f64], y_predicted: &[f64]) -> Result<f64> {
        check_inputs(self.name(), y_true, y_predicted)?;
        let total: f64 = y_true
            .iter()
            .zip(y_predicted)
            .map(|(&y, &p)| {
                let p = p.clamp(LOG_LOSS_EPSILON, 1.0 - LOG_LOSS_EPSILON);
                y * p.ln() + (1.0 - y) * (1.0 - p).ln()
            })
            .sum();
        Ok(-total / y_true.len() as f64)
    }
}

/// F1 score of the positive class.
#[derive(Debug, Clone, Copy, Default)]
pub struct F1;

impl Objective for F1 {
    fn name(&self) -> &str {
        "F1"
    }

    fn greater_is_better(&self) -> bool {
        true
    }

    fn score(&self, y_true: &[f64], y_predicted: &[f64]) -> Result<f64> {
        check_inputs(self.name(), y_true, y_predicted)?;
        let (mut tp, mut fp, mut fn_) = (0usize, 0usize, 0usize);
        for (&truth, &predicted) in y_true.iter().zip(y_predicted) {
            match (truth == 1.0, predicted == 1.0) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
                (false, false) => {}
            }
        }
        if tp == 0 {
            return Ok(0.0);
        }
        let tp = tp as f64;
        Ok(2.0 * tp / (2.0 * tp + fp as f64 + fn_ as f64))
    }

    fn can_optimize_threshold(&self) -> bool {
        true
    }
}

fn accuracy(y_true: &[f64], y_predicted: &[f64]) -> f64 {
    let correct = y_true
        .iter()
        .zip(y_predicted)
        .filter(|(a, b)| a == b)
        .count();
    correct as f64 / y_true.len() as f64
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AccuracyBinary;

impl Objective for AccuracyBinary {
    fn name(&self) -> &str {
        "Accuracy Binary"
    }

    fn greater_is_better(&self) -> bool {
        true
    }

    fn score(&self, y_true: &[f64], y_predicted: &[f64]) -> Result<f64> {
        check_inputs(self.name(), y_true, y_predicted)?;
        Ok(accuracy(y_true, y_predicted))
    }

    fn can_optimize_threshold(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AccuracyMulticlass;

impl Objective for AccuracyMulticlass {
    fn name(&self) -> &str {
        "Accuracy Multiclass"
    }

    fn greater_is_better(&self) -> bool {
        true
    }

    fn score(&self, y_true: &[f64], y_predicted: &[f64]) -> Result<f64> {
        check_inputs(self.name(), y_true, y_predicted)?;
        Ok(accuracy(y_true, y_predicted))
    }
}
