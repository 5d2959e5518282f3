//! Regression objectives.

use automl_spi::{Objective, Result};

use super::check_inputs;

#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSquaredError;

impl Objective for MeanSquaredError {
    fn name(&self) -> &str {
        "MSE"
    }

    fn greater_is_better(&self) -> bool {
        false
    }

    fn score(&self, y_true: &[f64], y_predicted: &[f64]) -> Result<f64> {
        check_inputs(self.name(), y_true, y_predicted)?;
        let sum: f64 = y_true
            .iter()
            .zip(y_predicted)
            .map(|(a, b)| (a - b).powi(2))
            .sum();
        Ok(sum / y_true.len() as f64)
    }
}

/// Coefficient of determination.
#[derive(Debug, Clone, Copy, Default)]
pub struct R2;

impl Objective for R2 {
    fn name(&self) -> &str {
        "R2"
    }

    fn greater_is_better(&self) -> bool {
        true
    }

    fn score(&self, y_true: &[f64], y_predicted: &[f64]) -> Result<f64> {
        check_inputs(self.name(), y_true, y_predicted)?;
        let mean = y_true.iter().sum::<f64>() / y_true.len() as f64;
        let ss_res: f64 = y_true
            .iter()
            .zip(y_predicted)
            .map(|(a, b)| (a - b).powi(2))
            .sum();
        let ss_tot: f64 = y_true.iter().map(|a| (a - mean).powi(2)).sum();
        if ss_tot == 0.0 {
            // Constant target: perfect predictions score 1, anything else 0.
            return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
        }
        Ok(1.0 - ss_res / ss_tot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mse() {
        assert_eq!(MeanSquaredError.score(&[1.0, 2.0], &[1.0, 4.0]).unwrap(), 2.0);
        assert!(!MeanSquaredError.greater_is_better());
    }

    #[test]
    fn test_r2() {
        let y = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(R2.score(&y, &y).unwrap(), 1.0);
        assert_eq!(R2.score(&y, &[2.5; 4]).unwrap(), 0.0);
        assert_eq!(R2.score(&[3.0, 3.0], &[3.0, 3.0]).unwrap(), 1.0);
        assert_eq!(R2.score(&[3.0, 3.0], &[1.0, 3.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(R2.score(&[1.0, 2.0], &[1.0]).is_err());
    }
}
