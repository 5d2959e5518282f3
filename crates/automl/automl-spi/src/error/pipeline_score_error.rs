//! Partial scoring failure.

use std::collections::BTreeMap;
use std::fmt;

/// Raised by a pipeline when some objectives scored and others failed.
///
/// Evaluation keeps the successful scores and marks only the failed
/// objectives as NaN.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineScoreError {
    /// Failed objective name to error message.
    pub exceptions: BTreeMap<String, String>,
    /// Objective name to score for the objectives that succeeded.
    pub scored_successfully: BTreeMap<String, f64>,
}

impl PipelineScoreError {
    pub fn new(
        exceptions: BTreeMap<String, String>,
        scored_successfully: BTreeMap<String, f64>,
    ) -> Self {
        Self {
            exceptions,
            scored_successfully,
        }
    }

    /// Score for `objective`: the real score when it succeeded, NaN otherwise.
    pub fn score_or_nan(&self, objective: &str) -> f64 {
        self.scored_successfully
            .get(objective)
            .copied()
            .unwrap_or(f64::NAN)
    }
}

impl fmt::Display for PipelineScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failed: Vec<String> = self
            .exceptions
            .iter()
            .map(|(objective, message)| format!("{objective}: {message}"))
            .collect();
        write!(
            f,
            "{} objective(s) failed while scoring pipeline: {}",
            self.exceptions.len(),
            failed.join("; ")
        )
    }
}

impl std::error::Error for PipelineScoreError {}
