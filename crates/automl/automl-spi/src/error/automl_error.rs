//! AutoML error types.

use thiserror::Error;

use super::PipelineScoreError;

/// Errors that can occur while training, scoring or evaluating pipelines.
#[derive(Error, Debug)]
pub enum AutoMLError {
    /// Classes present in the full target are absent from a split slice.
    ///
    /// Both lists hold the original (un-encoded) labels, already formatted.
    #[error("{}", missing_target_message(.training, .validation))]
    MissingTargetValues {
        training: Vec<String>,
        validation: Vec<String>,
    },

    /// Data does not conform to a stored logical type schema.
    #[error("Schema mismatch for '{column}': {reason}")]
    SchemaMismatch { column: String, reason: String },

    /// Some objectives scored, others failed.
    #[error(transparent)]
    PipelineScore(#[from] PipelineScoreError),

    /// Pipeline fitting failed.
    #[error("Pipeline fitting failed: {0}")]
    FitError(String),

    /// Prediction failed.
    #[error("Prediction failed: {0}")]
    PredictionError(String),

    /// Objective scoring failed.
    #[error("Objective '{objective}' failed: {reason}")]
    ObjectiveError { objective: String, reason: String },

    /// Decision threshold tuning failed.
    #[error("Threshold tuning failed: {0}")]
    ThresholdTuning(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Insufficient data points for the operation.
    #[error("Insufficient data: need at least {required} rows, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Two aligned sequences disagree on length.
    #[error("Length mismatch: {context} ({left} vs {right})")]
    LengthMismatch {
        context: String,
        left: usize,
        right: usize,
    },

    /// No objective is registered under this name.
    #[error("Unknown objective '{0}'")]
    UnknownObjective(String),

    /// The configured error callback itself failed.
    #[error("Error callback failed: {0}")]
    Callback(String),

    /// A pipeline or job panicked.
    #[error("Panicked: {0}")]
    Panicked(String),

    /// The job was cancelled before it started.
    #[error("Computation was cancelled")]
    Cancelled,

    /// A submitted job failed; carries the trace captured where it ran.
    #[error("Job failed: {source}")]
    JobFailed {
        #[source]
        source: Box<AutoMLError>,
        traceback: Vec<String>,
    },

    /// Settings (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AutoMLError {
    /// The innermost error, looking through [`AutoMLError::JobFailed`] wrappers.
    pub fn root_cause(&self) -> &AutoMLError {
        match self {
            AutoMLError::JobFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

fn missing_target_message(training: &[String], validation: &[String]) -> String {
    let mut message = String::new();
    if !training.is_empty() {
        message.push_str(&format!(
            "Missing target values in the training set after data split: {{{}}}. ",
            training.join(", ")
        ));
    }
    if !validation.is_empty() {
        message.push_str(&format!(
            "Missing target values in the validation set after data split: {{{}}}.",
            validation.join(", ")
        ));
    }
    message
}
