//! Supported problem types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AutoMLError;

/// Kind of supervised learning problem being searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    Binary,
    Multiclass,
    Regression,
    TimeSeriesBinary,
    TimeSeriesMulticlass,
    TimeSeriesRegression,
}

impl ProblemType {
    pub fn is_binary(&self) -> bool {
        matches!(self, ProblemType::Binary | ProblemType::TimeSeriesBinary)
    }

    pub fn is_multiclass(&self) -> bool {
        matches!(self, ProblemType::Multiclass | ProblemType::TimeSeriesMulticlass)
    }

    pub fn is_classification(&self) -> bool {
        self.is_binary() || self.is_multiclass()
    }

    pub fn is_regression(&self) -> bool {
        matches!(self, ProblemType::Regression | ProblemType::TimeSeriesRegression)
    }

    pub fn is_time_series(&self) -> bool {
        matches!(
            self,
            ProblemType::TimeSeriesBinary
                | ProblemType::TimeSeriesMulticlass
                | ProblemType::TimeSeriesRegression
        )
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProblemType::Binary => "binary",
            ProblemType::Multiclass => "multiclass",
            ProblemType::Regression => "regression",
            ProblemType::TimeSeriesBinary => "time series binary",
            ProblemType::TimeSeriesMulticlass => "time series multiclass",
            ProblemType::TimeSeriesRegression => "time series regression",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ProblemType {
    type Err = AutoMLError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "binary" => Ok(ProblemType::Binary),
            "multiclass" => Ok(ProblemType::Multiclass),
            "regression" => Ok(ProblemType::Regression),
            "time series binary" => Ok(ProblemType::TimeSeriesBinary),
            "time series multiclass" => Ok(ProblemType::TimeSeriesMulticlass),
            "time series regression" => Ok(ProblemType::TimeSeriesRegression),
            _ => Err(AutoMLError::InvalidConfig(format!("unknown problem type '{s}'"))),
        }
    }
}
