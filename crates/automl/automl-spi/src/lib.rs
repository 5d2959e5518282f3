//! AutoML Evaluation Service Provider Interface
//!
//! Defines the contracts the pipeline evaluation engine is built on:
//! - Pipelines, objectives and data splitters supplied by the caller
//! - Computation handles returned by engines
//! - The logging capability and the deferred per-job logger
//! - Row-aligned data model and logical type schemas

pub mod contract;
pub mod error;
pub mod logging;
pub mod model;

// Re-export all public items at the crate root
pub use contract::{
    Component, ComponentInstances, DataSplitter, EngineComputation, Logger, Objective, Pipeline,
    Split,
};
pub use error::{AutoMLError, PipelineScoreError};
pub use logging::{JobLogger, LogLevel};
pub use model::{
    Column, ColumnSchema, Dataset, FeatureTable, LogicalType, ObjectiveScores, ProblemType,
    TableSchema, Target, Value,
};

/// Result type for AutoML operations.
pub type Result<T> = std::result::Result<T, AutoMLError>;
