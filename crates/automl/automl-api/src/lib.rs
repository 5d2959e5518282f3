//! AutoML Evaluation Consumer API
//!
//! Configuration, result DTOs and the engine contract for AutoML consumers.

mod builder;
mod config;
mod engine;
mod result;
mod settings;

pub use builder::AutoMLConfigBuilder;
pub use config::{AutoMLConfig, ErrorCallback};
pub use engine::{Engine, EvaluationComputation, ScoringComputation, TrainingComputation};
pub use result::{
    CvScores, EvaluationEntry, EvaluationResult, PipelineCache, TRAINING_COUNT_KEY,
    VALIDATION_COUNT_KEY,
};
pub use settings::{AutoMLSettings, SplitStrategy};

// Re-export SPI types
pub use automl_spi::{
    AutoMLError, Column, ColumnSchema, Component, ComponentInstances, DataSplitter, Dataset,
    EngineComputation, FeatureTable, JobLogger, LogLevel, LogicalType, Logger, Objective,
    ObjectiveScores, Pipeline, PipelineScoreError, ProblemType, Result, Split, TableSchema,
    Target, Value,
};
