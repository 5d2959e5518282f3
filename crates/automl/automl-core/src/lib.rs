//! AutoML Core
//!
//! Core implementations for evaluating candidate pipelines:
//! - Cross-validated evaluation with per-fold failure containment
//! - Training with binary decision threshold tuning
//! - Scoring on unseen data
//! - Sequential and worker pool engines
//! - Data splitters, objectives and baseline pipelines

mod baseline;
mod callbacks;
mod config;
mod engine;
mod failure;
mod logging;
mod objective;
mod procedure;
mod splitter;

#[cfg(test)]
mod testing;

pub use baseline::{
    BaselineClassificationPipeline, BaselineRegressionPipeline, MeanRegressor, ModeClassifier,
};
pub use callbacks::{log_error_callback, raise_error_callback, silent_error_callback};
pub use config::build_config;
pub use engine::{PooledComputation, SequentialComputation, SequentialEngine, ThreadPoolEngine};
pub use failure::{capture_traceback, contain, panic_message, Failure};
pub use logging::TracingLogger;
pub use objective::{
    all_objectives, default_alternate_thresholding_objective, default_objective, get_objective,
    score_all_objectives, AccuracyBinary, AccuracyMulticlass, LogLossBinary, MeanSquaredError, F1,
    R2,
};
pub use procedure::{
    encode_classification_target, evaluate_pipeline, get_threshold_tuning_info,
    hash_training_index, resplit_training_data, score_pipeline, train_and_score_pipeline,
    train_pipeline, tune_binary_threshold, FoldOutcome, ResplitData, DEFAULT_THRESHOLD,
    THRESHOLD_TUNING_SIZE,
};
pub use splitter::{
    create_data_splitter, make_data_splitter, KFold, StratifiedKFold, TimeSeriesSplit,
    TrainingValidationSplit,
};

// Re-export from API for convenience
pub use automl_api::{
    AutoMLConfig, AutoMLConfigBuilder, AutoMLSettings, CvScores, Engine, ErrorCallback,
    EvaluationComputation, EvaluationEntry, EvaluationResult, PipelineCache, ScoringComputation,
    SplitStrategy, TrainingComputation, TRAINING_COUNT_KEY, VALIDATION_COUNT_KEY,
};

// Re-export SPI contracts and model
pub use automl_spi::{
    AutoMLError, Column, ColumnSchema, Component, ComponentInstances, DataSplitter, Dataset,
    EngineComputation, FeatureTable, JobLogger, LogLevel, LogicalType, Logger, Objective,
    ObjectiveScores, Pipeline, PipelineScoreError, ProblemType, Result, Split, TableSchema,
    Target, Value,
};
