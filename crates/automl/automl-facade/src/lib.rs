//! AutoML Facade
//!
//! High-level API for evaluating AutoML pipelines. Re-exports all public types
//! from the automl stack for convenient usage.
//!
//! # Example
//!
//! ```ignore
//! use automl_facade::prelude::*;
//!
//! automl_facade::init_tracing();
//! let config = Arc::new(build_config(&AutoMLSettings::new(ProblemType::Binary))?);
//! let pipeline: Arc<dyn Pipeline> =
//!     Arc::new(BaselineClassificationPipeline::new(ProblemType::Binary)?);
//!
//! let engine = SequentialEngine::new();
//! let result = engine
//!     .submit_evaluation_job(config, pipeline, x, y, None, None)
//!     .get_result()?;
//! println!("mean cv score: {}", result.scores.cv_score_mean);
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export everything from core (which includes API and SPI)
pub use automl_core::*;

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default `automl=info`).
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "automl=info".into()))
        .try_init();
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use std::sync::Arc;

    // Traits
    pub use automl_spi::{DataSplitter, EngineComputation, Logger, Objective, Pipeline};
    pub use automl_api::Engine;

    // Configuration and results
    pub use automl_api::{
        AutoMLConfig, AutoMLConfigBuilder, AutoMLSettings, CvScores, EvaluationEntry,
        EvaluationResult, SplitStrategy,
    };

    // Data model and errors
    pub use automl_spi::{
        AutoMLError, FeatureTable, JobLogger, ObjectiveScores, ProblemType, Result, Target, Value,
    };

    // Implementations
    pub use automl_core::{
        build_config, get_objective, BaselineClassificationPipeline, BaselineRegressionPipeline,
        SequentialEngine, ThreadPoolEngine, TracingLogger,
    };
}
