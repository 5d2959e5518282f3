//! # automl
//!
//! Pipeline evaluation engine for AutoML searches.
//! Cross-validates candidate pipelines with per-fold failure containment,
//! tunes binary decision thresholds and scores fitted pipelines, either
//! inline or on a worker pool.

pub use automl_facade::*;
