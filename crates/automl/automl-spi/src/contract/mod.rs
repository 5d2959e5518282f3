//! Contract module containing the collaborator traits.
//!
//! This module defines the seams the evaluation engine is built on:
//! - [`Pipeline`] and [`Component`] - Fittable, scorable model pipelines
//! - [`Objective`] - Named scoring functions
//! - [`DataSplitter`] - Fold generation
//! - [`Logger`] - Logging capability
//! - [`EngineComputation`] - Handle on submitted work

mod computation;
mod data_splitter;
mod logger;
mod objective;
mod pipeline;

pub use computation::EngineComputation;
pub use data_splitter::{DataSplitter, Split};
pub use logger::Logger;
pub use objective::Objective;
pub use pipeline::{Component, ComponentInstances, Pipeline};
