//! Model module containing the engine's data structures.
//!
//! This module defines the data flowing through evaluation:
//! - [`Value`] - A cell or label
//! - [`FeatureTable`], [`Target`], [`Dataset`] - Row-aligned training data
//! - [`TableSchema`], [`ColumnSchema`], [`LogicalType`] - Logical type schemas
//! - [`ProblemType`] - Kind of supervised problem
//! - [`ObjectiveScores`] - Ordered objective name to score mapping

mod objective_scores;
mod problem_type;
mod schema;
mod table;
mod value;

pub use objective_scores::ObjectiveScores;
pub use problem_type::ProblemType;
pub use schema::{ColumnSchema, LogicalType, TableSchema};
pub use table::{Column, Dataset, FeatureTable, Target};
pub use value::Value;
