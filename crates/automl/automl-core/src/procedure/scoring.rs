//! Scoring procedure.

use std::sync::Arc;

use automl_spi::{
    ColumnSchema, FeatureTable, Objective, ObjectiveScores, Pipeline, Result, TableSchema, Target,
};

use super::apply_schemas;

/// Score an already fitted pipeline, applying schemas first when given.
///
/// Returns the pipeline's scores unchanged; failures propagate.
#[allow(clippy::too_many_arguments)]
pub fn score_pipeline(
    pipeline: &dyn Pipeline,
    x: &FeatureTable,
    y: &Target,
    objectives: &[Arc<dyn Objective>],
    x_train: Option<&FeatureTable>,
    y_train: Option<&Target>,
    x_schema: Option<&TableSchema>,
    y_schema: Option<&ColumnSchema>,
) -> Result<ObjectiveScores> {
    let (x, y) = apply_schemas(x, y, x_schema, y_schema)?;
    pipeline.score(&x, &y, objectives, x_train, y_train)
}
