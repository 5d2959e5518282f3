//! Training, evaluation and scoring procedures.
//!
//! Procedures are synchronous; engines decide where they run.

mod evaluation;
mod scoring;
mod threshold;
mod training;

use std::borrow::Cow;

use automl_spi::{ColumnSchema, FeatureTable, Result, TableSchema, Target};

pub use evaluation::{
    encode_classification_target, evaluate_pipeline, train_and_score_pipeline, FoldOutcome,
};
pub use scoring::score_pipeline;
pub use threshold::{
    get_threshold_tuning_info, resplit_training_data, tune_binary_threshold, ResplitData,
    DEFAULT_THRESHOLD, THRESHOLD_TUNING_SIZE,
};
pub use training::{hash_training_index, train_pipeline};

/// Inputs with the given schemas attached; borrowed when there is nothing to apply.
pub(crate) fn apply_schemas<'a>(
    x: &'a FeatureTable,
    y: &'a Target,
    x_schema: Option<&TableSchema>,
    y_schema: Option<&ColumnSchema>,
) -> Result<(Cow<'a, FeatureTable>, Cow<'a, Target>)> {
    let x = match x_schema {
        Some(schema) => {
            let mut x = x.clone();
            x.init_schema(schema)?;
            Cow::Owned(x)
        }
        None => Cow::Borrowed(x),
    };
    let y = match y_schema {
        Some(schema) => {
            let mut y = y.clone();
            y.init_schema(schema)?;
            Cow::Owned(y)
        }
        None => Cow::Borrowed(y),
    };
    Ok((x, y))
}
