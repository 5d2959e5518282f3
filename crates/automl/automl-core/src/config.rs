//! Turn serializable settings into a runnable configuration.

use automl_api::{AutoMLConfig, AutoMLConfigBuilder, AutoMLSettings};
use automl_spi::Result;

use crate::objective::{default_alternate_thresholding_objective, default_objective, get_objective};
use crate::splitter::create_data_splitter;

/// Resolve objective names and the split strategy of `settings`.
///
/// Missing objectives fall back to the problem type's defaults; binary
/// problems tune thresholds for F1 unless told otherwise.
pub fn build_config(settings: &AutoMLSettings) -> Result<AutoMLConfig> {
    let problem_type = settings.problem_type;
    let objective = match &settings.objective {
        Some(name) => get_objective(name)?,
        None => default_objective(problem_type),
    };
    let additional_objectives = settings
        .additional_objectives
        .iter()
        .map(|name| get_objective(name))
        .collect::<Result<Vec<_>>>()?;
    let splitter = create_data_splitter(&settings.data_splitter, problem_type, settings.random_seed);

    let mut builder = AutoMLConfigBuilder::new(problem_type, objective, splitter)
        .additional_objectives(additional_objectives)
        .optimize_thresholds(settings.optimize_thresholds)
        .threshold_tuning_resplit(settings.threshold_tuning_resplit)
        .random_seed(settings.random_seed);

    match &settings.alternate_thresholding_objective {
        Some(name) => builder = builder.alternate_thresholding_objective(get_objective(name)?),
        None if problem_type.is_binary() => {
            builder = builder.alternate_thresholding_objective(default_alternate_thresholding_objective())
        }
        None => {}
    }
    if let Some(schema) = &settings.x_schema {
        builder = builder.x_schema(schema.clone());
    }
    if let Some(schema) = &settings.y_schema {
        builder = builder.y_schema(schema.clone());
    }

    tracing::debug!(
        target: "automl",
        problem_type = %problem_type,
        objective = settings.objective.as_deref().unwrap_or("<default>"),
        "built evaluation config from settings"
    );
    builder.build()
}
