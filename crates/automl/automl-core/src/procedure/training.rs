//! Training procedure.

use std::borrow::Cow;

use automl_api::AutoMLConfig;
use automl_spi::{FeatureTable, Pipeline, Result, Target};

use super::apply_schemas;
use super::threshold::{get_threshold_tuning_info, resplit_training_data, tune_binary_threshold};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Stable cache key for the rows a pipeline was trained on.
///
/// 64-bit FNV-1a over each row position as little-endian `u64`, so keys
/// are identical across builds, toolchains and platforms.
pub fn hash_training_index(index: &[usize]) -> u64 {
    index
        .iter()
        .flat_map(|&row| (row as u64).to_le_bytes())
        .fold(FNV_OFFSET_BASIS, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
        })
}

/// Fit a clone of `pipeline` on `(x, y)` and tune its threshold if needed.
///
/// With `schema` set, the configured schemas are applied to the inputs
/// first. With `get_hashes` set, also returns the hash of the rows the
/// clone was fitted on. Errors propagate unchanged.
pub fn train_pipeline(
    pipeline: &dyn Pipeline,
    x: &FeatureTable,
    y: &Target,
    config: &AutoMLConfig,
    schema: bool,
    get_hashes: bool,
) -> Result<(Box<dyn Pipeline>, Option<u64>)> {
    let (x, y) = if schema {
        apply_schemas(x, y, config.x_schema.as_ref(), config.y_schema.as_ref())?
    } else {
        (Cow::Borrowed(x), Cow::Borrowed(y))
    };

    let (tuning_objective, needs_resplit) = get_threshold_tuning_info(config, pipeline);
    let resplit = if needs_resplit {
        Some(resplit_training_data(pipeline, &x, &y)?)
    } else {
        None
    };
    let (x_fit, y_fit) = match &resplit {
        Some(data) => (&data.x_train, &data.y_train),
        None => (&*x, &*y),
    };

    let mut fitted = pipeline.clone_pipeline();
    fitted.fit(x_fit, y_fit)?;

    let problem_type = fitted.problem_type();
    tune_binary_threshold(
        fitted.as_mut(),
        tuning_objective.as_ref(),
        problem_type,
        config.optimize_thresholds,
        resplit.as_ref().map(|data| &data.x_tuning),
        resplit.as_ref().map(|data| &data.y_tuning),
        x_fit,
        y_fit,
    )?;

    let hash = get_hashes.then(|| hash_training_index(x_fit.index()));
    Ok((fitted, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use automl_spi::{AutoMLError, ColumnSchema, LogicalType, ProblemType};

    use crate::objective::{AccuracyBinary, LogLossBinary, F1, R2};
    use crate::splitter::KFold;
    use crate::testing::{binary_data, build, config_for, Fault, MockPipeline};

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_training_index(&[1, 2, 3]), hash_training_index(&[1, 2, 3]));
        assert_ne!(hash_training_index(&[1, 2, 3]), hash_training_index(&[3, 2, 1]));
    }

    #[test]
    fn test_hash_is_pinned_across_builds() {
        assert_eq!(hash_training_index(&[]), 0xcbf2_9ce4_8422_2325);
        assert_eq!(hash_training_index(&[0, 1, 2]), 0x70c9_b821_0305_9f06);
    }

    #[test]
    fn test_template_is_not_mutated() {
        let template = MockPipeline::new(ProblemType::Binary);
        let config = build(config_for(ProblemType::Binary, Arc::new(F1), Arc::new(KFold::new(2))));
        let (x, y) = binary_data(10);
        let (fitted, hash) = train_pipeline(&template, &x, &y, &config, false, false).unwrap();
        assert!(template.fitted_rows.is_none());
        assert!(template.threshold.is_none());
        assert_eq!(fitted.threshold(), Some(0.42));
        assert!(hash.is_none());
    }

    #[test]
    fn test_resplit_fits_on_eighty_percent_and_tunes_on_rest() {
        let template = MockPipeline::new(ProblemType::Binary);
        let config = build(config_for(ProblemType::Binary, Arc::new(F1), Arc::new(KFold::new(2))));
        let (x, y) = binary_data(10);
        let (fitted, hash) = train_pipeline(&template, &x, &y, &config, false, true).unwrap();
        assert_eq!(template.journal(), vec!["fit:8", "tune:2:F1"]);
        assert_eq!(fitted.threshold(), Some(0.42));

        let components = fitted.component_instances();
        let rows = &components["Mock Estimator"]
            .as_any()
            .downcast_ref::<crate::testing::MockComponent>()
            .unwrap()
            .rows;
        assert_eq!(hash, Some(hash_training_index(rows)));
    }

    #[test]
    fn test_without_resplit_tunes_on_training_data() {
        let template = MockPipeline::new(ProblemType::Binary);
        let config = build(
            config_for(ProblemType::Binary, Arc::new(F1), Arc::new(KFold::new(2)))
                .threshold_tuning_resplit(false),
        );
        let (x, y) = binary_data(10);
        train_pipeline(&template, &x, &y, &config, false, false).unwrap();
        assert_eq!(template.journal(), vec!["fit:10", "tune:10:F1"]);
    }

    #[test]
    fn test_probability_objective_tunes_alternate_objective() {
        let template = MockPipeline::new(ProblemType::Binary);
        let config = build(
            config_for(ProblemType::Binary, Arc::new(LogLossBinary), Arc::new(KFold::new(2)))
                .alternate_thresholding_objective(Arc::new(AccuracyBinary)),
        );
        let (x, y) = binary_data(10);
        train_pipeline(&template, &x, &y, &config, false, false).unwrap();
        assert_eq!(template.journal(), vec!["fit:8", "tune:2:Accuracy Binary"]);
    }

    #[test]
    fn test_optimization_disabled_keeps_default_threshold() {
        let template = MockPipeline::new(ProblemType::Binary);
        let config = build(
            config_for(ProblemType::Binary, Arc::new(F1), Arc::new(KFold::new(2)))
                .optimize_thresholds(false),
        );
        let (x, y) = binary_data(10);
        let (fitted, _) = train_pipeline(&template, &x, &y, &config, false, false).unwrap();
        assert_eq!(fitted.threshold(), Some(0.5));
        assert_eq!(template.journal(), vec!["fit:10"]);
    }

    #[test]
    fn test_regression_has_no_threshold() {
        let template = MockPipeline::new(ProblemType::Regression);
        let config = build(config_for(ProblemType::Regression, Arc::new(R2), Arc::new(KFold::new(2))));
        let x = FeatureTable::empty(4);
        let y = Target::from_f64(&[1.0, 2.0, 3.0, 4.0]);
        let (fitted, _) = train_pipeline(&template, &x, &y, &config, false, false).unwrap();
        assert_eq!(fitted.threshold(), None);
    }

    #[test]
    fn test_fit_errors_propagate() {
        let template = MockPipeline::new(ProblemType::Binary).with_fault(Fault::Fit, None);
        let config = build(config_for(ProblemType::Binary, Arc::new(F1), Arc::new(KFold::new(2))));
        let (x, y) = binary_data(10);
        let result = train_pipeline(&template, &x, &y, &config, false, false);
        assert!(matches!(result, Err(AutoMLError::FitError(_))));
    }

    #[test]
    fn test_schema_mismatch_propagates() {
        let template = MockPipeline::new(ProblemType::Binary);
        let config = build(
            config_for(ProblemType::Binary, Arc::new(F1), Arc::new(KFold::new(2)))
                .y_schema(ColumnSchema::new(LogicalType::Boolean)),
        );
        let (x, y) = binary_data(10);
        let result = train_pipeline(&template, &x, &y, &config, true, false);
        assert!(matches!(result, Err(AutoMLError::SchemaMismatch { .. })));
        assert!(template.journal().is_empty());

        // Schemas are skipped entirely when not requested.
        assert!(train_pipeline(&template, &x, &y, &config, false, false).is_ok());
    }
}
