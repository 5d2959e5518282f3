//! End-to-end tests for the automl crate
//!
//! Evaluates the built-in baseline pipelines through both engines using only
//! this crate's public API.

use std::sync::Arc;

use automl::prelude::*;
use automl::{
    Column, ColumnSchema, KFold, LogLossBinary, LogicalType, MeanSquaredError, Split,
    StratifiedKFold, TableSchema, F1, R2,
};

fn regression_data() -> (FeatureTable, Target) {
    let values: Vec<f64> = (0..9).map(f64::from).collect();
    let x = FeatureTable::new(vec![Column::numeric("feature", &values)]).unwrap();
    (x, Target::from_f64(&values))
}

fn binary_data(n_rows: usize) -> (FeatureTable, Target) {
    let labels: Vec<f64> = (0..n_rows).map(|i| (i % 2) as f64).collect();
    (FeatureTable::empty(n_rows), Target::from_f64(&labels))
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[derive(Debug)]
struct FixedSplitter(Vec<Split>);

impl DataSplitter for FixedSplitter {
    fn split(&self, _x: &FeatureTable, _y: &Target) -> Result<Vec<Split>> {
        Ok(self.0.clone())
    }

    fn n_splits(&self) -> usize {
        self.0.len()
    }
}

#[test]
fn e2e_regression_baseline_cross_validation() {
    let config = AutoMLConfigBuilder::new(
        ProblemType::Regression,
        Arc::new(MeanSquaredError),
        Arc::new(KFold::new(3)),
    )
    .additional_objective(Arc::new(R2))
    .build()
    .unwrap();
    let pipeline: Arc<dyn Pipeline> =
        Arc::new(BaselineRegressionPipeline::new(ProblemType::Regression).unwrap());
    let (x, y) = regression_data();

    let result = SequentialEngine::new()
        .submit_evaluation_job(Arc::new(config), pipeline, x, y, None, None)
        .get_result()
        .unwrap();

    let scores = &result.scores;
    assert_eq!(scores.cv_data.len(), 3);
    // Validation rows [0, 1, 2] against a training mean of 5.5, and so on.
    let expected = [62.75 / 3.0, 2.0 / 3.0, 62.75 / 3.0];
    for (actual, expected) in scores.cv_scores.iter().zip(expected) {
        assert_close(*actual, expected);
    }
    assert_close(scores.cv_score_mean, expected.iter().sum::<f64>() / 3.0);

    for entry in &scores.cv_data {
        let names: Vec<&str> = entry.all_objective_scores.names().collect();
        assert_eq!(names, vec!["MSE", "R2", "# Training", "# Validation"]);
        assert_eq!(entry.training_rows(), Some(6));
        assert_eq!(entry.validation_rows(), Some(3));
        assert_eq!(entry.binary_classification_threshold, None);
    }
    assert!(scores.holdout_score.is_none());
    assert!(scores.holdout_scores.is_none());
    assert_eq!(result.cached_data.len(), 3);
}

#[test]
fn e2e_binary_baseline_with_threshold_tuning_and_holdout() {
    let config = AutoMLConfigBuilder::new(
        ProblemType::Binary,
        Arc::new(F1),
        Arc::new(StratifiedKFold::new(2)),
    )
    .additional_objective(Arc::new(LogLossBinary))
    .build()
    .unwrap();
    let pipeline: Arc<dyn Pipeline> =
        Arc::new(BaselineClassificationPipeline::new(ProblemType::Binary).unwrap());
    let (x, y) = binary_data(12);
    let (x_holdout, y_holdout) = binary_data(4);

    let result = SequentialEngine::new()
        .submit_evaluation_job(
            Arc::new(config),
            pipeline,
            x,
            y,
            Some(x_holdout),
            Some(y_holdout),
        )
        .get_result()
        .unwrap();

    let scores = &result.scores;
    assert_eq!(scores.cv_data.len(), 2);
    for entry in &scores.cv_data {
        // Constant 0.5 probabilities: any threshold below it predicts the
        // positive class everywhere, and the lowest such threshold wins.
        assert_eq!(entry.binary_classification_threshold, Some(0.0));
        assert_close(entry.mean_cv_score, 2.0 / 3.0);
        assert_close(
            entry.all_objective_scores.get("Log Loss Binary").unwrap(),
            std::f64::consts::LN_2,
        );
        assert_eq!(entry.training_rows(), Some(6));
    }

    assert_close(scores.holdout_score.unwrap(), 2.0 / 3.0);
    let holdout_scores = scores.holdout_scores.as_ref().unwrap();
    assert!(holdout_scores.contains("Log Loss Binary"));
    assert_eq!(result.pipeline.threshold(), Some(0.0));
}

#[test]
fn e2e_missing_class_aborts_before_any_fold() {
    let labels: Vec<Value> = ["a", "a", "b", "b", "c", "c"]
        .iter()
        .map(|&l| Value::from(l))
        .collect();
    let y = Target::new(labels);
    let x = FeatureTable::empty(6);
    let splitter = FixedSplitter(vec![Split::new(vec![0, 1, 2, 3], vec![4, 5])]);
    let config = AutoMLConfigBuilder::new(
        ProblemType::Multiclass,
        get_objective("Accuracy Multiclass").unwrap(),
        Arc::new(splitter),
    )
    .build()
    .unwrap();
    let pipeline: Arc<dyn Pipeline> =
        Arc::new(BaselineClassificationPipeline::new(ProblemType::Multiclass).unwrap());

    let err = SequentialEngine::new()
        .submit_evaluation_job(Arc::new(config), pipeline, x, y, None, None)
        .get_result()
        .unwrap_err();
    match err.root_cause() {
        AutoMLError::MissingTargetValues {
            training,
            validation,
        } => {
            assert_eq!(training, &vec!["c".to_string()]);
            assert_eq!(validation, &vec!["a".to_string(), "b".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("training"));
}

#[test]
fn e2e_settings_drive_both_engines_identically() {
    let settings = AutoMLSettings::from_json(
        r#"{
            "problem_type": "regression",
            "objective": "R2",
            "additional_objectives": ["MSE"],
            "data_splitter": {"kind": "k_fold", "n_splits": 3, "shuffle": true},
            "random_seed": 11
        }"#,
    )
    .unwrap();
    let config = Arc::new(build_config(&settings).unwrap());
    let pipeline: Arc<dyn Pipeline> =
        Arc::new(BaselineRegressionPipeline::new(ProblemType::Regression).unwrap());

    let (x, y) = regression_data();
    let sequential = SequentialEngine::new()
        .submit_evaluation_job(Arc::clone(&config), Arc::clone(&pipeline), x, y, None, None)
        .get_result()
        .unwrap();

    let (x, y) = regression_data();
    let pooled = ThreadPoolEngine::new(2)
        .unwrap()
        .submit_evaluation_job(config, pipeline, x, y, None, None)
        .get_result()
        .unwrap();

    assert_eq!(sequential.scores.cv_scores, pooled.scores.cv_scores);
    assert_eq!(sequential.scores.cv_data, pooled.scores.cv_data);
    assert_eq!(sequential.logger, pooled.logger);
}

#[test]
fn e2e_train_then_score_on_unseen_rows() {
    let config = Arc::new(build_config(&AutoMLSettings::new(ProblemType::Regression)).unwrap());
    let template: Arc<dyn Pipeline> =
        Arc::new(BaselineRegressionPipeline::new(ProblemType::Regression).unwrap());
    let engine = ThreadPoolEngine::new(1).unwrap();

    let (x, y) = regression_data();
    let fitted = engine
        .submit_training_job(Arc::clone(&config), template, x, y, None, None)
        .get_result()
        .unwrap();
    assert!(fitted.component_instances().contains_key("Baseline Regressor"));

    let x_test = FeatureTable::new(vec![Column::numeric("feature", &[2.0, 6.0])]).unwrap();
    let y_test = Target::from_f64(&[2.0, 6.0]);
    let objectives = vec![get_objective("mean squared error").unwrap()];
    let scores = engine
        .submit_scoring_job(
            config,
            Arc::from(fitted),
            x_test,
            y_test,
            objectives,
            None,
            None,
        )
        .get_result()
        .unwrap();
    // Training mean is 4; both test rows are 2 away.
    assert_close(scores.get("MSE").unwrap(), 4.0);
}

#[test]
fn e2e_schema_mismatch_propagates() {
    let schema = TableSchema::new().with_column("feature", ColumnSchema::new(LogicalType::Boolean));
    let config = AutoMLConfigBuilder::new(
        ProblemType::Regression,
        Arc::new(R2),
        Arc::new(KFold::new(3)),
    )
    .x_schema(schema)
    .build()
    .unwrap();
    let pipeline: Arc<dyn Pipeline> =
        Arc::new(BaselineRegressionPipeline::new(ProblemType::Regression).unwrap());
    let (x, y) = regression_data();

    let err = SequentialEngine::new()
        .submit_evaluation_job(Arc::new(config), pipeline, x, y, None, None)
        .get_result()
        .unwrap_err();
    assert!(matches!(
        err.root_cause(),
        AutoMLError::SchemaMismatch { column, .. } if column == "feature"
    ));
}

#[test]
fn e2e_scores_serialize_to_json() {
    let config = Arc::new(build_config(&AutoMLSettings::new(ProblemType::Regression)).unwrap());
    let pipeline: Arc<dyn Pipeline> =
        Arc::new(BaselineRegressionPipeline::new(ProblemType::Regression).unwrap());
    let (x, y) = regression_data();
    let result = SequentialEngine::new()
        .submit_evaluation_job(config, pipeline, x, y, None, None)
        .get_result()
        .unwrap();

    let json = serde_json::to_value(&result.scores).unwrap();
    assert_eq!(json["cv_data"].as_array().map(Vec::len), Some(3));
    assert!(json["holdout_score"].is_null());
    let decoded: CvScores = serde_json::from_value(json).unwrap();
    assert_eq!(decoded.cv_scores, result.scores.cv_scores);
}
