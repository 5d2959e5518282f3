//! Evaluation procedure: cross-validation with per-fold failure containment.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Instant;

use automl_api::{
    AutoMLConfig, CvScores, EvaluationEntry, EvaluationResult, PipelineCache, TRAINING_COUNT_KEY,
    VALIDATION_COUNT_KEY,
};
use automl_spi::{
    AutoMLError, FeatureTable, JobLogger, Logger, ObjectiveScores, Pipeline, ProblemType, Result,
    Target, Value,
};

use super::apply_schemas;
use super::training::train_pipeline;
use crate::failure::{contain, Failure};

/// Outcome of training and scoring on one split.
///
/// Failures here are contained: the caller reports them and fills the
/// fold's scores with NaN. Fatal problems never reach this type; they are
/// returned as `Err` before or after the fold runs.
#[derive(Debug)]
pub enum FoldOutcome {
    Scored {
        pipeline: Box<dyn Pipeline>,
        scores: ObjectiveScores,
        training_hash: Option<u64>,
    },
    Failed {
        error: AutoMLError,
        traceback: Vec<String>,
    },
}

/// Map each label to its rank by descending frequency.
///
/// Returns the encoded target and the labels in code order, so that code
/// `i` decodes to `classes[i]`.
pub fn encode_classification_target(y: &Target) -> Result<(Target, Vec<Value>)> {
    let classes: Vec<Value> = y.value_counts().into_iter().map(|(label, _)| label).collect();
    let codes: HashMap<&Value, usize> = classes
        .iter()
        .enumerate()
        .map(|(code, label)| (label, code))
        .collect();
    let encoded = y
        .values()
        .iter()
        .map(|label| codes.get(label).copied().map(Value::from).unwrap_or_default())
        .collect();
    Ok((y.map_values(encoded)?, classes))
}

/// Labels of the full target that do not occur at `positions`, decoded and sorted.
fn missing_classes(encoded: &Target, classes: &[Value], positions: &[usize]) -> Vec<String> {
    let present: BTreeSet<&Value> = positions.iter().map(|&p| &encoded.values()[p]).collect();
    let mut missing: Vec<&Value> = encoded
        .values()
        .iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter(|code| !present.contains(code))
        .filter_map(|code| code.as_f64().and_then(|c| classes.get(c as usize)))
        .collect();
    missing.sort();
    missing.iter().map(|label| label.to_string()).collect()
}

/// Log the pipeline, apply the configured schemas, then cross-validate.
pub fn evaluate_pipeline(
    pipeline: Arc<dyn Pipeline>,
    config: &AutoMLConfig,
    x: &FeatureTable,
    y: &Target,
    mut logger: JobLogger,
    x_holdout: Option<&FeatureTable>,
    y_holdout: Option<&Target>,
) -> Result<EvaluationResult> {
    logger.info(&format!("{}:", pipeline.name()));
    let (x, y) = apply_schemas(x, y, config.x_schema.as_ref(), config.y_schema.as_ref())?;
    train_and_score_pipeline(pipeline, config, &x, &y, logger, x_holdout, y_holdout)
}

/// Cross-validate `pipeline` over the configured splits, then score the
/// holdout set when both holdout parts are given.
///
/// A fold that fails to train or score is reported through the error
/// callback and recorded with NaN scores; the remaining folds still run.
/// Classes missing from a split and errors raised by the callback abort
/// the evaluation.
pub fn train_and_score_pipeline(
    pipeline: Arc<dyn Pipeline>,
    config: &AutoMLConfig,
    x: &FeatureTable,
    y: &Target,
    mut logger: JobLogger,
    x_holdout: Option<&FeatureTable>,
    y_holdout: Option<&Target>,
) -> Result<EvaluationResult> {
    let start = Instant::now();
    let objective_name = config.objective_name().to_string();
    logger.info("\tStarting cross validation");

    // The encoded target only drives splitting and the class check.
    let encoded = if config.problem_type.is_classification() {
        Some(encode_classification_target(y)?)
    } else {
        None
    };
    let split_target = encoded.as_ref().map_or(y, |(target, _)| target);
    let splits = config.data_splitter.split(x, split_target)?;

    let check_classes = matches!(
        config.problem_type,
        ProblemType::Binary | ProblemType::Multiclass
    );

    let mut pipeline_cache = PipelineCache::new();
    let mut stored_pipeline = Arc::clone(&pipeline);
    let mut cv_data = Vec::with_capacity(splits.len());

    for (fold_num, split) in splits.iter().enumerate() {
        logger.debug(&format!("\t\tTraining and scoring on fold {fold_num}"));
        let x_train = x.take(&split.train)?;
        let x_valid = x.take(&split.validation)?;
        let y_train = y.take(&split.train)?;
        let y_valid = y.take(&split.validation)?;

        if let (true, Some((encoded, classes))) = (check_classes, &encoded) {
            let training = missing_classes(encoded, classes, &split.train);
            let validation = missing_classes(encoded, classes, &split.validation);
            if !training.is_empty() || !validation.is_empty() {
                return Err(AutoMLError::MissingTargetValues {
                    training,
                    validation,
                });
            }
        }

        let outcome = train_and_score_split(
            pipeline.as_ref(),
            config,
            &x_train,
            &y_train,
            &x_valid,
            &y_valid,
            &mut logger,
            Some(fold_num),
        );
        let (score, mut scores, fitted) =
            settle_outcome(outcome, config, Some(fold_num), &pipeline, &mut pipeline_cache)?;
        stored_pipeline = fitted;

        scores.insert(TRAINING_COUNT_KEY, y_train.len() as f64);
        scores.insert(VALIDATION_COUNT_KEY, y_valid.len() as f64);
        let binary_classification_threshold = if config.problem_type.is_binary() {
            stored_pipeline.threshold()
        } else {
            None
        };
        cv_data.push(EvaluationEntry {
            all_objective_scores: scores,
            mean_cv_score: score,
            binary_classification_threshold,
        });
    }

    let cv_scores: Vec<f64> = cv_data.iter().map(|entry| entry.mean_cv_score).collect();
    let cv_score_mean = if cv_scores.is_empty() {
        f64::NAN
    } else {
        cv_scores.iter().sum::<f64>() / cv_scores.len() as f64
    };
    logger.info(&format!(
        "\tFinished cross validation - mean {objective_name}: {cv_score_mean:.3}"
    ));

    let mut holdout_score = None;
    let mut holdout_scores = None;
    if let (Some(x_holdout), Some(y_holdout)) = (x_holdout, y_holdout) {
        logger.info("\tStarting holdout set scoring");
        logger.debug("\t\tTraining and scoring entire dataset");
        let outcome = train_and_score_split(
            pipeline.as_ref(),
            config,
            x,
            y,
            x_holdout,
            y_holdout,
            &mut logger,
            None,
        );
        let (score, scores, fitted) =
            settle_outcome(outcome, config, None, &pipeline, &mut pipeline_cache)?;
        stored_pipeline = fitted;
        logger.info(&format!(
            "\tFinished holdout set scoring - {objective_name}: {score:.3}"
        ));
        holdout_score = Some(score);
        holdout_scores = Some(scores);
    }

    Ok(EvaluationResult {
        scores: CvScores {
            cv_data,
            training_time: start.elapsed(),
            cv_scores,
            cv_score_mean,
            holdout_score,
            holdout_scores,
        },
        cached_data: pipeline_cache,
        pipeline: stored_pipeline,
        logger,
    })
}

/// Train on one slice and score on another, containing every failure.
#[allow(clippy::too_many_arguments)]
fn train_and_score_split(
    pipeline: &dyn Pipeline,
    config: &AutoMLConfig,
    x_train: &FeatureTable,
    y_train: &Target,
    x_score: &FeatureTable,
    y_score: &Target,
    logger: &mut JobLogger,
    fold_num: Option<usize>,
) -> FoldOutcome {
    let prefix = match fold_num {
        Some(i) => format!("Fold {i}"),
        None => "Full training data pipeline".to_string(),
    };
    let objectives = config.objectives_to_score();

    let result = contain(|| {
        logger.debug(&format!("\t\t\t{prefix}: starting training"));
        let (fitted, training_hash) = train_pipeline(pipeline, x_train, y_train, config, false, true)?;
        logger.debug(&format!("\t\t\t{prefix}: finished training"));
        if config.optimize_thresholds && config.problem_type.is_binary() {
            if let Some(threshold) = fitted.threshold() {
                logger.debug(&format!(
                    "\t\t\t{prefix}: Optimal threshold found ({threshold:.3})"
                ));
            }
        }

        logger.debug(&format!("\t\t\t{prefix}: Scoring trained pipeline"));
        let scores = fitted.score(x_score, y_score, &objectives, Some(x_train), Some(y_train))?;
        let score = scores
            .get(config.objective_name())
            .ok_or_else(|| AutoMLError::ObjectiveError {
                objective: config.objective_name().to_string(),
                reason: "missing from the pipeline's scores".to_string(),
            })?;
        logger.debug(&format!(
            "\t\t\t{prefix}: {} score: {score:.3}",
            config.objective_name()
        ));
        Ok((fitted, scores, training_hash))
    });

    match result {
        Ok((pipeline, scores, training_hash)) => FoldOutcome::Scored {
            pipeline,
            scores,
            training_hash,
        },
        Err(Failure { error, traceback }) => FoldOutcome::Failed { error, traceback },
    }
}

/// Turn a fold outcome into `(primary score, ordered scores, stored pipeline)`.
///
/// Successful folds cache their fitted components. Failed folds are
/// reported to the error callback and NaN-filled; a partial scoring failure
/// keeps the objectives that did score.
fn settle_outcome(
    outcome: FoldOutcome,
    config: &AutoMLConfig,
    fold_num: Option<usize>,
    template: &Arc<dyn Pipeline>,
    pipeline_cache: &mut PipelineCache,
) -> Result<(f64, ObjectiveScores, Arc<dyn Pipeline>)> {
    let objective_name = config.objective_name();
    match outcome {
        FoldOutcome::Scored {
            pipeline,
            scores,
            training_hash,
        } => {
            if let Some(hash) = training_hash {
                pipeline_cache.insert(hash, pipeline.component_instances());
            }
            let score = scores.get(objective_name).unwrap_or(f64::NAN);
            let mut ordered = ObjectiveScores::new();
            ordered.insert(objective_name, score);
            for (name, value) in scores.iter() {
                ordered.insert(name, value);
            }
            Ok((score, ordered, Arc::from(pipeline)))
        }
        FoldOutcome::Failed { error, traceback } => {
            if let Some(callback) = &config.error_callback {
                callback(&error, &traceback, config, fold_num, template.as_ref())?;
            }
            let scores: ObjectiveScores = match &error {
                AutoMLError::PipelineScore(partial) => config
                    .objectives_to_score()
                    .iter()
                    .map(|o| (o.name().to_string(), partial.score_or_nan(o.name())))
                    .collect(),
                _ => config
                    .objectives_to_score()
                    .iter()
                    .map(|o| (o.name().to_string(), f64::NAN))
                    .collect(),
            };
            let score = scores.get(objective_name).unwrap_or(f64::NAN);
            Ok((score, scores, Arc::clone(template)))
        }
    }
}
