//! Baseline pipelines.
//!
//! Constant predictors that every candidate should beat. They also serve as
//! reference implementations of the [`Pipeline`] contract.

use std::any::Any;
use std::sync::Arc;

use automl_spi::{
    AutoMLError, Component, ComponentInstances, FeatureTable, Objective, ObjectiveScores,
    Pipeline, ProblemType, Result, Target, Value,
};

use crate::objective::score_all_objectives;

/// Fitted state of [`BaselineClassificationPipeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct ModeClassifier {
    /// Training labels in ascending order; a label's position is its class code.
    pub classes: Vec<Value>,
    pub mode: Value,
    /// Share of training rows in the positive (last) class.
    pub positive_rate: f64,
}

impl Component for ModeClassifier {
    fn name(&self) -> &str {
        "Baseline Classifier"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Predicts the most frequent training label.
///
/// For binary problems it also predicts the positive-class training rate as
/// probability and honours a decision threshold.
#[derive(Debug, Clone)]
pub struct BaselineClassificationPipeline {
    problem_type: ProblemType,
    random_seed: u64,
    threshold: Option<f64>,
    fitted: Option<Arc<ModeClassifier>>,
}

impl BaselineClassificationPipeline {
    pub fn new(problem_type: ProblemType) -> Result<Self> {
        if !problem_type.is_classification() {
            return Err(AutoMLError::InvalidConfig(format!(
                "classification baseline cannot solve a {problem_type} problem"
            )));
        }
        Ok(Self {
            problem_type,
            random_seed: 0,
            threshold: None,
            fitted: None,
        })
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    fn fitted(&self) -> Result<&ModeClassifier> {
        self.fitted.as_deref().ok_or_else(|| {
            AutoMLError::PredictionError(format!("pipeline '{}' is not fitted", self.name()))
        })
    }

    fn class_codes(&self, labels: &[Value]) -> Result<Vec<f64>> {
        let fitted = self.fitted()?;
        labels
            .iter()
            .map(|label| {
                fitted
                    .classes
                    .binary_search(label)
                    .map(|code| code as f64)
                    .map_err(|_| {
                        AutoMLError::PredictionError(format!("unknown class label '{label}'"))
                    })
            })
            .collect()
    }
}

impl Pipeline for BaselineClassificationPipeline {
    fn name(&self) -> &str {
        "Mode Baseline Classification Pipeline"
    }

    fn problem_type(&self) -> ProblemType {
        self.problem_type
    }

    fn random_seed(&self) -> u64 {
        self.random_seed
    }

    fn clone_pipeline(&self) -> Box<dyn Pipeline> {
        Box::new(Self {
            threshold: None,
            fitted: None,
            ..self.clone()
        })
    }

    fn fit(&mut self, _x: &FeatureTable, y: &Target) -> Result<()> {
        let counts = y.value_counts();
        let mode = counts
            .first()
            .map(|(label, _)| label.clone())
            .ok_or_else(|| AutoMLError::FitError("cannot fit on an empty target".to_string()))?;
        let mut classes: Vec<Value> = counts.iter().map(|(label, _)| label.clone()).collect();
        classes.sort();

        let positive_rate = if self.problem_type.is_binary() && classes.len() > 1 {
            let positive = &classes[classes.len() - 1];
            let count = counts
                .iter()
                .find(|(label, _)| label == positive)
                .map_or(0, |(_, count)| *count);
            count as f64 / y.len() as f64
        } else {
            0.0
        };

        self.fitted = Some(Arc::new(ModeClassifier {
            classes,
            mode,
            positive_rate,
        }));
        Ok(())
    }

    fn predict(&self, x: &FeatureTable) -> Result<Vec<Value>> {
        let fitted = self.fitted()?;
        let label = match (self.problem_type.is_binary(), self.threshold) {
            (true, Some(threshold)) if fitted.classes.len() > 1 => {
                let code = usize::from(fitted.positive_rate > threshold);
                fitted.classes[code].clone()
            }
            _ => fitted.mode.clone(),
        };
        Ok(vec![label; x.n_rows()])
    }

    fn predict_proba(&self, x: &FeatureTable) -> Result<Vec<f64>> {
        if !self.problem_type.is_binary() {
            return Err(AutoMLError::PredictionError(
                "probabilities are only produced for binary problems".to_string(),
            ));
        }
        Ok(vec![self.fitted()?.positive_rate; x.n_rows()])
    }

    fn score(
        &self,
        x: &FeatureTable,
        y: &Target,
        objectives: &[Arc<dyn Objective>],
        _x_train: Option<&FeatureTable>,
        _y_train: Option<&Target>,
    ) -> Result<ObjectiveScores> {
        let y_true = self.class_codes(y.values())?;
        let y_pred = self.class_codes(&self.predict(x)?)?;
        let y_proba = self.predict_proba(x).ok();
        score_all_objectives(objectives, &y_true, &y_pred, y_proba.as_deref())
    }

    fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    fn set_threshold(&mut self, threshold: Option<f64>) {
        self.threshold = threshold;
    }

    fn optimize_threshold(
        &mut self,
        x: &FeatureTable,
        y: &Target,
        objective: &dyn Objective,
    ) -> Result<()> {
        let proba = self.predict_proba(x)?;
        let y_true = self.class_codes(y.values())?;
        self.threshold = Some(objective.optimize_threshold(&proba, &y_true)?);
        Ok(())
    }

    fn component_instances(&self) -> ComponentInstances {
        let mut components = ComponentInstances::new();
        if let Some(fitted) = &self.fitted {
            components.insert(
                fitted.name().to_string(),
                Arc::clone(fitted) as Arc<dyn Component>,
            );
        }
        components
    }
}

/// Fitted state of [`BaselineRegressionPipeline`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanRegressor {
    pub mean: f64,
}

impl Component for MeanRegressor {
    fn name(&self) -> &str {
        "Baseline Regressor"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Predicts the training mean.
#[derive(Debug, Clone)]
pub struct BaselineRegressionPipeline {
    problem_type: ProblemType,
    random_seed: u64,
    fitted: Option<Arc<MeanRegressor>>,
}

impl BaselineRegressionPipeline {
    pub fn new(problem_type: ProblemType) -> Result<Self> {
        if !problem_type.is_regression() {
            return Err(AutoMLError::InvalidConfig(format!(
                "regression baseline cannot solve a {problem_type} problem"
            )));
        }
        Ok(Self {
            problem_type,
            random_seed: 0,
            fitted: None,
        })
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    fn mean(&self) -> Result<f64> {
        self.fitted.as_ref().map(|f| f.mean).ok_or_else(|| {
            AutoMLError::PredictionError(format!("pipeline '{}' is not fitted", self.name()))
        })
    }
}

fn numeric_target(y: &Target) -> Result<Vec<f64>> {
    y.to_f64()
        .ok_or_else(|| AutoMLError::FitError("regression target must be numeric".to_string()))
}

impl Pipeline for BaselineRegressionPipeline {
    fn name(&self) -> &str {
        "Mean Baseline Regression Pipeline"
    }

    fn problem_type(&self) -> ProblemType {
        self.problem_type
    }

    fn random_seed(&self) -> u64 {
        self.random_seed
    }

    fn clone_pipeline(&self) -> Box<dyn Pipeline> {
        Box::new(Self {
            fitted: None,
            ..self.clone()
        })
    }

    fn fit(&mut self, _x: &FeatureTable, y: &Target) -> Result<()> {
        let values = numeric_target(y)?;
        if values.is_empty() {
            return Err(AutoMLError::FitError("cannot fit on an empty target".to_string()));
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        self.fitted = Some(Arc::new(MeanRegressor { mean }));
        Ok(())
    }

    fn predict(&self, x: &FeatureTable) -> Result<Vec<Value>> {
        Ok(vec![Value::from(self.mean()?); x.n_rows()])
    }

    fn score(
        &self,
        x: &FeatureTable,
        y: &Target,
        objectives: &[Arc<dyn Objective>],
        _x_train: Option<&FeatureTable>,
        _y_train: Option<&Target>,
    ) -> Result<ObjectiveScores> {
        let y_true = numeric_target(y)?;
        let y_pred = vec![self.mean()?; x.n_rows()];
        score_all_objectives(objectives, &y_true, &y_pred, None)
    }

    fn component_instances(&self) -> ComponentInstances {
        let mut components = ComponentInstances::new();
        if let Some(fitted) = &self.fitted {
            components.insert(
                fitted.name().to_string(),
                Arc::clone(fitted) as Arc<dyn Component>,
            );
        }
        components
    }
}
