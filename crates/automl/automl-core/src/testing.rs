//! Mock pipelines shared by the unit tests.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use automl_api::{AutoMLConfig, AutoMLConfigBuilder};
use automl_spi::{
    AutoMLError, Component, ComponentInstances, DataSplitter, FeatureTable, Objective,
    ObjectiveScores, Pipeline, PipelineScoreError, ProblemType, Result, Split, Target, Value,
};

/// Failure a [`MockPipeline`] injects.
#[derive(Debug, Clone)]
pub(crate) enum Fault {
    Fit,
    Panic,
    /// Scoring fails for the named objectives only.
    PartialScore(Vec<&'static str>),
}

#[derive(Debug)]
pub(crate) struct MockComponent {
    pub rows: Vec<usize>,
}

impl Component for MockComponent {
    fn name(&self) -> &str {
        "Mock Estimator"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Records every call into a shared journal so tests can inspect what
/// clones did.
#[derive(Debug, Clone)]
pub(crate) struct MockPipeline {
    pub problem_type: ProblemType,
    pub fault: Option<Fault>,
    /// Fault fires only on folds that did not train on this row label.
    pub fault_row: Option<usize>,
    pub score: f64,
    /// Score with the number of fitted rows instead of `score`.
    pub score_from_rows: bool,
    pub tuned_threshold: f64,
    pub threshold: Option<f64>,
    pub fitted_rows: Option<Vec<usize>>,
    pub journal: Arc<Mutex<Vec<String>>>,
}

impl MockPipeline {
    pub fn new(problem_type: ProblemType) -> Self {
        Self {
            problem_type,
            fault: None,
            fault_row: None,
            score: 0.5,
            score_from_rows: false,
            tuned_threshold: 0.42,
            threshold: None,
            fitted_rows: None,
            journal: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_fault(mut self, fault: Fault, row: Option<usize>) -> Self {
        self.fault = Some(fault);
        self.fault_row = row;
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn scoring_by_rows(mut self) -> Self {
        self.score_from_rows = true;
        self
    }

    pub fn journal(&self) -> Vec<String> {
        self.journal.lock().unwrap().clone()
    }

    fn record(&self, entry: String) {
        self.journal.lock().unwrap().push(entry);
    }

    fn fault_fires(&self, rows: &[usize]) -> bool {
        match self.fault_row {
            Some(row) => !rows.contains(&row),
            None => true,
        }
    }
}

impl Pipeline for MockPipeline {
    fn name(&self) -> &str {
        "Mock Pipeline"
    }

    fn problem_type(&self) -> ProblemType {
        self.problem_type
    }

    fn random_seed(&self) -> u64 {
        3
    }

    fn clone_pipeline(&self) -> Box<dyn Pipeline> {
        Box::new(Self {
            threshold: None,
            fitted_rows: None,
            ..self.clone()
        })
    }

    fn fit(&mut self, x: &FeatureTable, _y: &Target) -> Result<()> {
        self.record(format!("fit:{}", x.n_rows()));
        let rows = x.index().to_vec();
        match &self.fault {
            Some(Fault::Fit) if self.fault_fires(&rows) => {
                return Err(AutoMLError::FitError("singular matrix".to_string()))
            }
            Some(Fault::Panic) if self.fault_fires(&rows) => panic!("estimator panicked"),
            _ => {}
        }
        self.fitted_rows = Some(rows);
        Ok(())
    }

    fn predict(&self, x: &FeatureTable) -> Result<Vec<Value>> {
        Ok(vec![Value::from(0.0); x.n_rows()])
    }

    fn predict_proba(&self, x: &FeatureTable) -> Result<Vec<f64>> {
        Ok(vec![0.5; x.n_rows()])
    }

    fn score(
        &self,
        x: &FeatureTable,
        _y: &Target,
        objectives: &[Arc<dyn Objective>],
        x_train: Option<&FeatureTable>,
        _y_train: Option<&Target>,
    ) -> Result<ObjectiveScores> {
        self.record(format!(
            "score:{}:train={}",
            x.n_rows(),
            x_train.map_or(0, FeatureTable::n_rows)
        ));
        let rows = self
            .fitted_rows
            .as_ref()
            .ok_or_else(|| AutoMLError::PredictionError("not fitted".to_string()))?;
        let score = if self.score_from_rows {
            rows.len() as f64
        } else {
            self.score
        };
        if let Some(Fault::PartialScore(failing)) = &self.fault {
            if self.fault_fires(rows) {
                let mut exceptions = BTreeMap::new();
                let mut scored = BTreeMap::new();
                for objective in objectives {
                    if failing.contains(&objective.name()) {
                        exceptions.insert(objective.name().to_string(), "boom".to_string());
                    } else {
                        scored.insert(objective.name().to_string(), score);
                    }
                }
                return Err(PipelineScoreError::new(exceptions, scored).into());
            }
        }
        Ok(objectives.iter().map(|o| (o.name(), score)).collect())
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
        _y: &Target,
        objective: &dyn Objective,
    ) -> Result<()> {
        self.record(format!("tune:{}:{}", x.n_rows(), objective.name()));
        self.threshold = Some(self.tuned_threshold);
        Ok(())
    }

    fn component_instances(&self) -> ComponentInstances {
        let mut components = ComponentInstances::new();
        if let Some(rows) = &self.fitted_rows {
            components.insert(
                "Mock Estimator".to_string(),
                Arc::new(MockComponent { rows: rows.clone() }) as Arc<dyn Component>,
            );
        }
        components
    }
}

/// Yields a fixed list of splits.
#[derive(Debug)]
pub(crate) struct FixedSplitter(pub Vec<Split>);

impl DataSplitter for FixedSplitter {
    fn split(&self, _x: &FeatureTable, _y: &Target) -> Result<Vec<Split>> {
        Ok(self.0.clone())
    }

    fn n_splits(&self) -> usize {
        self.0.len()
    }
}

pub(crate) fn binary_data(n_rows: usize) -> (FeatureTable, Target) {
    let labels: Vec<f64> = (0..n_rows).map(|i| (i % 2) as f64).collect();
    (FeatureTable::empty(n_rows), Target::from_f64(&labels))
}

pub(crate) fn config_for(
    problem_type: ProblemType,
    objective: Arc<dyn Objective>,
    splitter: Arc<dyn DataSplitter>,
) -> AutoMLConfigBuilder {
    AutoMLConfigBuilder::new(problem_type, objective, splitter)
}

pub(crate) fn build(builder: AutoMLConfigBuilder) -> AutoMLConfig {
    builder.build().unwrap()
}
