//! Data splitter implementations.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use automl_api::SplitStrategy;
use automl_spi::{
    AutoMLError, DataSplitter, FeatureTable, ProblemType, Result, Split, Target, Value,
};

fn shuffled_positions(n_rows: usize, shuffle: bool, seed: u64) -> Vec<usize> {
    let mut positions: Vec<usize> = (0..n_rows).collect();
    if shuffle {
        positions.shuffle(&mut StdRng::seed_from_u64(seed));
    }
    positions
}

/// Complement of `validation` within `0..n_rows`, ascending.
fn complement(n_rows: usize, validation: &[usize]) -> Vec<usize> {
    let mut in_validation = vec![false; n_rows];
    for &p in validation {
        in_validation[p] = true;
    }
    (0..n_rows).filter(|&p| !in_validation[p]).collect()
}

fn split_from_validation(n_rows: usize, mut validation: Vec<usize>) -> Split {
    validation.sort_unstable();
    let train = complement(n_rows, &validation);
    Split::new(train, validation)
}

/// Row positions grouped by class, classes in ascending label order.
fn positions_by_class(y: &Target) -> BTreeMap<&Value, Vec<usize>> {
    let mut groups: BTreeMap<&Value, Vec<usize>> = BTreeMap::new();
    for (position, value) in y.values().iter().enumerate() {
        groups.entry(value).or_default().push(position);
    }
    groups
}

fn check_aligned(x: &FeatureTable, y: &Target) -> Result<()> {
    if x.n_rows() != y.len() {
        return Err(AutoMLError::LengthMismatch {
            context: "feature rows vs target length".to_string(),
            left: x.n_rows(),
            right: y.len(),
        });
    }
    Ok(())
}

/// K-Fold cross-validator.
#[derive(Debug, Clone)]
pub struct KFold {
    n_splits: usize,
    shuffle: bool,
    random_seed: u64,
}

impl KFold {
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: false,
            random_seed: 0,
        }
    }

    /// Shuffle rows (deterministically, from `seed`) before folding.
    pub fn shuffled(mut self, seed: u64) -> Self {
        self.shuffle = true;
        self.random_seed = seed;
        self
    }
}

impl DataSplitter for KFold {
    fn split(&self, x: &FeatureTable, y: &Target) -> Result<Vec<Split>> {
        check_aligned(x, y)?;
        if self.n_splits < 2 {
            return Err(AutoMLError::InvalidConfig("n_splits must be >= 2".into()));
        }
        let n_rows = y.len();
        if n_rows < self.n_splits {
            return Err(AutoMLError::InsufficientData {
                required: self.n_splits,
                actual: n_rows,
            });
        }

        let positions = shuffled_positions(n_rows, self.shuffle, self.random_seed);
        let base = n_rows / self.n_splits;
        let remainder = n_rows % self.n_splits;

        let mut splits = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for i in 0..self.n_splits {
            let size = base + usize::from(i < remainder);
            let validation = positions[start..start + size].to_vec();
            splits.push(split_from_validation(n_rows, validation));
            start += size;
        }
        Ok(splits)
    }

    fn n_splits(&self) -> usize {
        self.n_splits
    }
}

/// K-Fold cross-validator that keeps class proportions in every fold.
#[derive(Debug, Clone)]
pub struct StratifiedKFold {
    n_splits: usize,
    shuffle: bool,
    random_seed: u64,
}

impl StratifiedKFold {
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: false,
            random_seed: 0,
        }
    }

    pub fn shuffled(mut self, seed: u64) -> Self {
        self.shuffle = true;
        self.random_seed = seed;
        self
    }
}

impl DataSplitter for StratifiedKFold {
    fn split(&self, x: &FeatureTable, y: &Target) -> Result<Vec<Split>> {
        check_aligned(x, y)?;
        if self.n_splits < 2 {
            return Err(AutoMLError::InvalidConfig("n_splits must be >= 2".into()));
        }
        let n_rows = y.len();
        let groups = positions_by_class(y);
        let largest = groups.values().map(Vec::len).max().unwrap_or(0);
        if largest < self.n_splits {
            return Err(AutoMLError::InsufficientData {
                required: self.n_splits,
                actual: largest,
            });
        }
        if let Some((label, members)) = groups.iter().find(|(_, m)| m.len() < self.n_splits) {
            tracing::warn!(
                target: "automl",
                "class {} has only {} members, fewer than n_splits={}",
                label,
                members.len(),
                self.n_splits
            );
        }

        let mut rng = StdRng::seed_from_u64(self.random_seed);
        let mut folds: Vec<Vec<usize>> = vec![Vec::new(); self.n_splits];
        // Continue the round-robin across classes so fold sizes stay balanced.
        let mut next_fold = 0;
        for members in groups.values() {
            let mut members = members.clone();
            if self.shuffle {
                members.shuffle(&mut rng);
            }
            for position in members {
                folds[next_fold].push(position);
                next_fold = (next_fold + 1) % self.n_splits;
            }
        }

        Ok(folds
            .into_iter()
            .map(|validation| split_from_validation(n_rows, validation))
            .collect())
    }

    fn n_splits(&self) -> usize {
        self.n_splits
    }
}

/// Single train/validation split.
#[derive(Debug, Clone)]
pub struct TrainingValidationSplit {
    test_size: f64,
    shuffle: bool,
    stratify: bool,
    random_seed: u64,
}

impl TrainingValidationSplit {
    pub fn new(test_size: f64) -> Self {
        Self {
            test_size,
            shuffle: false,
            stratify: false,
            random_seed: 0,
        }
    }

    pub fn shuffled(mut self, seed: u64) -> Self {
        self.shuffle = true;
        self.random_seed = seed;
        self
    }

    /// Keep class proportions in both slices.
    pub fn stratified(mut self) -> Self {
        self.stratify = true;
        self
    }
}

impl DataSplitter for TrainingValidationSplit {
    fn split(&self, x: &FeatureTable, y: &Target) -> Result<Vec<Split>> {
        check_aligned(x, y)?;
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(AutoMLError::InvalidConfig(
                "test_size must be between 0 and 1 (exclusive)".into(),
            ));
        }
        let n_rows = y.len();

        let validation: Vec<usize> = if self.stratify {
            let mut rng = StdRng::seed_from_u64(self.random_seed);
            let mut validation = Vec::new();
            for members in positions_by_class(y).into_values() {
                let mut members = members;
                if self.shuffle {
                    members.shuffle(&mut rng);
                }
                let n_test = ((members.len() as f64) * self.test_size).round() as usize;
                validation.extend(members.into_iter().take(n_test));
            }
            validation
        } else {
            let n_test = ((n_rows as f64) * self.test_size).ceil() as usize;
            shuffled_positions(n_rows, self.shuffle, self.random_seed)
                .into_iter()
                .rev()
                .take(n_test)
                .collect()
        };

        if validation.is_empty() || validation.len() >= n_rows {
            return Err(AutoMLError::InsufficientData {
                required: 2,
                actual: n_rows,
            });
        }
        Ok(vec![split_from_validation(n_rows, validation)])
    }

    fn n_splits(&self) -> usize {
        1
    }
}

/// Expanding-window splitter for time-ordered rows.
///
/// Validation windows always come after their training rows, separated by
/// `gap` rows.
#[derive(Debug, Clone)]
pub struct TimeSeriesSplit {
    n_splits: usize,
    gap: usize,
}

impl TimeSeriesSplit {
    pub fn new(n_splits: usize) -> Self {
        Self { n_splits, gap: 0 }
    }

    pub fn with_gap(mut self, gap: usize) -> Self {
        self.gap = gap;
        self
    }
}

impl DataSplitter for TimeSeriesSplit {
    fn split(&self, x: &FeatureTable, y: &Target) -> Result<Vec<Split>> {
        check_aligned(x, y)?;
        if self.n_splits == 0 {
            return Err(AutoMLError::InvalidConfig("n_splits must be > 0".into()));
        }
        let n_rows = y.len();
        let test_size = n_rows / (self.n_splits + 1);
        let first_test_start = n_rows.saturating_sub(self.n_splits * test_size);
        if test_size == 0 || first_test_start <= self.gap {
            return Err(AutoMLError::InsufficientData {
                required: (self.n_splits + 1) + self.gap,
                actual: n_rows,
            });
        }

        Ok((0..self.n_splits)
            .map(|i| {
                let test_start = first_test_start + i * test_size;
                Split::new(
                    (0..test_start - self.gap).collect(),
                    (test_start..test_start + test_size).collect(),
                )
            })
            .collect())
    }

    fn n_splits(&self) -> usize {
        self.n_splits
    }
}

/// Create a splitter from a strategy.
pub fn create_data_splitter(
    strategy: &SplitStrategy,
    problem_type: ProblemType,
    random_seed: u64,
) -> Arc<dyn DataSplitter> {
    match *strategy {
        SplitStrategy::Auto { n_splits } => make_data_splitter(problem_type, n_splits, random_seed),
        SplitStrategy::KFold { n_splits, shuffle } => {
            let splitter = KFold::new(n_splits);
            Arc::new(if shuffle { splitter.shuffled(random_seed) } else { splitter })
        }
        SplitStrategy::StratifiedKFold { n_splits, shuffle } => {
            let splitter = StratifiedKFold::new(n_splits);
            Arc::new(if shuffle { splitter.shuffled(random_seed) } else { splitter })
        }
        SplitStrategy::TrainingValidation {
            test_size,
            shuffle,
            stratify,
        } => {
            let mut splitter = TrainingValidationSplit::new(test_size);
            if shuffle {
                splitter = splitter.shuffled(random_seed);
            }
            if stratify {
                splitter = splitter.stratified();
            }
            Arc::new(splitter)
        }
        SplitStrategy::TimeSeries { n_splits, gap } => {
            Arc::new(TimeSeriesSplit::new(n_splits).with_gap(gap))
        }
    }
}

/// Default splitter for a problem type.
///
/// Time series keep row order, classification stratifies, regression uses
/// plain shuffled K-Fold.
pub fn make_data_splitter(
    problem_type: ProblemType,
    n_splits: usize,
    random_seed: u64,
) -> Arc<dyn DataSplitter> {
    if problem_type.is_time_series() {
        Arc::new(TimeSeriesSplit::new(n_splits))
    } else if problem_type.is_classification() {
        Arc::new(StratifiedKFold::new(n_splits).shuffled(random_seed))
    } else {
        Arc::new(KFold::new(n_splits).shuffled(random_seed))
    }
}
