//! Data splitter contract.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{FeatureTable, Target};
use crate::Result;

/// One train/validation split, as row positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
}

impl Split {
    pub fn new(train: Vec<usize>, validation: Vec<usize>) -> Self {
        Self { train, validation }
    }
}

/// Produces the ordered, finite sequence of folds to evaluate on.
pub trait DataSplitter: Send + Sync + fmt::Debug {
    /// Split `(x, y)` into train/validation position sets.
    fn split(&self, x: &FeatureTable, y: &Target) -> Result<Vec<Split>>;

    /// Number of splits this splitter yields.
    fn n_splits(&self) -> usize;

    /// Whether this is a cross-validation splitter (more than one fold).
    fn is_cv(&self) -> bool {
        self.n_splits() > 1
    }
}
