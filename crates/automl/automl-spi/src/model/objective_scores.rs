//! Insertion-ordered objective scores.

use serde::{Deserialize, Serialize};

/// Mapping from objective name to score that keeps insertion order.
///
/// Inserting an existing name overwrites its score in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveScores(Vec<(String, f64)>);

impl ObjectiveScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, score: f64) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = score,
            None => self.0.push((name, score)),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, s)| *s)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(n, _)| n == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(n, s)| (n.as_str(), *s))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ObjectiveScores {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut scores = ObjectiveScores::new();
        for (name, score) in iter {
            scores.insert(name, score);
        }
        scores
    }
}
