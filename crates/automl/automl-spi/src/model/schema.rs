//! Logical type schemas for feature tables and targets.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Value;
use crate::error::AutoMLError;
use crate::Result;

/// Semantic type annotation of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LogicalType {
    Boolean,
    Categorical,
    Datetime,
    Double,
    Integer,
    NaturalLanguage,
    #[default]
    Unknown,
}

impl LogicalType {
    /// Whether `value` can be stored in a column of this type.
    ///
    /// Missing values are accepted by every type. Datetimes are stored as
    /// epoch numbers or ISO-8601 text.
    pub fn accepts(&self, value: &Value) -> bool {
        if value.is_missing() {
            return true;
        }
        match self {
            LogicalType::Boolean => matches!(value, Value::Bool(_)),
            LogicalType::Double => matches!(value, Value::Number(_)),
            LogicalType::Integer => {
                matches!(value, Value::Number(n) if n.is_finite() && n.fract() == 0.0)
            }
            LogicalType::Datetime => matches!(value, Value::Number(_) | Value::Text(_)),
            LogicalType::NaturalLanguage => matches!(value, Value::Text(_)),
            LogicalType::Categorical | LogicalType::Unknown => true,
        }
    }
}

/// Schema of a single column: its logical type plus free-form semantic tags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub logical_type: LogicalType,
    #[serde(default)]
    pub semantic_tags: BTreeSet<String>,
}

impl ColumnSchema {
    pub fn new(logical_type: LogicalType) -> Self {
        Self {
            logical_type,
            semantic_tags: BTreeSet::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.semantic_tags.insert(tag.into());
        self
    }

    /// Check every value against the logical type.
    pub fn validate(&self, column: &str, values: &[Value]) -> Result<()> {
        match values.iter().find(|v| !self.logical_type.accepts(v)) {
            Some(bad) => Err(AutoMLError::SchemaMismatch {
                column: column.to_string(),
                reason: format!("value '{bad}' is not a valid {:?}", self.logical_type),
            }),
            None => Ok(()),
        }
    }
}

/// Ordered schema of a feature table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableSchema {
    pub columns: Vec<(String, ColumnSchema)>,
}

impl TableSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, name: impl Into<String>, schema: ColumnSchema) -> Self {
        self.columns.push((name.into(), schema));
        self
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, schema)| schema)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }
}
