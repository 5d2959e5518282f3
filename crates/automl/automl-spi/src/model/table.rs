//! Feature tables, targets and datasets.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{ColumnSchema, TableSchema, Value};
use crate::error::AutoMLError;
use crate::Result;

/// A named column of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Build a numeric column.
    pub fn numeric(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(name, values.iter().copied().map(Value::from).collect())
    }
}

/// Feature table (X): named columns aligned on a row index.
///
/// The index holds the original row labels; position-based selection keeps
/// them so that slices can be traced back to the rows they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    columns: Vec<Column>,
    index: Vec<usize>,
    schema: Option<TableSchema>,
}

impl FeatureTable {
    /// Create a table with a default `0..n` index.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map_or(0, |c| c.values.len());
        for column in &columns {
            if column.values.len() != n_rows {
                return Err(AutoMLError::LengthMismatch {
                    context: format!("column '{}'", column.name),
                    left: column.values.len(),
                    right: n_rows,
                });
            }
        }
        Ok(Self {
            columns,
            index: (0..n_rows).collect(),
            schema: None,
        })
    }

    /// Table with `n_rows` rows and no columns.
    pub fn empty(n_rows: usize) -> Self {
        Self {
            columns: Vec::new(),
            index: (0..n_rows).collect(),
            schema: None,
        }
    }

    /// Replace the row labels.
    pub fn with_index(mut self, index: Vec<usize>) -> Result<Self> {
        if index.len() != self.index.len() {
            return Err(AutoMLError::LengthMismatch {
                context: "feature table index".to_string(),
                left: index.len(),
                right: self.index.len(),
            });
        }
        self.index = index;
        Ok(self)
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn index(&self) -> &[usize] {
        &self.index
    }

    pub fn schema(&self) -> Option<&TableSchema> {
        self.schema.as_ref()
    }

    /// Select rows by position, keeping row labels and schema.
    pub fn take(&self, positions: &[usize]) -> Result<Self> {
        check_positions(positions, self.n_rows())?;
        Ok(Self {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: positions.iter().map(|&p| c.values[p].clone()).collect(),
                })
                .collect(),
            index: positions.iter().map(|&p| self.index[p]).collect(),
            schema: self.schema.clone(),
        })
    }

    /// Attach `schema` after checking columns and values conform to it.
    pub fn init_schema(&mut self, schema: &TableSchema) -> Result<()> {
        let expected: Vec<&str> = schema.column_names().collect();
        let actual: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        if expected != actual {
            return Err(AutoMLError::SchemaMismatch {
                column: "<table>".to_string(),
                reason: format!("expected columns {expected:?}, found {actual:?}"),
            });
        }
        for (column, (_, column_schema)) in self.columns.iter().zip(&schema.columns) {
            column_schema.validate(&column.name, &column.values)?;
        }
        self.schema = Some(schema.clone());
        Ok(())
    }
}

/// Target (y): values aligned with a feature table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    name: Option<String>,
    values: Vec<Value>,
    index: Vec<usize>,
    schema: Option<ColumnSchema>,
}

impl Target {
    pub fn new(values: Vec<Value>) -> Self {
        let index = (0..values.len()).collect();
        Self {
            name: None,
            values,
            index,
            schema: None,
        }
    }

    pub fn from_f64(values: &[f64]) -> Self {
        Self::new(values.iter().copied().map(Value::from).collect())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_index(mut self, index: Vec<usize>) -> Result<Self> {
        if index.len() != self.values.len() {
            return Err(AutoMLError::LengthMismatch {
                context: "target index".to_string(),
                left: index.len(),
                right: self.values.len(),
            });
        }
        self.index = index;
        Ok(self)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn index(&self) -> &[usize] {
        &self.index
    }

    pub fn schema(&self) -> Option<&ColumnSchema> {
        self.schema.as_ref()
    }

    /// Numeric view of every value; `None` if any value is non-numeric.
    pub fn to_f64(&self) -> Option<Vec<f64>> {
        self.values.iter().map(Value::as_f64).collect()
    }

    /// Distinct values with their counts, most frequent first.
    ///
    /// Ties keep the order in which values first appear.
    pub fn value_counts(&self) -> Vec<(Value, usize)> {
        let mut order: Vec<Value> = Vec::new();
        let mut counts: HashMap<&Value, usize> = HashMap::new();
        for value in &self.values {
            let count = counts.entry(value).or_insert(0);
            if *count == 0 {
                order.push(value.clone());
            }
            *count += 1;
        }
        let mut result: Vec<(Value, usize)> = order
            .into_iter()
            .map(|v| {
                let count = counts[&v];
                (v, count)
            })
            .collect();
        result.sort_by(|a, b| b.1.cmp(&a.1));
        result
    }

    /// Distinct values in order of first appearance.
    pub fn unique(&self) -> Vec<Value> {
        let mut seen = std::collections::HashSet::new();
        self.values
            .iter()
            .filter(|v| seen.insert(*v))
            .cloned()
            .collect()
    }

    /// Same index and schema, new values.
    pub fn map_values(&self, values: Vec<Value>) -> Result<Self> {
        if values.len() != self.values.len() {
            return Err(AutoMLError::LengthMismatch {
                context: "mapped target".to_string(),
                left: values.len(),
                right: self.values.len(),
            });
        }
        Ok(Self {
            name: self.name.clone(),
            values,
            index: self.index.clone(),
            schema: self.schema.clone(),
        })
    }

    /// Select rows by position, keeping row labels and schema.
    pub fn take(&self, positions: &[usize]) -> Result<Self> {
        check_positions(positions, self.len())?;
        Ok(Self {
            name: self.name.clone(),
            values: positions.iter().map(|&p| self.values[p].clone()).collect(),
            index: positions.iter().map(|&p| self.index[p]).collect(),
            schema: self.schema.clone(),
        })
    }

    /// Attach `schema` after checking every value conforms to it.
    pub fn init_schema(&mut self, schema: &ColumnSchema) -> Result<()> {
        schema.validate(self.name().unwrap_or("target"), &self.values)?;
        self.schema = Some(schema.clone());
        Ok(())
    }
}

fn check_positions(positions: &[usize], n_rows: usize) -> Result<()> {
    match positions.iter().find(|&&p| p >= n_rows) {
        Some(&p) => Err(AutoMLError::InvalidConfig(format!(
            "row position {p} out of bounds for {n_rows} rows"
        ))),
        None => Ok(()),
    }
}

/// Features and target whose row counts agree.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub x: FeatureTable,
    pub y: Target,
}

impl Dataset {
    pub fn new(x: FeatureTable, y: Target) -> Result<Self> {
        if x.n_rows() != y.len() {
            return Err(AutoMLError::LengthMismatch {
                context: "feature rows vs target length".to_string(),
                left: x.n_rows(),
                right: y.len(),
            });
        }
        Ok(Self { x, y })
    }

    pub fn n_rows(&self) -> usize {
        self.y.len()
    }

    pub fn into_parts(self) -> (FeatureTable, Target) {
        (self.x, self.y)
    }
}
