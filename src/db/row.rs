//! Named catalog rows.

use super::types::{decode, RawValue, Value};
use crate::error::{ProbeError, Result};

/// One row of a catalog query, keyed by column name in result-set order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogRow {
    fields: Vec<(String, Value)>,
}

impl CatalogRow {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column's value. A column that is already present keeps its
    /// position and takes the new value.
    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        let column = column.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column, value)),
        }
    }

    /// Returns the value of the named column.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Returns the value at the given column position.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.fields.get(index).map(|(_, value)| value)
    }

    /// Returns the named column as a string, failing with a decode error when
    /// it is absent or not a string.
    pub fn require_str(&self, column: &str) -> Result<&str> {
        match self.get(column) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(ProbeError::decode(format!(
                "column '{column}' is {}, expected string",
                other.kind()
            ))),
            None => Err(ProbeError::decode(format!(
                "column '{column}' is missing from catalog row"
            ))),
        }
    }

    /// Returns the named column rendered as text; missing and NULL columns
    /// render as the empty string.
    pub fn text(&self, column: &str) -> String {
        self.get(column)
            .map(Value::to_display_string)
            .unwrap_or_default()
    }

    /// Number of distinct columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Pairs column names with one row's positional values, decoding each value.
///
/// When a column name repeats, the later value wins.
pub fn map_row(columns: &[String], values: Vec<RawValue>) -> CatalogRow {
    let mut row = CatalogRow::new();
    for (column, raw) in columns.iter().zip(values) {
        row.insert(column.as_str(), decode(raw));
    }
    row
}
