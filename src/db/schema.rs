//! Schema text retrieval and the whole-database schema description.
//!
//! Schema fetches degrade instead of failing: a query error is logged and
//! turned into empty schema text so one unreadable table does not abort a
//! full introspection run.

use super::dialect::Dialect;
use super::executor::QueryExecutor;
use super::EngineKind;
use crate::error::{ProbeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::warn;

/// Returns the DDL text of a table, or an empty string if the query fails.
pub async fn fetch_schema(
    executor: &QueryExecutor,
    dialect: &dyn Dialect,
    table: &str,
) -> Result<String> {
    degrade(table, dialect.fetch_schema(executor, table).await)
}

/// Returns the per-column description of `database.table`, or an empty
/// string if the query fails.
pub async fn fetch_desc_schema(
    executor: &QueryExecutor,
    dialect: &dyn Dialect,
    database: &str,
    table: &str,
) -> Result<String> {
    degrade(
        table,
        dialect.fetch_desc_schema(executor, database, table).await,
    )
}

fn degrade(table: &str, result: Result<String>) -> Result<String> {
    match result {
        Err(ProbeError::Query(msg)) => {
            warn!("Failed to fetch schema for table {}: {}", table, msg);
            Ok(String::new())
        }
        other => other,
    }
}

/// Schema text of every table in a database.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseSchema {
    /// Engine family that produced the schema text.
    pub engine: EngineKind,

    /// Tables in catalog order.
    pub tables: Vec<TableSchema>,
}

impl DatabaseSchema {
    /// Creates an empty schema for the given engine.
    pub fn new(engine: EngineKind) -> Self {
        Self {
            engine,
            tables: Vec::new(),
        }
    }

    /// Looks up a table by name.
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Formats the schema for terminal output.
    pub fn format_for_display(&self) -> String {
        self.tables
            .iter()
            .map(|table| {
                if table.schema.is_empty() {
                    format!("-- {}\n-- (schema unavailable)\n", table.name)
                } else {
                    format!("-- {}\n{}\n", table.name, table.schema)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Computes a hash of the schema content for change detection.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.engine.hash(&mut hasher);
        self.tables.len().hash(&mut hasher);
        for table in &self.tables {
            table.name.hash(&mut hasher);
            table.schema.hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// A table together with its schema text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TableSchema {
    /// Table name.
    pub name: String,

    /// DDL text, or synthesized column lines; empty when unavailable.
    pub schema: String,
}

impl TableSchema {
    /// Creates a table entry.
    pub fn new(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
        }
    }
}
