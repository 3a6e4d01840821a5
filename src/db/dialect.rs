//! Engine-specific catalog queries and row interpretation.
//!
//! Every decision that depends on the engine lives here, so the enumerator
//! and the schema fetcher never branch on [`EngineKind`] themselves.

use super::executor::QueryExecutor;
use super::row::CatalogRow;
use super::EngineKind;
use crate::error::{ProbeError, Result};
use async_trait::async_trait;

/// Catalog capabilities of one engine family.
#[async_trait]
pub trait Dialect: Send + Sync {
    /// Engine identity this dialect implements.
    fn engine(&self) -> EngineKind;

    /// Catalog query that enumerates the tables of the current database.
    fn list_tables_query(&self) -> &'static str;

    /// Extracts the table name from one enumeration row, or `None` when the
    /// row describes something other than a table.
    fn parse_table_row(&self, row: &CatalogRow) -> Result<Option<String>>;

    /// Returns the engine's own DDL text for a table.
    async fn fetch_schema(&self, executor: &QueryExecutor, table: &str) -> Result<String>;

    /// Builds one line per column from the engine's DESCRIBE output.
    async fn fetch_desc_schema(
        &self,
        executor: &QueryExecutor,
        database: &str,
        table: &str,
    ) -> Result<String>;
}

/// Returns the dialect for an engine.
pub fn dialect_for(engine: EngineKind) -> Box<dyn Dialect> {
    match engine {
        EngineKind::RowStore => Box::new(RowStoreDialect),
        EngineKind::Columnar => Box::new(ColumnarDialect),
    }
}

/// MySQL-style engines.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowStoreDialect;

/// ClickHouse-style engines.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnarDialect;

#[async_trait]
impl Dialect for RowStoreDialect {
    fn engine(&self) -> EngineKind {
        EngineKind::RowStore
    }

    fn list_tables_query(&self) -> &'static str {
        "SHOW TABLE STATUS"
    }

    fn parse_table_row(&self, row: &CatalogRow) -> Result<Option<String>> {
        // Views have no storage engine.
        match row.get("Engine") {
            Some(engine) if !engine.is_null() => table_name(row, "Name").map(Some),
            _ => Ok(None),
        }
    }

    async fn fetch_schema(&self, executor: &QueryExecutor, table: &str) -> Result<String> {
        // (Table, Create Table)
        show_create(executor, table, 1).await
    }

    async fn fetch_desc_schema(
        &self,
        executor: &QueryExecutor,
        database: &str,
        table: &str,
    ) -> Result<String> {
        let rows = executor
            .fetch_rows(&describe_query(database, table), &[])
            .await?;
        let lines = rows
            .iter()
            .map(|row| {
                let (kind, expression) = match row.get("Default") {
                    Some(default) if !default.is_null() => ("DEFAULT", default.to_string()),
                    _ => ("", String::new()),
                };
                column_line(&row.text("Field"), &row.text("Type"), kind, &expression)
            })
            .collect::<Vec<_>>();
        Ok(lines.join("\n"))
    }
}

#[async_trait]
impl Dialect for ColumnarDialect {
    fn engine(&self) -> EngineKind {
        EngineKind::Columnar
    }

    fn list_tables_query(&self) -> &'static str {
        "SHOW TABLES"
    }

    fn parse_table_row(&self, row: &CatalogRow) -> Result<Option<String>> {
        table_name(row, "name").map(Some)
    }

    async fn fetch_schema(&self, executor: &QueryExecutor, table: &str) -> Result<String> {
        // (statement)
        show_create(executor, table, 0).await
    }

    async fn fetch_desc_schema(
        &self,
        executor: &QueryExecutor,
        database: &str,
        table: &str,
    ) -> Result<String> {
        let rows = executor
            .fetch_rows(&describe_query(database, table), &[])
            .await?;
        let lines = rows
            .iter()
            .map(|row| {
                column_line(
                    &row.text("name"),
                    &row.text("type"),
                    &row.text("default_type"),
                    &row.text("default_expression"),
                )
            })
            .collect::<Vec<_>>();
        Ok(lines.join("\n"))
    }
}

/// Quotes an identifier with back-ticks, doubling embedded back-ticks.
pub fn quote_ident(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

fn describe_query(database: &str, table: &str) -> String {
    format!(
        "DESCRIBE TABLE {}.{}",
        quote_ident(database),
        quote_ident(table)
    )
}

fn column_line(name: &str, data_type: &str, default_kind: &str, default_expr: &str) -> String {
    format!("`{name}` {data_type} {default_kind} {default_expr}")
}

fn table_name(row: &CatalogRow, column: &str) -> Result<String> {
    let name = row.require_str(column)?;
    if name.is_empty() {
        return Err(ProbeError::decode(format!(
            "column '{column}' holds an empty table name"
        )));
    }
    Ok(name.to_string())
}

/// Runs SHOW CREATE TABLE and returns the DDL found at `ddl_index` of the
/// last row. No rows yields an empty string.
async fn show_create(executor: &QueryExecutor, table: &str, ddl_index: usize) -> Result<String> {
    let sql = format!("SHOW CREATE TABLE {}", quote_ident(table));
    let rows = executor.fetch_rows(&sql, &[]).await?;
    let Some(row) = rows.last() else {
        return Ok(String::new());
    };
    match row.get_index(ddl_index) {
        Some(value) => value.as_str().map(str::to_string).ok_or_else(|| {
            ProbeError::decode(format!(
                "DDL column of SHOW CREATE TABLE for '{table}' is {}, expected string",
                value.kind()
            ))
        }),
        None => Err(ProbeError::decode(format!(
            "SHOW CREATE TABLE for '{table}' returned {} column(s), expected at least {}",
            row.len(),
            ddl_index + 1
        ))),
    }
}
