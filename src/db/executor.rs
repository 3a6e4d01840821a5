//! Query execution with per-query logging.

use super::row::{map_row, CatalogRow};
use super::types::Value;
use super::{Driver, RowCursor};
use crate::error::Result;
use tracing::info;

/// Owns the live driver and the label used when logging its queries.
pub struct QueryExecutor {
    driver: Box<dyn Driver>,
    db_type: String,
}

impl QueryExecutor {
    /// Creates an executor over the given driver.
    pub fn new(driver: Box<dyn Driver>, db_type: impl Into<String>) -> Self {
        Self {
            driver,
            db_type: db_type.into(),
        }
    }

    /// Returns the free-text database type label.
    pub fn db_type(&self) -> &str {
        &self.db_type
    }

    /// Executes a statement and returns its row cursor.
    ///
    /// The query is logged before it is dispatched, so failing queries are
    /// logged too. The cursor is released when it is dropped.
    pub async fn execute<'a>(
        &'a self,
        sql: &'a str,
        params: &'a [Value],
    ) -> Result<Box<dyn RowCursor + 'a>> {
        info!("[SQL] [{}] {} {:?}", self.db_type, sql, params);
        self.driver.query(sql, params).await
    }

    /// Executes a statement and maps every row it returns.
    pub async fn fetch_rows(&self, sql: &str, params: &[Value]) -> Result<Vec<CatalogRow>> {
        let mut cursor = self.execute(sql, params).await?;
        let mut rows = Vec::new();
        while let Some(values) = cursor.next_row().await? {
            rows.push(map_row(cursor.columns(), values));
        }
        Ok(rows)
    }

    /// Closes the underlying connection.
    pub async fn close(&self) -> Result<()> {
        self.driver.close().await
    }
}
