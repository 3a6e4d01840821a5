//! Table enumeration.

use super::dialect::Dialect;
use super::executor::QueryExecutor;
use crate::error::Result;

/// Lists the tables of the connected database in catalog order.
///
/// Both a failing catalog query and a malformed catalog row abort the call.
pub async fn list_tables(executor: &QueryExecutor, dialect: &dyn Dialect) -> Result<Vec<String>> {
    let rows = executor
        .fetch_rows(dialect.list_tables_query(), &[])
        .await?;

    let mut tables = Vec::with_capacity(rows.len());
    for row in &rows {
        if let Some(name) = dialect.parse_table_row(row)? {
            tables.push(name);
        }
    }
    Ok(tables)
}
