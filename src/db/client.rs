//! The connection handle callers introspect through.

use super::dialect::{dialect_for, Dialect};
use super::executor::QueryExecutor;
use super::schema::{self, DatabaseSchema, TableSchema};
use super::{connect_driver, tables, Driver, EngineKind};
use crate::config::ConnectionConfig;
use crate::error::Result;
use tracing::debug;

/// One live connection plus everything needed to read its catalog.
///
/// The engine identity is fixed at construction. The cluster label is kept
/// for callers but does not change the statements issued.
pub struct SchemaClient {
    executor: QueryExecutor,
    dialect: Box<dyn Dialect>,
    cluster: Option<String>,
}

impl SchemaClient {
    /// Connects using the given configuration. Fails fast on connection errors.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let driver = connect_driver(config).await?;
        let client = Self::new(
            driver,
            config.driver.engine(),
            config.label(),
            config.cluster.clone(),
        );
        debug!(
            "Connected to {} ({:?}, cluster: {:?})",
            client.db_type(),
            client.engine(),
            client.cluster()
        );
        Ok(client)
    }

    /// Wraps an already open driver.
    pub fn new(
        driver: Box<dyn Driver>,
        engine: EngineKind,
        db_type: impl Into<String>,
        cluster: Option<String>,
    ) -> Self {
        Self {
            executor: QueryExecutor::new(driver, db_type),
            dialect: dialect_for(engine),
            cluster,
        }
    }

    /// Engine identity of this connection.
    pub fn engine(&self) -> EngineKind {
        self.dialect.engine()
    }

    /// Free-text database type label used in query logs.
    pub fn db_type(&self) -> &str {
        self.executor.db_type()
    }

    /// Cluster label from the connection descriptor, if any.
    pub fn cluster(&self) -> Option<&str> {
        self.cluster.as_deref()
    }

    /// Lists table names in catalog order. Views are excluded where the
    /// engine's catalog distinguishes them.
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        tables::list_tables(&self.executor, self.dialect.as_ref()).await
    }

    /// Returns the engine-reported DDL of a table, or an empty string when
    /// the query fails.
    pub async fn get_schema(&self, table: &str) -> Result<String> {
        schema::fetch_schema(&self.executor, self.dialect.as_ref(), table).await
    }

    /// Returns one synthesized line per column of `database.table`, or an
    /// empty string when the query fails.
    pub async fn get_desc_schema(&self, database: &str, table: &str) -> Result<String> {
        schema::fetch_desc_schema(&self.executor, self.dialect.as_ref(), database, table).await
    }

    /// Lists every table and fetches its schema, one query at a time.
    pub async fn introspect(&self) -> Result<DatabaseSchema> {
        let mut result = DatabaseSchema::new(self.engine());
        for name in self.list_tables().await? {
            let schema = self.get_schema(&name).await?;
            result.tables.push(TableSchema::new(name, schema));
        }
        Ok(result)
    }

    /// Closes the underlying connection.
    pub async fn close(&self) -> Result<()> {
        self.executor.close().await
    }
}
