//! Database abstraction layer for schema-probe.
//!
//! Drivers sit behind the [`Driver`] trait; the engine-specific catalog
//! queries sit behind [`Dialect`]. [`SchemaClient`] ties the two together
//! and is the only type callers normally need.

mod clickhouse;
mod client;
mod dialect;
mod executor;
mod mock;
mod mysql;
mod row;
mod schema;
mod tables;
mod types;

pub use clickhouse::ClickHouseDriver;
pub use client::SchemaClient;
pub use dialect::{ColumnarDialect, Dialect, RowStoreDialect};
pub use executor::QueryExecutor;
pub use mock::{FailingDriver, MockDriver};
pub use mysql::MySqlDriver;
pub use row::{map_row, CatalogRow};
pub use schema::{DatabaseSchema, TableSchema};
pub use types::{decode, RawValue, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;

/// How an engine stores data, which decides how its catalog is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Transactional engine that reports DDL as a single string (MySQL-style).
    RowStore,
    /// Analytical engine that reports schema as per-column rows (ClickHouse-style).
    Columnar,
}

/// Supported database backends (the driver tag of a connection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    #[serde(alias = "mariadb")]
    Mysql,
    #[serde(alias = "ch")]
    Clickhouse,
}

impl DatabaseBackend {
    /// Returns the backend as a string for persistence and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Clickhouse => "clickhouse",
        }
    }

    /// Parses a backend from a driver tag.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mysql" | "mariadb" => Some(Self::Mysql),
            "clickhouse" | "ch" => Some(Self::Clickhouse),
            _ => None,
        }
    }

    /// Returns the engine identity this backend speaks for.
    pub fn engine(&self) -> EngineKind {
        match self {
            Self::Mysql => EngineKind::RowStore,
            Self::Clickhouse => EngineKind::Columnar,
        }
    }
}

/// Opens the driver for the given configuration.
///
/// Connection failures are returned immediately; there are no retries.
pub async fn connect_driver(config: &ConnectionConfig) -> Result<Box<dyn Driver>> {
    match config.driver {
        DatabaseBackend::Mysql => {
            let driver = MySqlDriver::connect(&config.dsn).await?;
            Ok(Box::new(driver))
        }
        DatabaseBackend::Clickhouse => {
            let driver = ClickHouseDriver::connect(&config.dsn).await?;
            Ok(Box::new(driver))
        }
    }
}

/// A live connection that can run SQL.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Executes a statement with positional parameters and returns a cursor
    /// over its rows. Failures are reported as query errors.
    async fn query<'a>(
        &'a self,
        sql: &'a str,
        params: &'a [Value],
    ) -> Result<Box<dyn RowCursor + 'a>>;

    /// Closes the connection.
    async fn close(&self) -> Result<()>;
}

/// Rows produced by one statement.
///
/// Server-side state held by the cursor is released when it is dropped.
#[async_trait]
pub trait RowCursor: Send {
    /// Column names of the result set. Drivers that only learn column names
    /// from row data report them once the first row has been read.
    fn columns(&self) -> &[String];

    /// Reads the next row's positional values, or `None` when drained.
    async fn next_row(&mut self) -> Result<Option<Vec<RawValue>>>;
}
