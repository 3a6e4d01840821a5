//! Configuration management for schema-probe.
//!
//! Handles loading named connections from a TOML file and building
//! connection descriptors from connection strings.

use crate::db::DatabaseBackend;
use crate::error::{ProbeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use url::Url;

/// Main configuration structure for schema-probe.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Named database connections.
    #[serde(default)]
    pub connections: HashMap<String, ConnectionConfig>,
}

/// Database connection descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConnectionConfig {
    /// Connection string handed to the driver.
    pub dsn: String,

    /// Driver tag; decides the engine identity.
    #[serde(default)]
    pub driver: DatabaseBackend,

    /// Free-text label used in query logs. Defaults to the driver name.
    #[serde(default)]
    pub db_type: String,

    /// Cluster name for clustered columnar deployments.
    #[serde(default)]
    pub cluster: Option<String>,
}

impl ConnectionConfig {
    /// Creates a descriptor for the given DSN and driver.
    pub fn new(dsn: impl Into<String>, driver: DatabaseBackend) -> Self {
        Self {
            dsn: dsn.into(),
            driver,
            ..Default::default()
        }
    }

    /// Creates a descriptor from a connection string, inferring the driver
    /// from its scheme.
    ///
    /// `mysql://` and `mariadb://` select MySQL; `clickhouse://`, `http://`
    /// and `https://` select ClickHouse.
    pub fn from_connection_string(conn_str: &str) -> Result<Self> {
        let url = Url::parse(conn_str)
            .map_err(|e| ProbeError::config(format!("Invalid connection string: {e}")))?;

        let driver = match url.scheme() {
            "mysql" | "mariadb" => DatabaseBackend::Mysql,
            "clickhouse" | "http" | "https" => DatabaseBackend::Clickhouse,
            other => {
                return Err(ProbeError::config(format!(
                    "Invalid scheme '{other}'. Expected 'mysql', 'mariadb', 'clickhouse', 'http' or 'https'"
                )))
            }
        };

        Ok(Self::new(conn_str, driver))
    }

    /// Sets the logging label.
    pub fn with_db_type(mut self, db_type: impl Into<String>) -> Self {
        self.db_type = db_type.into();
        self
    }

    /// Sets the cluster label.
    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    /// Returns the logging label, falling back to the driver name.
    pub fn label(&self) -> String {
        if self.db_type.is_empty() {
            self.driver.as_str().to_string()
        } else {
            self.db_type.clone()
        }
    }

    /// Returns the database named in the DSN path, if any.
    pub fn database(&self) -> Option<String> {
        let url = Url::parse(&self.dsn).ok()?;
        let path = url.path().trim_start_matches('/');
        if !path.is_empty() {
            return Some(path.to_string());
        }
        url.query_pairs()
            .find(|(k, _)| k == "database")
            .map(|(_, v)| v.into_owned())
    }

    /// Overrides fields with the non-empty values of `other`.
    pub fn merge(&mut self, other: &ConnectionConfig) {
        if !other.dsn.is_empty() {
            self.dsn = other.dsn.clone();
            self.driver = other.driver;
        }
        if !other.db_type.is_empty() {
            self.db_type = other.db_type.clone();
        }
        if other.cluster.is_some() {
            self.cluster = other.cluster.clone();
        }
    }

    /// Returns a display-safe string (no password) for logs and output.
    pub fn display_string(&self) -> String {
        format!("{} ({})", redact_dsn(&self.dsn), self.label())
    }
}

/// Returns the DSN with its password masked, both in the userinfo and in a
/// `password` query parameter.
pub fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("***"));
            }
            if url.query_pairs().any(|(k, _)| k == "password") {
                let pairs: Vec<(String, String)> = url
                    .query_pairs()
                    .map(|(k, v)| {
                        let v = if k == "password" { "***".into() } else { v };
                        (k.into_owned(), v.into_owned())
                    })
                    .collect();
                url.query_pairs_mut().clear().extend_pairs(pairs);
            }
            url.to_string()
        }
        Err(_) => "<unparseable dsn>".to_string(),
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("schema-probe")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ProbeError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ProbeError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Gets a named connection, or the default connection if name is None.
    pub fn get_connection(&self, name: Option<&str>) -> Option<&ConnectionConfig> {
        let key = name.unwrap_or("default");
        self.connections.get(key)
    }
}
