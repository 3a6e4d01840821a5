//! Error types for schema-probe.
//!
//! Defines the error enum shared by the drivers, the executor and the
//! introspection layer.

use thiserror::Error;

/// Main error type for schema-probe operations.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The initial connection attempt failed (host unreachable, auth failed, bad DSN).
    #[error("Connection error: {0}")]
    Connection(String),

    /// A catalog or schema query failed to execute or to stream its rows.
    #[error("Query error: {0}")]
    Query(String),

    /// A catalog row did not have the shape the engine is expected to report.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration errors (invalid config file, unknown driver tag, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (output serialization, unexpected states)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProbeError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a decode error with the given message.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Decode(_) => "Decode Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using ProbeError.
pub type Result<T> = std::result::Result<T, ProbeError>;
