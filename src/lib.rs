//! schema-probe - Schema introspection for MySQL and ClickHouse.
//!
//! This library exposes the core modules to the binary and integration tests.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
