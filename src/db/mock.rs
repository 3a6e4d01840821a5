//! Mock drivers for testing.
//!
//! Provides scripted in-memory drivers so the introspection layer can be
//! exercised without a database server.

use super::{Driver, RawValue, RowCursor, Value};
use crate::error::{ProbeError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Scripted result for one SQL statement.
#[derive(Debug, Clone)]
enum MockResponse {
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<RawValue>>,
        fail_after: Option<usize>,
    },
    Error(String),
}

/// A driver that answers known statements with predefined rows.
///
/// Clones share the query log and the cursor-release counter, so a test can
/// keep a clone after handing the driver to a client.
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    responses: HashMap<String, MockResponse>,
    executed: Arc<Mutex<Vec<String>>>,
    released: Arc<AtomicUsize>,
}

impl MockDriver {
    /// Creates a mock driver with no scripted statements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `sql` with the given rows.
    pub fn with_rows(mut self, sql: &str, columns: &[&str], rows: Vec<Vec<RawValue>>) -> Self {
        self.responses.insert(
            sql.to_string(),
            MockResponse::Rows {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                rows,
                fail_after: None,
            },
        );
        self
    }

    /// Answers `sql` with the first `fail_after` rows, then a query error.
    pub fn with_failure_after(
        mut self,
        sql: &str,
        columns: &[&str],
        rows: Vec<Vec<RawValue>>,
        fail_after: usize,
    ) -> Self {
        self.responses.insert(
            sql.to_string(),
            MockResponse::Rows {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                rows,
                fail_after: Some(fail_after),
            },
        );
        self
    }

    /// Fails `sql` with a query error.
    pub fn with_error(mut self, sql: &str, message: &str) -> Self {
        self.responses
            .insert(sql.to_string(), MockResponse::Error(message.to_string()));
        self
    }

    /// Statements dispatched so far, in order.
    pub fn executed_queries(&self) -> Vec<String> {
        self.executed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of cursors released so far.
    pub fn released_cursors(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn query<'a>(
        &'a self,
        sql: &'a str,
        _params: &'a [Value],
    ) -> Result<Box<dyn RowCursor + 'a>> {
        self.executed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(sql.to_string());

        match self.responses.get(sql) {
            Some(MockResponse::Rows {
                columns,
                rows,
                fail_after,
            }) => Ok(Box::new(MockCursor {
                columns: columns.clone(),
                rows: rows.clone().into_iter(),
                remaining_before_failure: *fail_after,
                released: Arc::clone(&self.released),
            })),
            Some(MockResponse::Error(message)) => Err(ProbeError::query(message.clone())),
            None => Err(ProbeError::query(format!("no mock response for: {sql}"))),
        }
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

struct MockCursor {
    columns: Vec<String>,
    rows: std::vec::IntoIter<Vec<RawValue>>,
    remaining_before_failure: Option<usize>,
    released: Arc<AtomicUsize>,
}

#[async_trait]
impl RowCursor for MockCursor {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    async fn next_row(&mut self) -> Result<Option<Vec<RawValue>>> {
        if let Some(remaining) = self.remaining_before_failure.as_mut() {
            if *remaining == 0 {
                return Err(ProbeError::query("connection lost while reading rows"));
            }
            *remaining -= 1;
        }
        Ok(self.rows.next())
    }
}

impl Drop for MockCursor {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// A driver whose every query fails.
#[derive(Debug, Clone)]
pub struct FailingDriver {
    message: String,
}

impl FailingDriver {
    /// Creates a driver that fails every query with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl Driver for FailingDriver {
    async fn query<'a>(
        &'a self,
        _sql: &'a str,
        _params: &'a [Value],
    ) -> Result<Box<dyn RowCursor + 'a>> {
        Err(ProbeError::query(self.message.clone()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
