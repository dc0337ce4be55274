//! `ClickHouseExecutor` Module
//!
//! Provides the `ClickHouseExecutor` trait that abstracts statement execution against
//! a ClickHouse server. The model layer only ever talks to this trait, so the wire
//! protocol, connection pooling and scheduling all live in the implementation.
//!
//! [`crate::memory::MemoryExecutor`] is an in-process implementation used by the tests.

use crate::value::ColumnValues;
use std::fmt;
use std::time::Instant;

#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;
#[cfg(feature = "metrics")]
use crate::metrics::METRICS;

/// `ClickHouseExecutor` error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickHouseError {
    /// The connection could not be established or was lost
    Connection(String),
    /// The server rejected or failed the statement
    Query(String),
    /// Other execution errors
    Other(String),
}

impl fmt::Display for ClickHouseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClickHouseError::Connection(s) => {
                write!(f, "Connection error: {s}")
            }
            ClickHouseError::Query(s) => {
                write!(f, "Query error: {s}")
            }
            ClickHouseError::Other(s) => {
                write!(f, "Execution error: {s}")
            }
        }
    }
}

impl std::error::Error for ClickHouseError {}

/// One named column of an insert payload or a query result.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickHouseColumn {
    pub name: String,
    pub values: ColumnValues,
}

impl ClickHouseColumn {
    pub fn new(name: impl Into<String>, values: ColumnValues) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Result set of a query, column by column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<ClickHouseColumn>,
}

impl QueryResult {
    pub fn new(columns: Vec<ClickHouseColumn>) -> Self {
        Self { columns }
    }

    /// Column by name.
    pub fn column(&self, name: &str) -> Option<&ClickHouseColumn> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// Trait for executing statements against ClickHouse
///
/// Every method is a single blocking round trip. Implementations decide how
/// connections are pooled and how long a call may take.
///
/// # Examples
///
/// ```
/// use chorm::executor::ClickHouseExecutor;
/// use chorm::memory::MemoryExecutor;
///
/// let executor = MemoryExecutor::new();
/// executor.ping().unwrap();
/// executor.command("CREATE TABLE IF NOT EXISTS `events`  (id Int64)").unwrap();
/// assert!(executor.table("events").is_some());
/// ```
pub trait ClickHouseExecutor {
    /// Check that the server is reachable.
    ///
    /// # Errors
    ///
    /// Returns `ClickHouseError` if the server cannot be reached.
    fn ping(&self) -> Result<(), ClickHouseError>;

    /// Execute a statement that returns rows.
    ///
    /// # Errors
    ///
    /// Returns `ClickHouseError` if the statement fails.
    fn query(&self, sql: &str) -> Result<QueryResult, ClickHouseError>;

    /// Execute a statement without a result set.
    ///
    /// # Errors
    ///
    /// Returns `ClickHouseError` if the statement fails.
    fn command(&self, sql: &str) -> Result<(), ClickHouseError>;

    /// Insert one block of columns into `table`.
    ///
    /// `table` is the backtick-quoted identifier, optionally database qualified.
    /// All columns have the same number of rows.
    ///
    /// # Errors
    ///
    /// Returns `ClickHouseError` if the insert fails.
    fn insert(&self, table: &str, columns: Vec<ClickHouseColumn>) -> Result<(), ClickHouseError>;
}

impl<E: ClickHouseExecutor + ?Sized> ClickHouseExecutor for &E {
    fn ping(&self) -> Result<(), ClickHouseError> {
        (**self).ping()
    }

    fn query(&self, sql: &str) -> Result<QueryResult, ClickHouseError> {
        (**self).query(sql)
    }

    fn command(&self, sql: &str) -> Result<(), ClickHouseError> {
        (**self).command(sql)
    }

    fn insert(&self, table: &str, columns: Vec<ClickHouseColumn>) -> Result<(), ClickHouseError> {
        (**self).insert(table, columns)
    }
}

/// Run a statement that returns rows, with tracing and metrics.
pub(crate) fn execute_query<E: ClickHouseExecutor + ?Sized>(
    executor: &E,
    kind: &'static str,
    sql: &str,
) -> Result<QueryResult, ClickHouseError> {
    #[cfg(feature = "tracing")]
    let _span = tracing_helpers::execute_query_span(kind, sql).entered();

    let start = Instant::now();
    let result = executor.query(sql);
    record(kind, start, result.as_ref().err());
    result
}

/// Run a statement without a result set, with tracing and metrics.
pub(crate) fn execute_command<E: ClickHouseExecutor + ?Sized>(
    executor: &E,
    kind: &'static str,
    sql: &str,
) -> Result<(), ClickHouseError> {
    #[cfg(feature = "tracing")]
    let _span = tracing_helpers::execute_query_span(kind, sql).entered();

    let start = Instant::now();
    let result = executor.command(sql);
    record(kind, start, result.as_ref().err());
    result
}

/// Insert a block, with tracing and metrics.
pub(crate) fn execute_insert<E: ClickHouseExecutor + ?Sized>(
    executor: &E,
    table: &str,
    columns: Vec<ClickHouseColumn>,
    rows: usize,
) -> Result<(), ClickHouseError> {
    #[cfg(feature = "tracing")]
    let _span = tracing_helpers::insert_span(table, rows).entered();

    let start = Instant::now();
    let result = executor.insert(table, columns);
    record("insert", start, result.as_ref().err());
    if result.is_ok() {
        record_inserted_rows(rows);
    }
    result
}

#[cfg(feature = "metrics")]
fn record_inserted_rows(rows: usize) {
    METRICS.record_inserted_rows(rows);
}

#[cfg(not(feature = "metrics"))]
fn record_inserted_rows(_rows: usize) {}

fn record(kind: &'static str, start: Instant, error: Option<&ClickHouseError>) {
    let elapsed = start.elapsed();
    if let Some(error) = error {
        log::debug!("{kind} statement failed after {elapsed:?}: {error}");
        #[cfg(feature = "metrics")]
        METRICS.record_error(kind);
    }
    #[cfg(feature = "metrics")]
    METRICS.record_statement(kind, elapsed);
}
