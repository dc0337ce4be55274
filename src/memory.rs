//! In-memory executor
//!
//! `MemoryExecutor` implements [`ClickHouseExecutor`] without a server. It keeps
//! inserted blocks per table and understands just enough SQL to serve the
//! statements models generate:
//!
//! - `CREATE TABLE IF NOT EXISTS <table> ...` registers the table
//! - `DROP TABLE IF EXISTS <table> ...` removes it
//! - `SELECT <fields> FROM <table> ...` projects the stored columns; `WHERE`,
//!   `ORDER BY` and `LIMIT` are not evaluated
//!
//! Like the server, it truncates `FixedString(n)` values to `n` bytes on insert.
//! Every statement and insert call is recorded for inspection, and results or
//! failures can be queued ahead of time.

use crate::executor::{ClickHouseColumn, ClickHouseError, ClickHouseExecutor, QueryResult};
use crate::value::ColumnValues;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// An insert call as received by the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertCall {
    pub table: String,
    pub columns: Vec<ClickHouseColumn>,
}

#[derive(Debug, Default)]
struct MemoryState {
    tables: BTreeMap<String, Vec<ClickHouseColumn>>,
    statements: Vec<String>,
    inserts: Vec<InsertCall>,
    queued_results: VecDeque<QueryResult>,
    failures: VecDeque<ClickHouseError>,
}

impl MemoryState {
    fn take_failure(&mut self) -> Result<(), ClickHouseError> {
        match self.failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Apply DDL; returns rows for `SELECT`, nothing otherwise.
    fn run(&mut self, sql: &str) -> Result<Option<QueryResult>, ClickHouseError> {
        let statement = sql.trim();
        if let Some(rest) = strip_prefix_ignore_case(statement, "CREATE TABLE IF NOT EXISTS ") {
            let table = first_token(rest)?;
            self.tables.entry(table).or_default();
            Ok(None)
        } else if let Some(rest) = strip_prefix_ignore_case(statement, "DROP TABLE IF EXISTS ") {
            let table = first_token(rest)?;
            self.tables.remove(&table);
            Ok(None)
        } else if let Some(rest) = strip_prefix_ignore_case(statement, "SELECT ") {
            self.select(rest).map(Some)
        } else {
            Ok(None)
        }
    }

    fn select(&self, projection: &str) -> Result<QueryResult, ClickHouseError> {
        let from = projection
            .to_ascii_uppercase()
            .find(" FROM ")
            .ok_or_else(|| ClickHouseError::Query(format!("missing FROM in SELECT {projection}")))?;
        let fields = &projection[..from];
        let table = first_token(&projection[from + " FROM ".len()..])?;
        let stored = self
            .tables
            .get(&table)
            .ok_or_else(|| ClickHouseError::Query(format!("Table {table} doesn't exist")))?;

        // A table that was never written has no typed columns to project
        if fields.trim() == "*" || stored.is_empty() {
            return Ok(QueryResult::new(stored.clone()));
        }
        let columns = fields
            .split(',')
            .map(|field| {
                let name = field.trim().trim_matches('`');
                stored
                    .iter()
                    .find(|column| column.name == name)
                    .cloned()
                    .ok_or_else(|| {
                        ClickHouseError::Query(format!("Missing column {name} in table {table}"))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(QueryResult::new(columns))
    }

    /// Append a block. The block is checked as a whole, so a rejected insert
    /// leaves the table unchanged.
    fn insert(
        &mut self,
        table: &str,
        columns: Vec<ClickHouseColumn>,
    ) -> Result<(), ClickHouseError> {
        let name = normalize_table(table);
        let stored = self
            .tables
            .get_mut(&name)
            .ok_or_else(|| ClickHouseError::Query(format!("Table {name} doesn't exist")))?;

        let columns: Vec<ClickHouseColumn> = columns
            .into_iter()
            .map(|column| ClickHouseColumn::new(column.name, truncate_fixed_strings(column.values)))
            .collect();

        if let Some((first, rest)) = columns.split_first() {
            if let Some(column) = rest.iter().find(|c| c.values.len() != first.values.len()) {
                return Err(ClickHouseError::Query(format!(
                    "Column {} has {} rows, expected {}",
                    column.name,
                    column.values.len(),
                    first.values.len()
                )));
            }
        }

        if stored.is_empty() {
            *stored = columns;
            return Ok(());
        }
        if let Some(missing) = stored
            .iter()
            .find(|stored| !columns.iter().any(|column| column.name == stored.name))
        {
            return Err(ClickHouseError::Query(format!(
                "Missing column {} in insert into {name}",
                missing.name
            )));
        }

        let mut merged = stored.clone();
        for column in columns {
            let target = merged
                .iter_mut()
                .find(|stored| stored.name == column.name)
                .ok_or_else(|| {
                    ClickHouseError::Query(format!(
                        "No such column {} in table {name}",
                        column.name
                    ))
                })?;
            target.values.extend(column.values).map_err(|rejected| {
                ClickHouseError::Query(format!(
                    "Type mismatch for column {}: cannot append {}",
                    column.name,
                    rejected.kind_name()
                ))
            })?;
        }
        *stored = merged;
        Ok(())
    }
}

/// Executor that keeps tables in process memory.
#[derive(Debug, Default)]
pub struct MemoryExecutor {
    state: Mutex<MemoryState>,
}

impl MemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Statements received through `query` and `command`, in order.
    pub fn statements(&self) -> Vec<String> {
        self.state().statements.clone()
    }

    /// Insert calls received, in order.
    pub fn inserts(&self) -> Vec<InsertCall> {
        self.state().inserts.clone()
    }

    /// Stored columns of `table`, or `None` if it does not exist.
    ///
    /// Accepts the name with or without backticks.
    pub fn table(&self, table: &str) -> Option<Vec<ClickHouseColumn>> {
        self.state().tables.get(&normalize_table(table)).cloned()
    }

    /// Return `result` from the next `query` call instead of evaluating it.
    pub fn queue_result(&self, result: QueryResult) {
        self.state().queued_results.push_back(result);
    }

    /// Fail the next call with `error`.
    pub fn fail_next(&self, error: ClickHouseError) {
        self.state().failures.push_back(error);
    }
}

impl ClickHouseExecutor for MemoryExecutor {
    fn ping(&self) -> Result<(), ClickHouseError> {
        self.state().take_failure()
    }

    fn query(&self, sql: &str) -> Result<QueryResult, ClickHouseError> {
        let mut state = self.state();
        state.statements.push(sql.to_string());
        state.take_failure()?;
        if let Some(result) = state.queued_results.pop_front() {
            return Ok(result);
        }
        Ok(state.run(sql)?.unwrap_or_default())
    }

    fn command(&self, sql: &str) -> Result<(), ClickHouseError> {
        let mut state = self.state();
        state.statements.push(sql.to_string());
        state.take_failure()?;
        state.run(sql).map(|_| ())
    }

    fn insert(&self, table: &str, columns: Vec<ClickHouseColumn>) -> Result<(), ClickHouseError> {
        let mut state = self.state();
        state.inserts.push(InsertCall {
            table: table.to_string(),
            columns: columns.clone(),
        });
        state.take_failure()?;
        state.insert(table, columns)
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &text[prefix.len()..])
}

fn first_token(text: &str) -> Result<String, ClickHouseError> {
    text.split_whitespace()
        .next()
        .map(normalize_table)
        .ok_or_else(|| ClickHouseError::Query("missing table name".to_string()))
}

/// `` `db`.`t` `` and `db.t` name the same table; the `default` database is implied.
fn normalize_table(table: &str) -> String {
    let name = table.replace('`', "");
    match name.strip_prefix("default.") {
        Some(unqualified) => unqualified.to_string(),
        None => name,
    }
}

fn truncate_fixed_strings(values: ColumnValues) -> ColumnValues {
    match values {
        ColumnValues::FixedString { length, values } => ColumnValues::FixedString {
            length,
            values: values
                .into_iter()
                .map(|value| truncate_bytes(value, length))
                .collect(),
        },
        ColumnValues::Array(rows) => {
            ColumnValues::Array(rows.into_iter().map(truncate_fixed_strings).collect())
        }
        ColumnValues::Nullable { nulls, values } => ColumnValues::Nullable {
            nulls,
            values: Box::new(truncate_fixed_strings(*values)),
        },
        other => other,
    }
}

fn truncate_bytes(mut value: String, length: usize) -> String {
    if value.len() > length {
        let mut end = length;
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        value.truncate(end);
    }
    value
}
