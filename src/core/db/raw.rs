/// Raw SQL Module
///
/// Helpers that run caller-written SQL text without parameters: run a
/// statement, run an INSERT and get its id, run a SELECT and get positional
/// rows. Only code-defined SQL belongs here; anything carrying user data should
/// go through the parameterized operations on [`CrudAux`].

use crate::core::db::executor::CrudAux;
use crate::core::db::query::StatementKind;
use crate::core::{CrudError, Result};
use rusqlite::types::ValueRef;
use serde::Serialize;
use tracing::{debug, error};

/// Positional result of a raw SELECT
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    /// Column names from the query result
    pub columns: Vec<String>,
    /// Rows of data as string values
    pub rows: Vec<Vec<String>>,
    /// Number of rows returned
    pub row_count: usize,
}

impl QueryResult {
    /// Creates a new QueryResult from column names and row data
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let row_count = rows.len();
        QueryResult {
            columns,
            rows,
            row_count,
        }
    }
}

impl CrudAux {
    /// Executes one statement and returns the number of rows it changed
    pub fn execute_sql(&self, sql: &str) -> Result<usize> {
        let result = self.run_raw(sql, None, |conn| Ok(conn.execute(sql, [])?));
        log_failure(result, sql)
    }

    /// Executes one INSERT and returns the generated rowid
    pub fn insert_sql(&self, sql: &str) -> Result<i64> {
        let result = self.run_raw(sql, Some(StatementKind::Insert), |conn| {
            conn.execute(sql, [])?;
            Ok(conn.last_insert_rowid())
        });
        log_failure(result, sql)
    }

    /// Executes one SELECT and returns its rows as positional text values
    ///
    /// NULL is rendered as `"NULL"`.
    pub fn select_sql(&self, sql: &str) -> Result<QueryResult> {
        let result = self.run_raw(sql, Some(StatementKind::Select), |conn| {
            let mut stmt = conn.prepare(sql)?;
            if !stmt.readonly() || stmt.column_count() == 0 {
                return Err(CrudError::Query(
                    "select_sql only runs read-only statements that return columns".to_string(),
                ));
            }
            let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
            let column_count = stmt.column_count();

            let rows = stmt
                .query_map([], |row| {
                    let mut values = Vec::with_capacity(column_count);
                    for i in 0..column_count {
                        values.push(format_value(row.get_ref(i)?));
                    }
                    Ok(values)
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(QueryResult::new(columns, rows))
        });
        log_failure(result, sql)
    }

    fn run_raw<T, F>(&self, sql: &str, expected: Option<StatementKind>, work: F) -> Result<T>
    where
        F: FnOnce(&rusqlite::Connection) -> Result<T>,
    {
        if let Some(expected) = expected {
            let kind = StatementKind::from_sql(sql);
            if kind != expected {
                return Err(CrudError::Query(format!(
                    "expected a {:?} statement, got {:?}",
                    expected, kind
                )));
            }
        }

        let conn = self.provider().open()?;
        let value = work(&conn)?;
        debug!(sql = sql, "raw statement executed");
        Ok(value)
    }
}

fn log_failure<T>(result: Result<T>, sql: &str) -> Result<T> {
    if let Err(e) = &result {
        error!(sql = sql, "Failed to run raw statement: {}", e);
    }
    result
}

/// Formats a SQLite value for positional results
fn format_value(value: ValueRef) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).to_string(),
        ValueRef::Blob(b) => format!("<BLOB: {} bytes>", b.len()),
    }
}
