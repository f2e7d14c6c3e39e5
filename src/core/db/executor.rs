/// Transactional Execution Module
///
/// [`CrudAux`] runs the statements rendered by the query module. Reads use a
/// plain connection. Writes follow
/// `open -> BEGIN IMMEDIATE -> bind+execute (once per row) -> COMMIT | ROLLBACK -> close`,
/// so a failing row discards the whole batch.
///
/// Every failure is logged here, once, and returned as a `CrudError` whose
/// `kind()` tells connection, statement and zero-effect failures apart.

use crate::config::{Config, DatabaseConfig};
use crate::core::db::connection::ConnectionProvider;
use crate::core::db::query::{Columns, Condition, Statement, StatementKind};
use crate::core::db::row::Row;
use crate::core::{CrudError, FailureKind, Result};
use rusqlite::{ToSql, Transaction, TransactionBehavior};
use serde::Deserialize;
use tracing::{debug, error, warn};

/// An empty parameter list for statements without placeholders
pub const NO_PARAMS: &[&dyn ToSql] = &[];

/// What a DELETE that matches no rows reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroRowsPolicy {
    /// Roll back and return `CrudError::ZeroEffect`
    #[default]
    Fail,
    /// Commit and return `Ok(0)`
    Succeed,
}

/// Generic CRUD helper bound to one database.
///
/// Holds configuration only; each call opens and closes its own connection.
#[derive(Debug, Clone)]
pub struct CrudAux {
    provider: ConnectionProvider,
    delete_policy: ZeroRowsPolicy,
}

impl CrudAux {
    /// Creates a helper for the given database
    pub fn new(config: DatabaseConfig) -> Self {
        CrudAux {
            provider: ConnectionProvider::new(config),
            delete_policy: ZeroRowsPolicy::default(),
        }
    }

    /// Creates a helper from a loaded configuration file
    pub fn from_config(config: &Config) -> Self {
        CrudAux::new(config.database.clone()).with_delete_policy(config.policy.delete_zero_rows)
    }

    pub fn with_delete_policy(mut self, policy: ZeroRowsPolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    pub fn delete_policy(&self) -> ZeroRowsPolicy {
        self.delete_policy
    }

    pub fn provider(&self) -> &ConnectionProvider {
        &self.provider
    }

    /// Returns every row matching `condition`
    ///
    /// # Returns
    ///
    /// The matching rows, possibly none. A connection or statement failure is
    /// an `Err`, never an empty vector.
    pub fn select_rows<P: ToSql>(
        &self,
        table: &str,
        columns: &Columns,
        condition: Option<&Condition>,
        params: &[P],
    ) -> Result<Vec<Row>> {
        let result = Statement::select(table, columns, condition)
            .and_then(|statement| self.fetch(&statement, params, None));
        logged(result, table, "Failed to select rows")
    }

    /// Returns the first row matching `condition`, if any
    pub fn select_row<P: ToSql>(
        &self,
        table: &str,
        columns: &Columns,
        condition: Option<&Condition>,
        params: &[P],
    ) -> Result<Option<Row>> {
        let result = Statement::select(table, columns, condition)
            .and_then(|statement| self.fetch(&statement, params, Some(1)))
            .map(|rows| rows.into_iter().next());
        logged(result, table, "Failed to select row")
    }

    /// Inserts one row, binding `params[i]` to `columns[i]`
    ///
    /// # Returns
    ///
    /// The generated rowid of the new record.
    pub fn insert_row<S: AsRef<str>, P: ToSql>(
        &self,
        table: &str,
        columns: &[S],
        params: &[P],
    ) -> Result<i64> {
        let result = Statement::insert(table, columns).and_then(|statement| {
            self.in_transaction(&statement, |tx| {
                let mut stmt = tx.prepare(statement.sql())?;
                execute_bound(&mut stmt, &as_dyn(params))?;
                Ok(tx.last_insert_rowid())
            })
        });
        logged(result, table, "Failed to insert row")
    }

    /// Inserts every row of `rows` in one transaction
    ///
    /// # Returns
    ///
    /// The number of rows inserted. If any row fails, none are kept.
    pub fn insert_rows<S: AsRef<str>, P: ToSql>(
        &self,
        table: &str,
        columns: &[S],
        rows: &[Vec<P>],
    ) -> Result<usize> {
        let result = Statement::insert(table, columns).and_then(|statement| {
            self.in_transaction(&statement, |tx| {
                let mut stmt = tx.prepare(statement.sql())?;
                let mut inserted = 0;
                for row in rows {
                    check_row_width(&statement, row.len())?;
                    inserted += execute_bound(&mut stmt, &as_dyn(row))?;
                }
                Ok(inserted)
            })
        });
        logged(result, table, "Failed to insert rows")
    }

    /// Updates the rows matching `condition`
    ///
    /// `params` holds the SET values in column order followed by the
    /// condition's parameters.
    ///
    /// # Returns
    ///
    /// The number of rows changed; zero is still a success.
    pub fn update_row<S: AsRef<str>, P: ToSql>(
        &self,
        table: &str,
        columns: &[S],
        condition: Option<&Condition>,
        params: &[P],
    ) -> Result<usize> {
        let result = Statement::update(table, columns, condition).and_then(|statement| {
            self.in_transaction(&statement, |tx| {
                let mut stmt = tx.prepare(statement.sql())?;
                execute_bound(&mut stmt, &as_dyn(params))
            })
        });
        logged(result, table, "Failed to update row")
    }

    /// Runs the same UPDATE once per entry of `rows` in one transaction
    ///
    /// Each execution binds the row's SET values, then every value of
    /// `condition_params`. A failing row discards all of them.
    pub fn update_rows<S: AsRef<str>, P: ToSql, C: ToSql>(
        &self,
        table: &str,
        columns: &[S],
        rows: &[Vec<P>],
        condition: Option<&Condition>,
        condition_params: &[C],
    ) -> Result<usize> {
        let result = Statement::update(table, columns, condition).and_then(|statement| {
            check_parameter_count(statement.condition_placeholders(), condition_params.len())?;
            self.in_transaction(&statement, |tx| {
                let mut stmt = tx.prepare(statement.sql())?;
                let mut affected = 0;
                for row in rows {
                    check_row_width(&statement, row.len())?;
                    let values: Vec<&dyn ToSql> = row
                        .iter()
                        .map(|v| v as &dyn ToSql)
                        .chain(condition_params.iter().map(|c| c as &dyn ToSql))
                        .collect();
                    affected += execute_bound(&mut stmt, &values)?;
                }
                Ok(affected)
            })
        });
        logged(result, table, "Failed to update rows")
    }

    /// Deletes the rows matching `condition`
    ///
    /// Under `ZeroRowsPolicy::Fail` a delete that matches nothing is rolled
    /// back and reported as `CrudError::ZeroEffect`.
    pub fn delete_row<P: ToSql>(
        &self,
        table: &str,
        condition: Option<&Condition>,
        params: &[P],
    ) -> Result<usize> {
        let result = Statement::delete(table, condition).and_then(|statement| {
            self.in_transaction(&statement, |tx| {
                let mut stmt = tx.prepare(statement.sql())?;
                let affected = execute_bound(&mut stmt, &as_dyn(params))?;
                if affected == 0 && self.delete_policy == ZeroRowsPolicy::Fail {
                    return Err(CrudError::ZeroEffect {
                        statement: statement.sql().to_string(),
                    });
                }
                Ok(affected)
            })
        });
        logged(result, table, "Failed to delete row")
    }

    fn fetch<P: ToSql>(
        &self,
        statement: &Statement,
        params: &[P],
        limit: Option<usize>,
    ) -> Result<Vec<Row>> {
        let conn = self.provider.open()?;
        let mut stmt = conn.prepare(statement.sql())?;
        check_parameter_count(stmt.parameter_count(), params.len())?;

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.query(as_dyn(params).as_slice())?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(Row::from_sqlite(&columns, row)?);
            if limit.map_or(false, |limit| out.len() >= limit) {
                break;
            }
        }

        debug!(sql = statement.sql(), rows = out.len(), "fetched rows");
        Ok(out)
    }

    fn in_transaction<T, F>(&self, statement: &Statement, work: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        if !statement.is_filtered()
            && matches!(statement.kind(), StatementKind::Update | StatementKind::Delete)
        {
            warn!(sql = statement.sql(), "statement has no condition and applies to every row");
        }

        let mut conn = self.provider.open()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        match work(&tx) {
            Ok(value) => {
                tx.commit()?;
                debug!(sql = statement.sql(), "transaction committed");
                Ok(value)
            }
            Err(e) => {
                match tx.rollback() {
                    Ok(()) => debug!(sql = statement.sql(), "transaction rolled back"),
                    Err(rollback_err) => warn!("Rollback failed: {}", rollback_err),
                }
                Err(e)
            }
        }
    }
}

fn as_dyn<P: ToSql>(params: &[P]) -> Vec<&dyn ToSql> {
    params.iter().map(|p| p as &dyn ToSql).collect()
}

fn check_parameter_count(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(CrudError::ParameterCount { expected, actual });
    }
    Ok(())
}

fn check_row_width(statement: &Statement, width: usize) -> Result<()> {
    check_parameter_count(statement.value_placeholders(), width)
}

fn execute_bound(stmt: &mut rusqlite::Statement<'_>, values: &[&dyn ToSql]) -> Result<usize> {
    check_parameter_count(stmt.parameter_count(), values.len())?;
    Ok(stmt.execute(values)?)
}

/// Logs a failed operation at the crate boundary
fn logged<T>(result: Result<T>, table: &str, action: &str) -> Result<T> {
    if let Err(e) = &result {
        match e.kind() {
            FailureKind::ZeroEffect => warn!(table = %table, "{}: {}", action, e),
            _ => error!(table = %table, "{}: {}", action, e),
        }
    }
    result
}
