/// Query Building Module
///
/// Renders parameterized SELECT/INSERT/UPDATE/DELETE statements from a table
/// name, an ordered column list and an optional condition. Nothing here
/// touches a connection.
///
/// Data values never appear in the rendered SQL: every value is a `?`
/// placeholder bound later, in order, by the executor. Table and column names
/// are checked against a plain identifier pattern before they are interpolated.

use crate::core::{CrudError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$").unwrap()
});

/// Checks that `name` is a plain (optionally schema-qualified) identifier
pub fn validate_identifier(name: &str) -> Result<&str> {
    if IDENTIFIER.is_match(name) {
        Ok(name)
    } else {
        Err(CrudError::InvalidIdentifier(name.to_string()))
    }
}

fn column_list<S: AsRef<str>>(columns: &[S]) -> Result<Vec<&str>> {
    if columns.is_empty() {
        return Err(CrudError::Query("column list must not be empty".to_string()));
    }
    columns.iter().map(|c| validate_identifier(c.as_ref())).collect()
}

/// The columns a SELECT returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Columns {
    /// Every column (`*`)
    All,
    /// The named columns, in order
    List(Vec<String>),
}

impl Columns {
    /// Builds a column list from any slice of names
    pub fn list<S: AsRef<str>>(columns: &[S]) -> Self {
        Columns::List(columns.iter().map(|c| c.as_ref().to_string()).collect())
    }

    fn render(&self) -> Result<String> {
        match self {
            Columns::All => Ok("*".to_string()),
            Columns::List(columns) => Ok(column_list(columns.as_slice())?.join(",")),
        }
    }
}

/// `"*"` is the wildcard; anything else is read as a comma separated list.
impl From<&str> for Columns {
    fn from(text: &str) -> Self {
        let text = text.trim();
        if text == "*" {
            Columns::All
        } else {
            Columns::List(
                text.split(',')
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect(),
            )
        }
    }
}

/// Comparison operators available to condition templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
}

impl Comparison {
    fn as_sql(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Ne => "<>",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
            Comparison::Like => "LIKE",
        }
    }
}

/// A boolean expression placed after `WHERE`, without the keyword.
///
/// Templates (`eq`, `lt`, `in_list`, ...) only accept valid column names and
/// always bind values through placeholders. `raw` keeps the fragment verbatim
/// and is meant for code-defined text, never for user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    fragment: String,
    placeholders: usize,
}

impl Condition {
    /// Uses `fragment` verbatim, e.g. `"id = ?"`
    pub fn raw(fragment: impl Into<String>) -> Self {
        let fragment = fragment.into();
        let placeholders = count_placeholders(&fragment);
        Condition {
            fragment,
            placeholders,
        }
    }

    /// `<column> <op> ?`
    pub fn compare(column: &str, op: Comparison) -> Result<Self> {
        let column = validate_identifier(column)?;
        Ok(Condition {
            fragment: format!("{} {} ?", column, op.as_sql()),
            placeholders: 1,
        })
    }

    pub fn eq(column: &str) -> Result<Self> {
        Self::compare(column, Comparison::Eq)
    }

    pub fn ne(column: &str) -> Result<Self> {
        Self::compare(column, Comparison::Ne)
    }

    pub fn lt(column: &str) -> Result<Self> {
        Self::compare(column, Comparison::Lt)
    }

    pub fn le(column: &str) -> Result<Self> {
        Self::compare(column, Comparison::Le)
    }

    pub fn gt(column: &str) -> Result<Self> {
        Self::compare(column, Comparison::Gt)
    }

    pub fn ge(column: &str) -> Result<Self> {
        Self::compare(column, Comparison::Ge)
    }

    pub fn like(column: &str) -> Result<Self> {
        Self::compare(column, Comparison::Like)
    }

    /// `<column> IS NULL`
    pub fn is_null(column: &str) -> Result<Self> {
        let column = validate_identifier(column)?;
        Ok(Condition {
            fragment: format!("{} IS NULL", column),
            placeholders: 0,
        })
    }

    /// `<column> IS NOT NULL`
    pub fn is_not_null(column: &str) -> Result<Self> {
        let column = validate_identifier(column)?;
        Ok(Condition {
            fragment: format!("{} IS NOT NULL", column),
            placeholders: 0,
        })
    }

    /// `<column> IN (?,?,...)` with `count` placeholders
    pub fn in_list(column: &str, count: usize) -> Result<Self> {
        let column = validate_identifier(column)?;
        if count == 0 {
            return Err(CrudError::Query("IN list needs at least one value".to_string()));
        }
        Ok(Condition {
            fragment: format!("{} IN ({})", column, placeholder_list(count)),
            placeholders: count,
        })
    }

    /// `(self) AND (other)`
    pub fn and(self, other: Condition) -> Self {
        self.combine("AND", other)
    }

    /// `(self) OR (other)`
    pub fn or(self, other: Condition) -> Self {
        self.combine("OR", other)
    }

    fn combine(self, op: &str, other: Condition) -> Self {
        Condition {
            fragment: format!("({}) {} ({})", self.fragment, op, other.fragment),
            placeholders: self.placeholders + other.placeholders,
        }
    }

    /// The rendered fragment
    pub fn as_sql(&self) -> &str {
        &self.fragment
    }

    /// Number of `?` placeholders in the fragment
    pub fn placeholders(&self) -> usize {
        self.placeholders
    }

    pub fn is_empty(&self) -> bool {
        self.fragment.is_empty()
    }
}

impl From<&str> for Condition {
    fn from(fragment: &str) -> Self {
        Condition::raw(fragment)
    }
}

/// Counts `?` outside single- and double-quoted literals
fn count_placeholders(sql: &str) -> usize {
    let mut quote: Option<char> = None;
    let mut count = 0;
    for c in sql.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == '?' => count += 1,
            None => {}
        }
    }
    count
}

fn placeholder_list(count: usize) -> String {
    vec!["?"; count].join(",")
}

/// Only an absent or zero-length condition drops the WHERE clause; a blank one is an error.
fn where_clause(condition: Option<&Condition>) -> Result<(String, usize)> {
    match condition {
        None => Ok((String::new(), 0)),
        Some(c) if c.is_empty() => Ok((String::new(), 0)),
        Some(c) if c.as_sql().trim().is_empty() => Err(CrudError::Query(
            "condition is blank; pass no condition to target every row".to_string(),
        )),
        Some(c) => Ok((format!(" WHERE {}", c.as_sql()), c.placeholders())),
    }
}

/// SQL statement kinds handled by the builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Other,
}

impl StatementKind {
    /// Determines the statement kind from SQL text
    pub fn from_sql(sql: &str) -> Self {
        let sql_upper = sql.trim_start().to_uppercase();

        if sql_upper.starts_with("SELECT") || sql_upper.starts_with("WITH") {
            StatementKind::Select
        } else if sql_upper.starts_with("INSERT") || sql_upper.starts_with("REPLACE") {
            StatementKind::Insert
        } else if sql_upper.starts_with("UPDATE") {
            StatementKind::Update
        } else if sql_upper.starts_with("DELETE") {
            StatementKind::Delete
        } else {
            StatementKind::Other
        }
    }

    /// Whether the statement changes data and must run inside a transaction
    pub fn is_mutation(self) -> bool {
        matches!(
            self,
            StatementKind::Insert | StatementKind::Update | StatementKind::Delete
        )
    }
}

/// A rendered statement together with its placeholder layout.
///
/// Placeholders for SET/VALUES come first, then the condition's placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    kind: StatementKind,
    sql: String,
    value_placeholders: usize,
    condition_placeholders: usize,
}

impl Statement {
    /// `SELECT <columns> FROM <table>[ WHERE <condition>]`
    pub fn select(table: &str, columns: &Columns, condition: Option<&Condition>) -> Result<Self> {
        let table = validate_identifier(table)?;
        let (filter, condition_placeholders) = where_clause(condition)?;
        Ok(Statement {
            kind: StatementKind::Select,
            sql: format!("SELECT {} FROM {}{}", columns.render()?, table, filter),
            value_placeholders: 0,
            condition_placeholders,
        })
    }

    /// `INSERT INTO <table> (<columns>) VALUES (?,...)`, one placeholder per column
    pub fn insert<S: AsRef<str>>(table: &str, columns: &[S]) -> Result<Self> {
        let table = validate_identifier(table)?;
        let columns = column_list(columns)?;
        Ok(Statement {
            kind: StatementKind::Insert,
            sql: format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table,
                columns.join(","),
                placeholder_list(columns.len())
            ),
            value_placeholders: columns.len(),
            condition_placeholders: 0,
        })
    }

    /// `UPDATE <table> SET <c1>=?, <c2>=?[ WHERE <condition>]`
    pub fn update<S: AsRef<str>>(
        table: &str,
        columns: &[S],
        condition: Option<&Condition>,
    ) -> Result<Self> {
        let table = validate_identifier(table)?;
        let columns = column_list(columns)?;
        let (filter, condition_placeholders) = where_clause(condition)?;
        let assignments = columns
            .iter()
            .map(|c| format!("{}=?", c))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(Statement {
            kind: StatementKind::Update,
            sql: format!("UPDATE {} SET {}{}", table, assignments, filter),
            value_placeholders: columns.len(),
            condition_placeholders,
        })
    }

    /// `DELETE FROM <table>[ WHERE <condition>]`
    pub fn delete(table: &str, condition: Option<&Condition>) -> Result<Self> {
        let table = validate_identifier(table)?;
        let (filter, condition_placeholders) = where_clause(condition)?;
        Ok(Statement {
            kind: StatementKind::Delete,
            sql: format!("DELETE FROM {}{}", table, filter),
            value_placeholders: 0,
            condition_placeholders,
        })
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Placeholders in the SET or VALUES clause
    pub fn value_placeholders(&self) -> usize {
        self.value_placeholders
    }

    /// Placeholders contributed by the condition
    pub fn condition_placeholders(&self) -> usize {
        self.condition_placeholders
    }

    /// Total number of positional parameters the statement expects
    pub fn placeholder_count(&self) -> usize {
        self.value_placeholders + self.condition_placeholders
    }

    /// Whether the statement has a WHERE clause
    pub fn is_filtered(&self) -> bool {
        self.sql.contains(" WHERE ")
    }
}
