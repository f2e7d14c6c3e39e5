/// Crudaux Error Module
///
/// This module defines the error type returned by every CRUD operation.
/// Instead of collapsing failures into `false`/`None`, each error reports
/// which class of failure happened through [`FailureKind`].
use thiserror::Error;

/// Broad classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The database could not be opened
    Connection,
    /// The statement could not be built, prepared, bound or executed
    Statement,
    /// The statement ran but affected no rows where at least one was required
    ZeroEffect,
    /// Configuration could not be loaded or is invalid
    Config,
    /// I/O or serialization failures outside the database
    Internal,
}

/// Error type for the crudaux library.
#[derive(Error, Debug)]
pub enum CrudError {
    /// Opening the database failed
    #[error("Connection error ({path}): {source}")]
    Connection {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Errors reported by SQLite while preparing, binding or executing
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A table or column name outside the allowed identifier set
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Supplied parameters do not match the statement's placeholders
    #[error("Parameter count mismatch: statement expects {expected}, got {actual}")]
    ParameterCount { expected: usize, actual: usize },

    /// Malformed structural input (empty column list, wrong statement kind, ...)
    #[error("Query error: {0}")]
    Query(String),

    /// A statement that must affect rows affected none
    #[error("No rows affected: {statement}")]
    ZeroEffect { statement: String },

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CrudError {
    /// Returns the failure class of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            CrudError::Connection { .. } => FailureKind::Connection,
            CrudError::Database(_)
            | CrudError::InvalidIdentifier(_)
            | CrudError::ParameterCount { .. }
            | CrudError::Query(_) => FailureKind::Statement,
            CrudError::ZeroEffect { .. } => FailureKind::ZeroEffect,
            CrudError::Config(_) => FailureKind::Config,
            CrudError::Io(_) | CrudError::Json(_) => FailureKind::Internal,
        }
    }
}

/// Type alias for Result to use CrudError as the error type.
pub type Result<T> = std::result::Result<T, CrudError>;
