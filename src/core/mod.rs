/// Core Module for crudaux
///
/// This module contains the database layer and the shared error type.
/// Everything an operation needs (connection, statement, transaction,
/// row mapping) lives under `db`.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{CrudError, FailureKind, Result};
