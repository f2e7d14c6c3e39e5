// Core infrastructure modules
pub mod core;

// Ambient modules
pub mod cli;
pub mod config;
pub mod logging;
pub mod reply;

#[cfg(test)]
mod integration_tests;
#[cfg(test)]
mod test_utils;

pub use crate::config::{Config, DatabaseConfig};
pub use crate::core::db::{
    Columns, Comparison, Condition, CrudAux, QueryResult, Row, Statement, StatementKind,
    ZeroRowsPolicy, NO_PARAMS,
};
pub use crate::core::{CrudError, FailureKind, Result};
pub use crate::reply::Reply;
