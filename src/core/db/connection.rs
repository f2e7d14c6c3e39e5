/// Connection Management Module
///
/// Every CRUD operation opens its own connection through a
/// [`ConnectionProvider`] and drops it before returning, whatever the outcome.
/// Nothing is cached between calls.

use crate::config::DatabaseConfig;
use crate::core::{CrudError, Result};
use rusqlite::{Connection, OpenFlags};
use std::time::Duration;
use tracing::{debug, error};

/// Opens connections for a single configured database.
#[derive(Debug, Clone)]
pub struct ConnectionProvider {
    config: DatabaseConfig,
}

impl ConnectionProvider {
    /// Creates a provider for the given database configuration
    pub fn new(config: DatabaseConfig) -> Self {
        ConnectionProvider { config }
    }

    /// The configuration connections are opened with
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Opens a new connection to the configured database
    ///
    /// # Returns
    ///
    /// A live connection with the busy timeout and `foreign_keys` pragma applied,
    /// or `CrudError::Connection` if the file cannot be opened or configured.
    pub fn open(&self) -> Result<Connection> {
        let path = &self.config.path;
        let conn = Connection::open_with_flags(path, self.open_flags())
            .and_then(|conn| {
                conn.busy_timeout(Duration::from_millis(self.config.busy_timeout_ms))?;
                conn.pragma_update(None, "foreign_keys", self.config.foreign_keys)?;
                Ok(conn)
            })
            .map_err(|source| CrudError::Connection {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path, "opened database connection");
        Ok(conn)
    }

    /// Opens a connection, logging and discarding the error on failure
    ///
    /// # Returns
    ///
    /// `Some(connection)` on success, `None` if the database is unreachable.
    pub fn try_open(&self) -> Option<Connection> {
        match self.open() {
            Ok(conn) => Some(conn),
            Err(e) => {
                error!("Failed to open database: {}", e);
                None
            }
        }
    }

    fn open_flags(&self) -> OpenFlags {
        let access = if self.config.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY
        } else if self.config.create_if_missing {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE
        };
        access | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX
    }
}
