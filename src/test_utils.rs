/// # Test Utilities Module
///
/// Database fixtures for unit tests. Each fixture owns a temporary directory
/// holding a real database file, since every CRUD call opens its own
/// connection and an in-memory database would vanish between calls.

use crate::config::DatabaseConfig;
use crate::core::db::CrudAux;
use crate::core::Result;
use rusqlite::Connection;
use std::path::PathBuf;
use tempfile::TempDir;

pub const PRODUCTO_SCHEMA: &str = "
    CREATE TABLE producto (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nombre TEXT NOT NULL UNIQUE,
        precio REAL NOT NULL,
        descripcion TEXT
    );
";

/// A temporary database with the `producto` table
pub struct ProductFixture {
    _dir: TempDir,
    pub path: PathBuf,
}

impl ProductFixture {
    /// Creates an empty `producto` table
    pub fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let path = dir.path().join("tienda.db");
        Connection::open(&path)?.execute_batch(PRODUCTO_SCHEMA)?;
        Ok(ProductFixture { _dir: dir, path })
    }

    /// Creates the table with three products (ids 1..=3)
    pub fn with_sample_data() -> Result<Self> {
        let fixture = Self::new()?;
        Connection::open(&fixture.path)?.execute_batch(
            "
            INSERT INTO producto (nombre, precio, descripcion)
                VALUES ('Lapiz', 5.5, 'Lapiz de madera');
            INSERT INTO producto (nombre, precio, descripcion)
                VALUES ('Cuaderno', 25, 'Cuaderno rayado');
            INSERT INTO producto (nombre, precio, descripcion)
                VALUES ('Clip', 0.5, NULL);
        ",
        )?;
        Ok(fixture)
    }

    pub fn config(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.path.to_string_lossy())
    }

    pub fn crud(&self) -> CrudAux {
        CrudAux::new(self.config())
    }

    /// Row count read through a separate connection
    pub fn count(&self, table: &str) -> i64 {
        Connection::open(&self.path)
            .and_then(|conn| {
                conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            })
            .unwrap_or(-1)
    }
}
