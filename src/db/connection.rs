use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::DbError;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

/// Handle to the SQLite file. Holds only the path: every call opens its own
/// connection and closes it when done, so writes are naturally serialized.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a connection, runs `f` on it and drops it.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&mut Connection) -> Result<T, DbError>,
    {
        let mut conn = Connection::open(&self.path)
            .map_err(|e| DbError::Open(format!("{}: {e}", self.path.display())))?;
        f(&mut conn)
    }
}

/// Creates the parent directory and the schema. Safe to call on every run.
pub fn init_db(db: &Database) -> Result<(), DbError> {
    if let Some(parent) = db.path().parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| DbError::Open(format!("cannot create {}: {e}", parent.display())))?;
    }

    db.with_conn(|conn| {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| DbError::Schema(e.to_string()))
    })?;

    tracing::info!(path = %db.path().display(), "database initialized");
    Ok(())
}
