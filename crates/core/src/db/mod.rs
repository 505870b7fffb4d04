//! SQLite-backed record store for prompts.
//!
//! [`Db`] owns the single connection used for the lifetime of the process.
//! Each mutating operation is its own implicit commit boundary.

use std::path::Path;

use rusqlite::Connection;

use crate::errors::{Result, VaultError};

pub mod prompts;
pub mod schema;

pub use prompts::{serialize_for_export, ExportRecord, Prompt, PromptFilter, SaveOutcome};

/// Exclusive handle to the prompt database
pub struct Db {
    conn: Connection,
}

impl Db {
    /// Open (or create) the database file at `path` and ensure the schema exists
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create directory if it doesn't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    VaultError::ConfigError(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened prompt database");
        Self::with_connection(conn)
    }

    /// Open a private in-memory database (tests, throwaway sessions)
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Apply the schema. Safe to call any number of times.
    pub fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(schema::SCHEMA)?;
        Ok(())
    }

    /// Make every insert, update or delete of a row titled `marker` fail
    /// inside SQLite, so error paths can be exercised.
    #[cfg(test)]
    pub(crate) fn fail_writes_titled(&self, marker: &str) -> Result<()> {
        let marker = marker.replace('\'', "''");
        self.conn.execute_batch(&format!(
            "CREATE TRIGGER IF NOT EXISTS fail_insert BEFORE INSERT ON prompts
               WHEN NEW.title = '{marker}' BEGIN SELECT RAISE(ABORT, 'insert rejected'); END;
             CREATE TRIGGER IF NOT EXISTS fail_update BEFORE UPDATE ON prompts
               WHEN NEW.title = '{marker}' BEGIN SELECT RAISE(ABORT, 'update rejected'); END;
             CREATE TRIGGER IF NOT EXISTS fail_delete BEFORE DELETE ON prompts
               WHEN OLD.title = '{marker}' BEGIN SELECT RAISE(ABORT, 'delete rejected'); END;"
        ))?;
        Ok(())
    }

    /// Release the connection, surfacing any error SQLite reports on close
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| {
            tracing::error!(error = %e, "failed to close prompt database");
            VaultError::DatabaseError(e)
        })
    }
}
