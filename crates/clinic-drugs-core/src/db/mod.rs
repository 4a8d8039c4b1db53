//! Database layer for clinic-drugs.

mod schema;
mod clinics;
mod drugs;
mod prescriptions;
mod stocks;
mod store;

pub use schema::*;
pub use store::*;

use rusqlite::{Connection, ErrorCode};
use std::path::Path;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[source] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Invalid stored value: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for DbError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(err, msg)
                if err.code == ErrorCode::ConstraintViolation =>
            {
                DbError::Constraint(msg.unwrap_or_else(|| err.to_string()))
            }
            other => DbError::Sqlite(other),
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;

/// Stored date format for stock dates.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `work` inside a transaction.
    ///
    /// Commits when `work` returns `Ok`. Any error, including one raised by
    /// the commit itself, leaves the database as it was before the call: the
    /// transaction guard rolls back when dropped.
    pub fn run_in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<DbError>,
    {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(DbError::from)?;
        let value = work(self)?;
        tx.commit().map_err(DbError::from)?;
        Ok(value)
    }
}
