//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the day/task stores.
//! - Apply schema migrations (including the initial day seed) in order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - A connection returned from this module always holds exactly one active
//!   day unless the data was tampered with after opening.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failures while opening, migrating or locking a daybook store.
#[derive(Debug)]
pub enum DbError {
    /// SQLite rejected the connection or a statement.
    Sqlite(rusqlite::Error),
    /// The file was migrated by a newer daybook build.
    SchemaTooNew { found: u32, supported: u32 },
}

impl DbError {
    /// True when another connection kept the write lock past the busy timeout.
    pub fn is_busy(&self) -> bool {
        match self {
            Self::Sqlite(rusqlite::Error::SqliteFailure(inner, _)) => {
                inner.code == rusqlite::ErrorCode::DatabaseBusy
            }
            _ => false,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "daybook store error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "daybook store uses schema version {found}; this build supports up to {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
