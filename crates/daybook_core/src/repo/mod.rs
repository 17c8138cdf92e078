//! Repository layer: SQLite-backed day and task stores.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for days and tasks.
//! - Isolate SQLite query details from engine orchestration.
//! - Translate constraint violations into semantic errors.
//!
//! # Invariants
//! - Repositories only operate on fully migrated connections.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod day_repo;
mod error;
mod schema;
pub mod task_repo;

pub use error::{RepoError, RepoResult};

use crate::db::DbError;
use log::warn;
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Runs `work` inside one IMMEDIATE transaction on `conn`.
///
/// Every statement issued through repositories sharing `conn` joins the
/// transaction. Commits when `work` succeeds; dropping the transaction on
/// error rolls everything back.
pub(crate) fn run_in_transaction<T, E, F>(conn: &Connection, work: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: From<RepoError>,
{
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate).map_err(|err| {
        let err = DbError::from(err);
        if err.is_busy() {
            warn!("event=transaction_begin module=repo status=busy");
        }
        RepoError::Db(err)
    })?;
    let value = work()?;
    tx.commit().map_err(RepoError::from)?;
    Ok(value)
}
