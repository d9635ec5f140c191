//! Store layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for boards, holds and
//!   problems.
//! - Isolate SQL details and transaction boundaries from service callers.
//!
//! # Invariants
//! - Write paths validate domain rules before any SQL mutation.
//! - Multi-row writes run in one immediate transaction; partial application
//!   is never observable.
//! - Not-found conditions are semantic variants, distinguishable by entity
//!   kind, never generic storage errors.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::board::BoardId;
use crate::model::hold::HoldId;
use crate::model::problem::ProblemId;
use crate::model::validate::ValidationError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod board_repo;
pub mod hold_repo;
pub mod problem_repo;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error taxonomy shared by all stores.
#[derive(Debug)]
pub enum StoreError {
    /// Structural or geometric rule violation, carries a field -> message map.
    Validation(ValidationError),
    /// Underlying SQLite/bootstrap failure, opaque to callers.
    Db(DbError),
    /// Referenced board does not exist.
    BoardNotFound(BoardId),
    /// Referenced hold does not exist on the target board.
    HoldNotFound(HoldId),
    /// Problem absent or owned by a different board.
    ProblemNotFound(ProblemId),
    /// Attempted edit of a published, immutable problem.
    ProblemPublished(ProblemId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::BoardNotFound(id) => write!(f, "board not found: {id}"),
            Self::HoldNotFound(id) => write!(f, "hold not found: {id}"),
            Self::ProblemNotFound(id) => write!(f, "problem not found: {id}"),
            Self::ProblemPublished(id) => {
                write!(f, "problem is published and immutable: {id}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Rejects connections whose schema has not been migrated to the version
/// this binary expects.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> StoreResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

/// Board existence precondition shared by all stores. Works on plain
/// connections and inside transactions alike.
pub(crate) fn board_exists_on(conn: &Connection, board_id: BoardId) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM boards WHERE id = ?1);",
        [board_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
