//! Board gateway contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide board lookup used as a precondition by the hold and problem
//!   stores.
//! - Own board creation and listing.
//!
//! # Invariants
//! - `get_board` distinguishes board absence (`BoardNotFound`) from storage
//!   failure; callers map the former to a not-found response.
//! - Id, timestamps and the version counter are assigned by storage.

use crate::model::board::{validate_board, Board, BoardId};
use crate::repo::{board_exists_on, ensure_connection_ready, StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const BOARD_SELECT_SQL: &str = "SELECT
    id,
    name,
    image,
    created_at,
    updated_at,
    version
FROM boards";

/// Gateway interface for board lookup and creation.
pub trait BoardStore {
    /// Creates a board, returning it with id/timestamps/version populated.
    fn create_board(&self, name: &str, image: &[u8]) -> StoreResult<Board>;
    /// Fetches one board, `BoardNotFound` if absent.
    fn get_board(&self, board_id: BoardId) -> StoreResult<Board>;
    /// Existence precondition used before dependent writes.
    fn board_exists(&self, board_id: BoardId) -> StoreResult<bool>;
    /// Lists all boards.
    fn list_boards(&self) -> StoreResult<Vec<Board>>;
}

/// SQLite-backed board gateway.
pub struct SqliteBoardRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBoardRepository<'conn> {
    /// Constructs a gateway from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl BoardStore for SqliteBoardRepository<'_> {
    fn create_board(&self, name: &str, image: &[u8]) -> StoreResult<Board> {
        validate_board(name, image)?;

        let id = Uuid::new_v4();
        let (created_at, updated_at, version) = self.conn.query_row(
            "INSERT INTO boards (id, name, image)
             VALUES (?1, ?2, ?3)
             RETURNING created_at, updated_at, version;",
            params![id.to_string(), name, image],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        Ok(Board {
            id,
            name: name.to_string(),
            image: image.to_vec(),
            created_at,
            updated_at,
            version,
        })
    }

    fn get_board(&self, board_id: BoardId) -> StoreResult<Board> {
        let board = self
            .conn
            .query_row(
                &format!("{BOARD_SELECT_SQL} WHERE id = ?1;"),
                [board_id.to_string()],
                parse_board_row,
            )
            .optional()?;

        board.ok_or(StoreError::BoardNotFound(board_id))
    }

    fn board_exists(&self, board_id: BoardId) -> StoreResult<bool> {
        board_exists_on(self.conn, board_id)
    }

    fn list_boards(&self) -> StoreResult<Vec<Board>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOARD_SELECT_SQL} ORDER BY created_at ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut boards = Vec::new();
        while let Some(row) = rows.next()? {
            boards.push(parse_board_row(row)?);
        }
        Ok(boards)
    }
}

fn parse_board_row(row: &Row<'_>) -> rusqlite::Result<Board> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid_column(&id_text, 0)?;

    Ok(Board {
        id,
        name: row.get("name")?,
        image: row.get("image")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        version: row.get("version")?,
    })
}

fn parse_uuid_column(value: &str, column_index: usize) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(value).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            column_index,
            rusqlite::types::Type::Text,
            Box::new(err),
        )
    })
}
