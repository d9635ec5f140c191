//! Hold store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist hold batches for one board; geometry lives as a JSON vertex
//!   list in the `holds.vertices` column.
//! - Keep batch writes atomic: one immediate transaction per call.
//!
//! # Invariants
//! - Every input passes the geometry validator before any SQL runs.
//! - `update_holds` is an additive upsert: rows absent from the input are
//!   never deleted. Problem membership replacement works the opposite way
//!   and the asymmetry is deliberate.
//! - Listing is deterministic: `created_at ASC, id ASC`.

use crate::model::board::BoardId;
use crate::model::hold::{validate_vertices, Hold, HoldId, HoldInput, Point};
use crate::model::validate::Validator;
use crate::repo::{board_exists_on, ensure_connection_ready, StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use uuid::Uuid;

/// Store interface for hold batch operations.
pub trait HoldStore {
    /// Inserts all inputs as new holds in one all-or-nothing transaction.
    ///
    /// Input ids are ignored; identity and timestamps are assigned by
    /// storage and returned populated.
    fn create_holds(&mut self, board_id: BoardId, inputs: &[HoldInput]) -> StoreResult<Vec<Hold>>;
    /// Returns all holds for a board ordered by ascending creation time.
    fn get_holds(&self, board_id: BoardId) -> StoreResult<Vec<Hold>>;
    /// Upserts a batch in one transaction: inputs carrying an id update in
    /// place, inputs without one insert as new holds.
    fn update_holds(&mut self, board_id: BoardId, inputs: &[HoldInput]) -> StoreResult<Vec<Hold>>;
    /// Deletes one hold by id. Missing ids are an idempotent no-op.
    fn delete_hold(&mut self, hold_id: HoldId) -> StoreResult<()>;
}

/// SQLite-backed hold store.
pub struct SqliteHoldRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteHoldRepository<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> StoreResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl HoldStore for SqliteHoldRepository<'_> {
    fn create_holds(&mut self, board_id: BoardId, inputs: &[HoldInput]) -> StoreResult<Vec<Hold>> {
        validate_hold_batch(inputs)?;

        if !board_exists_on(self.conn, board_id)? {
            return Err(StoreError::BoardNotFound(board_id));
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut created = Vec::with_capacity(inputs.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO holds (id, board_id, vertices)
                 VALUES (?1, ?2, ?3)
                 RETURNING created_at, updated_at;",
            )?;

            for input in inputs {
                let id = Uuid::new_v4();
                let vertices_json = vertices_to_json(&input.vertices)?;
                let (created_at, updated_at) = stmt.query_row(
                    params![id.to_string(), board_id.to_string(), vertices_json],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )?;

                created.push(Hold {
                    id,
                    board_id,
                    vertices: input.vertices.clone(),
                    created_at,
                    updated_at,
                });
            }
        }
        tx.commit()?;

        Ok(created)
    }

    fn get_holds(&self, board_id: BoardId) -> StoreResult<Vec<Hold>> {
        if !board_exists_on(&*self.conn, board_id)? {
            return Err(StoreError::BoardNotFound(board_id));
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, board_id, vertices, created_at, updated_at
             FROM holds
             WHERE board_id = ?1
             ORDER BY created_at ASC, id ASC;",
        )?;
        let mut rows = stmt.query([board_id.to_string()])?;
        let mut holds = Vec::new();

        while let Some(row) = rows.next()? {
            let id_text: String = row.get("id")?;
            let board_id_text: String = row.get("board_id")?;
            let vertices_json: String = row.get("vertices")?;

            holds.push(Hold {
                id: parse_uuid(&id_text, "holds.id")?,
                board_id: parse_uuid(&board_id_text, "holds.board_id")?,
                vertices: vertices_from_json(&vertices_json)?,
                created_at: row.get("created_at")?,
                updated_at: row.get("updated_at")?,
            });
        }

        Ok(holds)
    }

    fn update_holds(&mut self, board_id: BoardId, inputs: &[HoldInput]) -> StoreResult<Vec<Hold>> {
        validate_hold_batch(inputs)?;

        if !board_exists_on(self.conn, board_id)? {
            return Err(StoreError::BoardNotFound(board_id));
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut applied = Vec::with_capacity(inputs.len());
        {
            let mut update_stmt = tx.prepare(
                "UPDATE holds
                 SET vertices = ?1, updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?2 AND board_id = ?3
                 RETURNING created_at, updated_at;",
            )?;
            let mut insert_stmt = tx.prepare(
                "INSERT INTO holds (id, board_id, vertices)
                 VALUES (?1, ?2, ?3)
                 RETURNING created_at, updated_at;",
            )?;

            for input in inputs {
                let vertices_json = vertices_to_json(&input.vertices)?;

                let (id, timestamps) = match input.id {
                    Some(id) => {
                        let timestamps = update_stmt
                            .query_row(
                                params![vertices_json, id.to_string(), board_id.to_string()],
                                |row| Ok((row.get(0)?, row.get(1)?)),
                            )
                            .optional()?;
                        // An unknown id aborts the whole batch; the
                        // transaction rolls back on drop.
                        let timestamps = timestamps.ok_or(StoreError::HoldNotFound(id))?;
                        (id, timestamps)
                    }
                    None => {
                        let id = Uuid::new_v4();
                        let timestamps = insert_stmt.query_row(
                            params![id.to_string(), board_id.to_string(), vertices_json],
                            |row| Ok((row.get(0)?, row.get(1)?)),
                        )?;
                        (id, timestamps)
                    }
                };

                applied.push(Hold {
                    id,
                    board_id,
                    vertices: input.vertices.clone(),
                    created_at: timestamps.0,
                    updated_at: timestamps.1,
                });
            }
        }
        tx.commit()?;

        Ok(applied)
    }

    fn delete_hold(&mut self, hold_id: HoldId) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM holds WHERE id = ?1;", [hold_id.to_string()])?;
        Ok(())
    }
}

fn validate_hold_batch(inputs: &[HoldInput]) -> StoreResult<()> {
    let mut v = Validator::new();
    for (i, input) in inputs.iter().enumerate() {
        if let Err(err) = validate_vertices(&input.vertices) {
            v.absorb_prefixed(&format!("holds[{i}]"), err);
        }
    }
    v.finish()?;
    Ok(())
}

pub(crate) fn vertices_to_json(vertices: &[Point]) -> StoreResult<String> {
    serde_json::to_string(vertices)
        .map_err(|err| StoreError::InvalidData(format!("cannot serialize vertices: {err}")))
}

pub(crate) fn vertices_from_json(value: &str) -> StoreResult<Vec<Point>> {
    serde_json::from_str(value).map_err(|err| {
        StoreError::InvalidData(format!("invalid vertices json in holds.vertices: {err}"))
    })
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| StoreError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}
