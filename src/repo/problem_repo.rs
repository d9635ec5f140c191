//! Problem store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist problems and their ordered hold memberships.
//! - Enforce the one-way DRAFT -> PUBLISHED lifecycle.
//!
//! # Invariants
//! - Problem and membership rows are written in one immediate transaction.
//! - A published problem rejects every update with `ProblemPublished`.
//! - Membership replacement on update is total: delete all rows, reinsert
//!   the submitted set with fresh ids.
//! - Every referenced hold must exist on the problem's board.

use crate::model::board::BoardId;
use crate::model::problem::{
    validate_problem, HoldRole, Problem, ProblemHold, ProblemHoldInput, ProblemId, ProblemStatus,
};
use crate::model::validate::Validator;
use crate::repo::hold_repo::{parse_uuid, vertices_from_json};
use crate::repo::{board_exists_on, ensure_connection_ready, StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use uuid::Uuid;

/// Store interface for problem operations.
pub trait ProblemStore {
    /// Inserts the problem row and all membership rows transactionally.
    ///
    /// The problem id is caller-supplied so membership rows can reference
    /// it inside the same transaction. Returns the problem with its
    /// creation timestamp populated.
    fn create_problem(
        &mut self,
        board_id: BoardId,
        problem: &Problem,
        holds: &[ProblemHoldInput],
    ) -> StoreResult<Problem>;
    /// Lists a board's problems, newest first.
    fn get_problems(&self, board_id: BoardId) -> StoreResult<Vec<Problem>>;
    /// Fetches one problem scoped to its board.
    fn get_problem(&self, board_id: BoardId, problem_id: ProblemId) -> StoreResult<Problem>;
    /// Fetches membership rows joined with each hold's geometry.
    fn get_problem_holds(&self, problem_id: ProblemId) -> StoreResult<Vec<ProblemHold>>;
    /// Replaces a draft problem's name/status and its whole membership set.
    fn update_problem(
        &mut self,
        board_id: BoardId,
        problem: &Problem,
        holds: &[ProblemHoldInput],
    ) -> StoreResult<()>;
}

/// SQLite-backed problem store.
pub struct SqliteProblemRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteProblemRepository<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> StoreResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ProblemStore for SqliteProblemRepository<'_> {
    fn create_problem(
        &mut self,
        board_id: BoardId,
        problem: &Problem,
        holds: &[ProblemHoldInput],
    ) -> StoreResult<Problem> {
        validate_problem(&problem.name, holds)?;

        if !board_exists_on(self.conn, board_id)? {
            return Err(StoreError::BoardNotFound(board_id));
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        ensure_holds_on_board(&tx, board_id, holds)?;

        let created_at: i64 = tx.query_row(
            "INSERT INTO problems (id, board_id, name, setter_id, status)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING created_at;",
            params![
                problem.id.to_string(),
                board_id.to_string(),
                problem.name,
                problem.setter_id.to_string(),
                status_to_db(problem.status),
            ],
            |row| row.get(0),
        )?;

        insert_memberships(&tx, problem.id, holds)?;
        tx.commit()?;

        Ok(Problem {
            created_at,
            board_id,
            ..problem.clone()
        })
    }

    fn get_problems(&self, board_id: BoardId) -> StoreResult<Vec<Problem>> {
        if !board_exists_on(&*self.conn, board_id)? {
            return Err(StoreError::BoardNotFound(board_id));
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, board_id, name, setter_id, status, created_at
             FROM problems
             WHERE board_id = ?1
             ORDER BY created_at DESC, id ASC;",
        )?;
        let mut rows = stmt.query([board_id.to_string()])?;
        let mut problems = Vec::new();

        while let Some(row) = rows.next()? {
            problems.push(parse_problem_row(
                row.get("id")?,
                row.get("board_id")?,
                row.get("name")?,
                row.get("setter_id")?,
                row.get("status")?,
                row.get("created_at")?,
            )?);
        }

        Ok(problems)
    }

    fn get_problem(&self, board_id: BoardId, problem_id: ProblemId) -> StoreResult<Problem> {
        let row = self
            .conn
            .query_row(
                "SELECT id, board_id, name, setter_id, status, created_at
                 FROM problems
                 WHERE id = ?1 AND board_id = ?2;",
                params![problem_id.to_string(), board_id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>("id")?,
                        row.get::<_, String>("board_id")?,
                        row.get::<_, String>("name")?,
                        row.get::<_, String>("setter_id")?,
                        row.get::<_, String>("status")?,
                        row.get::<_, i64>("created_at")?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((id, board, name, setter, status, created_at)) => {
                parse_problem_row(id, board, name, setter, status, created_at)
            }
            None => Err(StoreError::ProblemNotFound(problem_id)),
        }
    }

    fn get_problem_holds(&self, problem_id: ProblemId) -> StoreResult<Vec<ProblemHold>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                ph.id,
                ph.problem_id,
                ph.hold_id,
                ph.type,
                h.vertices
             FROM problem_holds ph
             JOIN holds h ON h.id = ph.hold_id
             WHERE ph.problem_id = ?1
             ORDER BY ph.id ASC;",
        )?;
        let mut rows = stmt.query([problem_id.to_string()])?;
        let mut holds = Vec::new();

        while let Some(row) = rows.next()? {
            let id_text: String = row.get("id")?;
            let problem_id_text: String = row.get("problem_id")?;
            let hold_id_text: String = row.get("hold_id")?;
            let role_text: String = row.get("type")?;
            let vertices_json: String = row.get("vertices")?;

            holds.push(ProblemHold {
                id: parse_uuid(&id_text, "problem_holds.id")?,
                problem_id: parse_uuid(&problem_id_text, "problem_holds.problem_id")?,
                hold_id: parse_uuid(&hold_id_text, "problem_holds.hold_id")?,
                role: parse_role(&role_text).ok_or_else(|| {
                    StoreError::InvalidData(format!(
                        "invalid hold role `{role_text}` in problem_holds.type"
                    ))
                })?,
                vertices: vertices_from_json(&vertices_json)?,
            });
        }

        Ok(holds)
    }

    fn update_problem(
        &mut self,
        board_id: BoardId,
        problem: &Problem,
        holds: &[ProblemHoldInput],
    ) -> StoreResult<()> {
        validate_problem(&problem.name, holds)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let stored_status = tx
            .query_row(
                "SELECT status FROM problems WHERE id = ?1 AND board_id = ?2;",
                params![problem.id.to_string(), board_id.to_string()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        let stored_status = match stored_status {
            Some(value) => parse_status(&value).ok_or_else(|| {
                StoreError::InvalidData(format!(
                    "invalid problem status `{value}` in problems.status"
                ))
            })?,
            None => return Err(StoreError::ProblemNotFound(problem.id)),
        };

        if stored_status != ProblemStatus::Draft {
            return Err(StoreError::ProblemPublished(problem.id));
        }

        ensure_holds_on_board(&tx, board_id, holds)?;

        tx.execute(
            "UPDATE problems
             SET name = ?1, status = ?2
             WHERE id = ?3 AND board_id = ?4;",
            params![
                problem.name,
                status_to_db(problem.status),
                problem.id.to_string(),
                board_id.to_string(),
            ],
        )?;

        tx.execute(
            "DELETE FROM problem_holds WHERE problem_id = ?1;",
            [problem.id.to_string()],
        )?;

        insert_memberships(&tx, problem.id, holds)?;
        tx.commit()?;

        Ok(())
    }
}

/// Rejects memberships naming holds that do not exist on the target board.
///
/// The original backend never checked this cross-aggregate reference; the
/// check is cheap inside the write transaction, so the gap is closed here.
fn ensure_holds_on_board(
    tx: &Transaction<'_>,
    board_id: BoardId,
    holds: &[ProblemHoldInput],
) -> StoreResult<()> {
    let mut stmt = tx.prepare(
        "SELECT EXISTS(SELECT 1 FROM holds WHERE id = ?1 AND board_id = ?2);",
    )?;
    let mut v = Validator::new();

    for (i, hold) in holds.iter().enumerate() {
        let exists: i64 = stmt.query_row(
            params![hold.hold_id.to_string(), board_id.to_string()],
            |row| row.get(0),
        )?;
        v.check(
            exists == 1,
            format!("holds[{i}].holdID"),
            "hold does not belong to board",
        );
    }

    v.finish()?;
    Ok(())
}

fn insert_memberships(
    tx: &Transaction<'_>,
    problem_id: ProblemId,
    holds: &[ProblemHoldInput],
) -> StoreResult<()> {
    let mut stmt = tx.prepare(
        "INSERT INTO problem_holds (id, problem_id, hold_id, type)
         VALUES (?1, ?2, ?3, ?4);",
    )?;

    for hold in holds {
        stmt.execute(params![
            Uuid::new_v4().to_string(),
            problem_id.to_string(),
            hold.hold_id.to_string(),
            role_to_db(hold.role),
        ])?;
    }

    Ok(())
}

fn parse_problem_row(
    id: String,
    board_id: String,
    name: String,
    setter_id: String,
    status: String,
    created_at: i64,
) -> StoreResult<Problem> {
    Ok(Problem {
        id: parse_uuid(&id, "problems.id")?,
        board_id: parse_uuid(&board_id, "problems.board_id")?,
        name,
        setter_id: parse_uuid(&setter_id, "problems.setter_id")?,
        status: parse_status(&status).ok_or_else(|| {
            StoreError::InvalidData(format!("invalid problem status `{status}` in problems.status"))
        })?,
        created_at,
    })
}

fn status_to_db(status: ProblemStatus) -> &'static str {
    match status {
        ProblemStatus::Draft => "DRAFT",
        ProblemStatus::Published => "PUBLISHED",
    }
}

fn parse_status(value: &str) -> Option<ProblemStatus> {
    match value {
        "DRAFT" => Some(ProblemStatus::Draft),
        "PUBLISHED" => Some(ProblemStatus::Published),
        _ => None,
    }
}

fn role_to_db(role: HoldRole) -> &'static str {
    match role {
        HoldRole::Start => "start",
        HoldRole::Hand => "hand",
        HoldRole::Foot => "foot",
        HoldRole::Finish => "finish",
    }
}

fn parse_role(value: &str) -> Option<HoldRole> {
    match value {
        "start" => Some(HoldRole::Start),
        "hand" => Some(HoldRole::Hand),
        "foot" => Some(HoldRole::Foot),
        "finish" => Some(HoldRole::Finish),
        _ => None,
    }
}
