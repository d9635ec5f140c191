//! Problem domain model and structural validation.
//!
//! # Responsibility
//! - Define problems (named hold sets with role tags) and their lifecycle.
//! - Validate the structural rules shared by create and update.
//!
//! # Invariants
//! - Lifecycle is one-way: DRAFT -> PUBLISHED, immutable thereafter.
//! - A problem references at least 3 holds, exactly 2 of them tagged start.
//! - Role counting is order-independent.

use crate::model::board::BoardId;
use crate::model::hold::{HoldId, Point};
use crate::model::validate::{ValidationError, Validator};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a problem.
pub type ProblemId = Uuid;

/// Identity of the problem setter.
pub type SetterId = Uuid;

/// Stand-in setter identity until a real user system exists.
pub const PLACEHOLDER_SETTER: SetterId =
    Uuid::from_u128(0x1000_0000_0000_0000_0000_0000_0000_0001);

/// Problem lifecycle state.
///
/// Creation stores whatever valid status the caller supplies; there is no
/// PUBLISHED -> DRAFT transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProblemStatus {
    Draft,
    Published,
}

/// Classification of a hold's function within a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldRole {
    Start,
    Hand,
    Foot,
    Finish,
}

/// A named climbing route on one board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    /// Stable problem id, generated upstream so membership rows can
    /// reference it within the same insert transaction.
    pub id: ProblemId,
    /// Owning board.
    pub board_id: BoardId,
    pub name: String,
    pub setter_id: SetterId,
    pub status: ProblemStatus,
    /// Epoch milliseconds, assigned by storage on create.
    pub created_at: i64,
}

/// Write input for one problem-to-hold membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemHoldInput {
    pub hold_id: HoldId,
    pub role: HoldRole,
}

/// Membership read model: role tag joined with the hold's geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemHold {
    /// Stable membership row id, regenerated on every full replace.
    pub id: Uuid,
    pub problem_id: ProblemId,
    pub hold_id: HoldId,
    pub role: HoldRole,
    /// Geometry of the referenced hold.
    pub vertices: Vec<Point>,
}

/// Checks the structural rules shared by problem create and update.
///
/// Counts start holds by tag value over the whole submitted set, not by
/// position.
pub fn validate_problem(name: &str, holds: &[ProblemHoldInput]) -> Result<(), ValidationError> {
    let mut v = Validator::new();
    v.check(!name.is_empty(), "name", "must be provided");
    v.check(
        holds.len() >= 3,
        "holds",
        "problem must have at least 3 holds",
    );

    let start_holds = holds
        .iter()
        .filter(|hold| hold.role == HoldRole::Start)
        .count();
    v.check(
        start_holds == 2,
        "startHolds",
        "problem must have exactly 2 start holds",
    );

    v.finish()
}
