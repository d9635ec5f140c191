//! Hold domain model and polygon geometry validation.
//!
//! # Responsibility
//! - Define holds as polygonal regions on a board image.
//! - Validate that a vertex list forms a usable normalized polygon.
//!
//! # Invariants
//! - A hold has at least 3 vertices.
//! - Every vertex lies in the unit square, both coordinates in [0, 1].
//! - A hold belongs to exactly one board.

use crate::model::board::BoardId;
use crate::model::validate::{ValidationError, Validator};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a hold.
pub type HoldId = Uuid;

/// A 2-D point normalized to the board image, both axes in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A polygonal grip region on a board image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hold {
    /// Stable hold id.
    pub id: HoldId,
    /// Owning board.
    pub board_id: BoardId,
    /// Polygon outline, at least 3 vertices.
    pub vertices: Vec<Point>,
    /// Epoch milliseconds, assigned by storage.
    pub created_at: i64,
    /// Epoch milliseconds, assigned by storage.
    pub updated_at: i64,
}

/// Write input for hold batch operations.
///
/// `id` is ignored by create (new rows always get fresh ids). On update an
/// input with `id` replaces that hold's geometry in place and an input
/// without one inserts a new hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<HoldId>,
    pub vertices: Vec<Point>,
}

impl HoldInput {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { id: None, vertices }
    }

    pub fn existing(id: HoldId, vertices: Vec<Point>) -> Self {
        Self {
            id: Some(id),
            vertices,
        }
    }
}

/// Checks that a vertex list forms a valid normalized polygon.
///
/// Pure function. Each violated rule yields one error keyed by the vertex
/// index and axis (`vertices[2].x`), so callers can surface per-field
/// feedback. NaN coordinates fail the range check.
pub fn validate_vertices(vertices: &[Point]) -> Result<(), ValidationError> {
    let mut v = Validator::new();
    v.check(
        vertices.len() >= 3,
        "vertices",
        "hold must have at least 3 vertices",
    );

    for (i, vertex) in vertices.iter().enumerate() {
        v.check(
            (0.0..=1.0).contains(&vertex.x),
            format!("vertices[{i}].x"),
            "vertex x must be between 0 and 1",
        );
        v.check(
            (0.0..=1.0).contains(&vertex.y),
            format!("vertices[{i}].y"),
            "vertex y must be between 0 and 1",
        );
    }

    v.finish()
}
