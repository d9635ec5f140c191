//! Board domain model.
//!
//! # Responsibility
//! - Define the root aggregate that holds and problems belong to.
//!
//! # Invariants
//! - `id` is stable and never reused for another board.
//! - `image` is an opaque blob; the core never interprets its content.
//! - `version` is written on create. No exposed operation checks it yet.

use crate::model::validate::{ValidationError, Validator};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a board.
pub type BoardId = Uuid;

/// A physical climbing wall layout with its photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// Stable board id.
    pub id: BoardId,
    pub name: String,
    /// Raw image bytes, required but never validated beyond presence.
    pub image: Vec<u8>,
    /// Epoch milliseconds, assigned by storage on create.
    pub created_at: i64,
    /// Epoch milliseconds, assigned by storage on create.
    pub updated_at: i64,
    /// Optimistic-concurrency counter, starts at 1.
    pub version: i64,
}

/// Checks board creation input.
pub fn validate_board(name: &str, image: &[u8]) -> Result<(), ValidationError> {
    let mut v = Validator::new();
    v.check(!name.is_empty(), "name", "must be provided");
    v.check(!image.is_empty(), "image", "must be provided");
    v.finish()
}
