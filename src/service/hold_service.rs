//! Hold use-case service.
//!
//! # Invariants
//! - Service APIs never bypass store validation/transaction contracts.

use crate::model::board::BoardId;
use crate::model::hold::{Hold, HoldId, HoldInput};
use crate::repo::hold_repo::HoldStore;
use crate::repo::StoreResult;

/// Use-case wrapper over the hold store.
pub struct HoldService<R: HoldStore> {
    repo: R,
}

impl<R: HoldStore> HoldService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a batch of holds for one board, all-or-nothing.
    pub fn create_holds(
        &mut self,
        board_id: BoardId,
        inputs: &[HoldInput],
    ) -> StoreResult<Vec<Hold>> {
        self.repo.create_holds(board_id, inputs)
    }

    /// Lists a board's holds, oldest first.
    pub fn get_holds(&self, board_id: BoardId) -> StoreResult<Vec<Hold>> {
        self.repo.get_holds(board_id)
    }

    /// Upserts a batch: known ids update in place, the rest insert.
    pub fn update_holds(
        &mut self,
        board_id: BoardId,
        inputs: &[HoldInput],
    ) -> StoreResult<Vec<Hold>> {
        self.repo.update_holds(board_id, inputs)
    }

    /// Deletes one hold by id.
    pub fn delete_hold(&mut self, hold_id: HoldId) -> StoreResult<()> {
        self.repo.delete_hold(hold_id)
    }
}
