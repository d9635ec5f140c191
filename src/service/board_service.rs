//! Board use-case service.

use crate::model::board::{Board, BoardId};
use crate::repo::board_repo::BoardStore;
use crate::repo::StoreResult;

/// Use-case wrapper over the board gateway.
pub struct BoardService<R: BoardStore> {
    repo: R,
}

impl<R: BoardStore> BoardService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a board from already-decoded input.
    pub fn create_board(&self, name: &str, image: &[u8]) -> StoreResult<Board> {
        self.repo.create_board(name, image)
    }

    /// Fetches one board, `BoardNotFound` if absent.
    pub fn get_board(&self, board_id: BoardId) -> StoreResult<Board> {
        self.repo.get_board(board_id)
    }

    pub fn board_exists(&self, board_id: BoardId) -> StoreResult<bool> {
        self.repo.board_exists(board_id)
    }

    pub fn list_boards(&self) -> StoreResult<Vec<Board>> {
        self.repo.list_boards()
    }
}
