//! Problem use-case service.
//!
//! # Responsibility
//! - Own the upstream concerns the request layer should not: problem id
//!   generation and the placeholder setter identity.
//! - Delegate persistence and lifecycle enforcement to the problem store.

use crate::model::board::BoardId;
use crate::model::problem::{
    Problem, ProblemHold, ProblemHoldInput, ProblemId, ProblemStatus, PLACEHOLDER_SETTER,
};
use crate::repo::problem_repo::ProblemStore;
use crate::repo::StoreResult;
use uuid::Uuid;

/// Already-decoded problem write request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemRequest {
    pub name: String,
    pub status: ProblemStatus,
    pub holds: Vec<ProblemHoldInput>,
}

/// Use-case wrapper over the problem store.
pub struct ProblemService<R: ProblemStore> {
    repo: R,
}

impl<R: ProblemStore> ProblemService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a problem on a board.
    ///
    /// Generates the problem id here so membership rows can reference it
    /// within the store's insert transaction, and stamps the placeholder
    /// setter until a real user system exists.
    pub fn create_problem(
        &mut self,
        board_id: BoardId,
        request: &ProblemRequest,
    ) -> StoreResult<Problem> {
        let problem = Problem {
            id: Uuid::new_v4(),
            board_id,
            name: request.name.clone(),
            setter_id: PLACEHOLDER_SETTER,
            status: request.status,
            created_at: 0,
        };
        self.repo.create_problem(board_id, &problem, &request.holds)
    }

    /// Lists a board's problems, newest first.
    pub fn get_problems(&self, board_id: BoardId) -> StoreResult<Vec<Problem>> {
        self.repo.get_problems(board_id)
    }

    /// Fetches one problem scoped to its board.
    pub fn get_problem(&self, board_id: BoardId, problem_id: ProblemId) -> StoreResult<Problem> {
        self.repo.get_problem(board_id, problem_id)
    }

    /// Fetches one problem together with its hold memberships.
    pub fn get_problem_with_holds(
        &self,
        board_id: BoardId,
        problem_id: ProblemId,
    ) -> StoreResult<(Problem, Vec<ProblemHold>)> {
        let problem = self.repo.get_problem(board_id, problem_id)?;
        let holds = self.repo.get_problem_holds(problem_id)?;
        Ok((problem, holds))
    }

    /// Updates a draft problem, replacing its whole membership set.
    pub fn update_problem(
        &mut self,
        board_id: BoardId,
        problem_id: ProblemId,
        request: &ProblemRequest,
    ) -> StoreResult<()> {
        let problem = Problem {
            id: problem_id,
            board_id,
            name: request.name.clone(),
            setter_id: PLACEHOLDER_SETTER,
            status: request.status,
            created_at: 0,
        };
        self.repo.update_problem(board_id, &problem, &request.holds)
    }
}
