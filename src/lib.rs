//! Core domain logic for the climbing-board backend.
//! This crate is the single source of truth for business invariants:
//! polygon geometry rules, problem structure rules, the DRAFT -> PUBLISHED
//! lifecycle, and atomic multi-row persistence.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::board::{validate_board, Board, BoardId};
pub use model::hold::{validate_vertices, Hold, HoldId, HoldInput, Point};
pub use model::problem::{
    validate_problem, HoldRole, Problem, ProblemHold, ProblemHoldInput, ProblemId, ProblemStatus,
    SetterId, PLACEHOLDER_SETTER,
};
pub use model::validate::{ValidationError, Validator};
pub use repo::board_repo::{BoardStore, SqliteBoardRepository};
pub use repo::hold_repo::{HoldStore, SqliteHoldRepository};
pub use repo::problem_repo::{ProblemStore, SqliteProblemRepository};
pub use repo::{StoreError, StoreResult};
pub use service::board_service::BoardService;
pub use service::hold_service::HoldService;
pub use service::problem_service::{ProblemRequest, ProblemService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
