//! Domain model for boards, holds and problems.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep validation pure: rule checks accumulate named field errors and
//!   never touch storage.
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID.
//! - Board is the root aggregate; holds and problems reference it by id.

pub mod board;
pub mod hold;
pub mod problem;
pub mod validate;
