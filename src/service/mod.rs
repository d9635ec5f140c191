//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into use-case level APIs.
//! - Keep request-handling layers decoupled from storage details.

pub mod board_service;
pub mod hold_service;
pub mod problem_service;
