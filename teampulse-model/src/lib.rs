//! Shared data model for the `TeamPulse` status engine.

pub mod member;
pub mod role;
pub mod task;

use thiserror::Error;

/// Errors produced when parsing model values from user-facing strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Not one of `working`, `break`, `meeting`, `offline`.
    #[error("invalid status: {0}")]
    InvalidStatus(String),
    /// Not one of `low`, `medium`, `high`.
    #[error("invalid priority: {0}")]
    InvalidPriority(String),
    /// Not one of `lead`, `member`.
    #[error("invalid role: {0}")]
    InvalidRole(String),
}
