//! Member roster and task board state.
//!
//! [`TeamStore`] owns all members and tasks and exposes the only mutation
//! paths: explicit status changes, activity pings, the inactivity sweep and
//! task CRUD. [`SharedStore`] wraps it in a lock so that background tasks
//! and the host loop can share one writer-serialized instance.

pub mod seed;
pub mod shared;
pub mod team;

pub use shared::SharedStore;
pub use team::{StoreOptions, TeamStore};

use serde::Serialize;
use teampulse_model::member::{Member, MemberId};
use teampulse_model::task::{Task, TaskId};
use thiserror::Error;

/// Errors that can occur during store operations.
///
/// Every failing operation guarantees that no state was changed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// No member with the given ID is on the roster.
    #[error("member not found: {0}")]
    MemberNotFound(MemberId),
    /// No task with the given ID exists.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// The task ID space is used up.
    #[error("no task ids left to allocate")]
    TaskIdsExhausted,
}

/// Result of an activity ping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingOutcome {
    /// The member's activity timestamp was refreshed.
    Recorded,
    /// The member is offline; nothing changed.
    IgnoredOffline,
}

/// An owned, immutable copy of the roster and task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Members in roster order.
    pub members: Vec<Member>,
    /// Tasks in creation order.
    pub tasks: Vec<Task>,
}
