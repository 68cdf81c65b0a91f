//! Task types for the team task board.
//!
//! Completion is never stored independently: a task is complete exactly
//! when its progress is [`MAX_PROGRESS`]. Progress can only be written
//! through [`Task::set_progress`], which clamps into `0..=MAX_PROGRESS`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ParseError;
use crate::member::MemberId;

/// Progress value at which a task counts as completed.
pub const MAX_PROGRESS: u8 = 100;

/// Clamps an arbitrary progress input into `0..=MAX_PROGRESS`.
#[must_use]
pub fn clamp_progress(progress: i64) -> u8 {
    u8::try_from(progress.clamp(0, i64::from(MAX_PROGRESS))).unwrap_or(0)
}

/// Unique identifier for a task.
///
/// Allocated from a monotonically increasing counter owned by the store,
/// so two tasks created by the same store never share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Creates a task id from its raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority.
    Medium,
    /// High priority.
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseError::InvalidPriority(s.to_string())),
        }
    }
}

/// Input for creating a task. The store assigns the id; every new task
/// starts at zero progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Task title.
    pub title: String,
    /// Due date.
    pub due_date: NaiveDate,
    /// Member the task is assigned to.
    pub assigned_to: MemberId,
    /// Priority.
    pub priority: Priority,
}

/// A task assigned to one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "TaskRecord", from = "TaskRecord")]
pub struct Task {
    /// Unique identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Due date.
    pub due_date: NaiveDate,
    /// Member the task is assigned to. A reference only; the task does not
    /// depend on the member's status.
    pub assigned_to: MemberId,
    /// Priority.
    pub priority: Priority,
    progress: u8,
}

impl Task {
    /// Builds a task from creation input and an allocated id, at zero
    /// progress.
    #[must_use]
    pub fn from_new(id: TaskId, new: NewTask) -> Self {
        Self {
            id,
            title: new.title,
            due_date: new.due_date,
            assigned_to: new.assigned_to,
            priority: new.priority,
            progress: 0,
        }
    }

    /// Current progress in `0..=MAX_PROGRESS`.
    #[must_use]
    pub const fn progress(&self) -> u8 {
        self.progress
    }

    /// Sets progress, clamping into `0..=MAX_PROGRESS`.
    pub fn set_progress(&mut self, progress: i64) {
        self.progress = clamp_progress(progress);
    }

    /// Returns `true` exactly when progress is [`MAX_PROGRESS`].
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.progress == MAX_PROGRESS
    }
}

/// Serialized shape of a [`Task`], carrying the derived `completed` flag.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    id: TaskId,
    title: String,
    due_date: NaiveDate,
    progress: u8,
    assigned_to: MemberId,
    completed: bool,
    priority: Priority,
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        let completed = task.is_completed();
        Self {
            id: task.id,
            title: task.title,
            due_date: task.due_date,
            progress: task.progress,
            assigned_to: task.assigned_to,
            completed,
            priority: task.priority,
        }
    }
}

impl From<TaskRecord> for Task {
    // `completed` is recomputed from progress rather than trusted.
    fn from(record: TaskRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            due_date: record.due_date,
            assigned_to: record.assigned_to,
            priority: record.priority,
            progress: clamp_progress(i64::from(record.progress)),
        }
    }
}
