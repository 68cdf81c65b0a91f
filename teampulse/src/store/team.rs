//! The team store: roster status lifecycle and task board CRUD.
//!
//! All mutating operations take the current time explicitly so the store
//! itself is deterministic. Member status follows a fully connected graph
//! under [`TeamStore::set_status`]; the only autonomous transition is the
//! inactivity sweep into `Offline`, and pings are inert while `Offline`.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use teampulse_model::member::{Member, MemberId, MemberStatus};
use teampulse_model::task::{NewTask, Priority, Task, TaskId};

use super::{EngineError, PingOutcome, Snapshot, seed};

/// Behavioral switches for a [`TeamStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Whether a progress update counts as an activity ping for the assignee.
    pub progress_counts_as_activity: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            progress_counts_as_activity: true,
        }
    }
}

/// Owns the member roster and task list.
#[derive(Debug, Clone)]
pub struct TeamStore {
    members: Vec<Member>,
    tasks: Vec<Task>,
    next_task_id: u64,
    options: StoreOptions,
}

impl TeamStore {
    /// Creates a store with the given roster and no tasks.
    ///
    /// Members with a duplicate ID are dropped; the first occurrence wins.
    #[must_use]
    pub fn new(members: Vec<Member>) -> Self {
        Self::with_tasks(members, Vec::new())
    }

    /// Creates a store with a roster and pre-existing tasks.
    ///
    /// New task IDs are allocated after the highest existing one. A task
    /// with ID `u64::MAX` is dropped, since no ID can follow it.
    #[must_use]
    pub fn with_tasks(members: Vec<Member>, tasks: Vec<Task>) -> Self {
        let mut roster: Vec<Member> = Vec::with_capacity(members.len());
        for member in members {
            if roster.iter().any(|m| m.id == member.id) {
                tracing::warn!(member = %member.id, "dropping duplicate roster entry");
                continue;
            }
            roster.push(member);
        }

        let mut board: Vec<Task> = Vec::with_capacity(tasks.len());
        for task in tasks {
            if board.iter().any(|t| t.id == task.id) {
                tracing::warn!(task = %task.id, "dropping duplicate task entry");
                continue;
            }
            if task.id.get().checked_add(1).is_none() {
                tracing::warn!(task = %task.id, "dropping task with out-of-range id");
                continue;
            }
            board.push(task);
        }

        let next_task_id = board
            .iter()
            .filter_map(|t| t.id.get().checked_add(1))
            .max()
            .unwrap_or(1);

        Self {
            members: roster,
            tasks: board,
            next_task_id,
            options: StoreOptions::default(),
        }
    }

    /// Creates a store populated with the built-in demo roster and tasks.
    #[must_use]
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self::with_tasks(seed::roster(now), seed::tasks())
    }

    /// Replaces the store's behavioral options.
    #[must_use]
    pub const fn with_options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the active options.
    #[must_use]
    pub const fn options(&self) -> StoreOptions {
        self.options
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// All members in roster order.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// All tasks in creation order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a member by ID.
    #[must_use]
    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.iter().find(|m| &m.id == id)
    }

    /// Looks up a member by display name.
    #[must_use]
    pub fn member_by_name(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Looks up a task by ID.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks assigned to the given member, in creation order.
    pub fn tasks_for<'a>(&'a self, member_id: &'a MemberId) -> impl Iterator<Item = &'a Task> {
        self.tasks.iter().filter(move |t| &t.assigned_to == member_id)
    }

    /// Returns an owned copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            members: self.members.clone(),
            tasks: self.tasks.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // Member status lifecycle
    // -----------------------------------------------------------------------

    /// Sets a member's status and records activity at `now`.
    ///
    /// Activity is recorded even when the status is unchanged. This is the
    /// only operation that can revive a member from `Offline`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MemberNotFound`] if the member does not exist.
    pub fn set_status(
        &mut self,
        member_id: &MemberId,
        status: MemberStatus,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        let member = self.member_mut(member_id)?;
        let previous = member.status;
        member.status = status;
        member.touch(now);

        if previous == status {
            tracing::debug!(member = %member_id, %status, "status re-affirmed");
        } else {
            tracing::info!(member = %member_id, from = %previous, to = %status, "status changed");
        }
        Ok(())
    }

    /// Records that a member is active at `now`.
    ///
    /// A ping never revives an `Offline` member and never moves its
    /// timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MemberNotFound`] if the member does not exist.
    pub fn ping_activity(
        &mut self,
        member_id: &MemberId,
        now: DateTime<Utc>,
    ) -> Result<PingOutcome, EngineError> {
        let member = self.member_mut(member_id)?;
        if member.status.is_offline() {
            tracing::trace!(member = %member_id, "ping ignored while offline");
            return Ok(PingOutcome::IgnoredOffline);
        }
        member.touch(now);
        Ok(PingOutcome::Recorded)
    }

    /// Moves every member idle for longer than `threshold` to `Offline`.
    ///
    /// A member is swept when it is not already `Offline` and its last
    /// activity is strictly before `now - threshold`. The transition stamps
    /// activity at `now` so the member is not re-evaluated as idle. Members
    /// without recorded activity are never swept.
    ///
    /// Returns the number of members transitioned.
    pub fn sweep_inactive(&mut self, now: DateTime<Utc>, threshold: Duration) -> usize {
        let Some(cutoff) = TimeDelta::from_std(threshold)
            .ok()
            .and_then(|delta| now.checked_sub_signed(delta))
        else {
            return 0;
        };

        let mut transitioned = 0;
        for member in &mut self.members {
            if member.status.is_offline() || !member.idle_before(cutoff) {
                continue;
            }
            tracing::info!(
                member = %member.id,
                from = %member.status,
                last_activity = ?member.last_activity,
                "marking idle member offline"
            );
            member.status = MemberStatus::Offline;
            member.touch(now);
            transitioned += 1;
        }
        transitioned
    }

    // -----------------------------------------------------------------------
    // Task board
    // -----------------------------------------------------------------------

    /// Appends a new task at zero progress and returns its freshly
    /// allocated ID.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TaskIdsExhausted`] if no further ID can be
    /// allocated.
    pub fn add_task(&mut self, new: NewTask) -> Result<TaskId, EngineError> {
        let id = TaskId::new(self.next_task_id);
        self.next_task_id = self
            .next_task_id
            .checked_add(1)
            .ok_or(EngineError::TaskIdsExhausted)?;

        let task = Task::from_new(id, new);
        tracing::debug!(task = %id, assignee = %task.assigned_to, "task added");
        self.tasks.push(task);
        Ok(id)
    }

    /// Sets a task's progress, clamped into `0..=100`.
    ///
    /// When [`StoreOptions::progress_counts_as_activity`] is set, the
    /// assignee's activity is refreshed at `now` unless they are `Offline`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TaskNotFound`] if the task does not exist.
    pub fn update_task_progress(
        &mut self,
        task_id: TaskId,
        progress: i64,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        let task = self.task_mut(task_id)?;
        task.set_progress(progress);
        let assignee = task.assigned_to.clone();
        tracing::debug!(
            task = %task_id,
            progress = task.progress(),
            completed = task.is_completed(),
            "task progress updated"
        );

        if self.options.progress_counts_as_activity
            && let Some(member) = self.members.iter_mut().find(|m| m.id == assignee)
            && !member.status.is_offline()
        {
            member.touch(now);
        }
        Ok(())
    }

    /// Sets a task's priority.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TaskNotFound`] if the task does not exist.
    pub fn update_task_priority(
        &mut self,
        task_id: TaskId,
        priority: Priority,
    ) -> Result<(), EngineError> {
        let task = self.task_mut(task_id)?;
        task.priority = priority;
        Ok(())
    }

    /// Removes a task and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TaskNotFound`] if the task does not exist.
    pub fn delete_task(&mut self, task_id: TaskId) -> Result<Task, EngineError> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or(EngineError::TaskNotFound(task_id))?;
        tracing::debug!(task = %task_id, "task deleted");
        Ok(self.tasks.remove(index))
    }

    fn member_mut(&mut self, member_id: &MemberId) -> Result<&mut Member, EngineError> {
        self.members
            .iter_mut()
            .find(|m| &m.id == member_id)
            .ok_or_else(|| EngineError::MemberNotFound(member_id.clone()))
    }

    fn task_mut(&mut self, task_id: TaskId) -> Result<&mut Task, EngineError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or(EngineError::TaskNotFound(task_id))
    }
}
