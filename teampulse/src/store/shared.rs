//! Cloneable, lock-serialized handle to a [`TeamStore`].
//!
//! Each method acquires the lock exactly once and never holds it across an
//! `.await`, so every operation is atomic with respect to every other one
//! and a sweep always evaluates a consistent view of the whole roster.
//! The clock is read while the lock is held: stamps follow the order in
//! which operations are applied.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use teampulse_model::member::{Member, MemberId, MemberStatus};
use teampulse_model::task::{NewTask, Priority, Task, TaskId};

use super::{EngineError, PingOutcome, Snapshot, TeamStore};
use crate::clock::{Clock, SystemClock};

/// Shared handle to the team state, stamping operations from a [`Clock`].
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<TeamStore>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SharedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let store = self.inner.lock();
        f.debug_struct("SharedStore")
            .field("members", &store.members().len())
            .field("tasks", &store.tasks().len())
            .finish_non_exhaustive()
    }
}

impl SharedStore {
    /// Wraps a store using wall-clock time.
    #[must_use]
    pub fn new(store: TeamStore) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Wraps a store using the given clock.
    #[must_use]
    pub fn with_clock(store: TeamStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
            clock,
        }
    }

    /// The clock used to stamp operations.
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Runs a read-only closure against the locked store.
    pub fn read<R>(&self, f: impl FnOnce(&TeamStore) -> R) -> R {
        f(&self.inner.lock())
    }

    /// Returns an owned copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock().snapshot()
    }

    /// Returns a copy of one member.
    #[must_use]
    pub fn member(&self, member_id: &MemberId) -> Option<Member> {
        self.inner.lock().member(member_id).cloned()
    }

    /// Returns a copy of one task.
    #[must_use]
    pub fn task(&self, task_id: TaskId) -> Option<Task> {
        self.inner.lock().task(task_id).cloned()
    }

    /// See [`TeamStore::set_status`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MemberNotFound`] if the member does not exist.
    pub fn set_status(&self, member_id: &MemberId, status: MemberStatus) -> Result<(), EngineError> {
        let mut store = self.inner.lock();
        let now = self.clock.now();
        store.set_status(member_id, status, now)
    }

    /// See [`TeamStore::ping_activity`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MemberNotFound`] if the member does not exist.
    pub fn ping_activity(&self, member_id: &MemberId) -> Result<PingOutcome, EngineError> {
        let mut store = self.inner.lock();
        let now = self.clock.now();
        store.ping_activity(member_id, now)
    }

    /// See [`TeamStore::sweep_inactive`]. Evaluated at the clock's current time.
    pub fn sweep_inactive(&self, threshold: Duration) -> usize {
        let mut store = self.inner.lock();
        let now = self.clock.now();
        store.sweep_inactive(now, threshold)
    }

    /// See [`TeamStore::add_task`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TaskIdsExhausted`] if no further ID can be
    /// allocated.
    pub fn add_task(&self, new: NewTask) -> Result<TaskId, EngineError> {
        self.inner.lock().add_task(new)
    }

    /// See [`TeamStore::update_task_progress`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TaskNotFound`] if the task does not exist.
    pub fn update_task_progress(&self, task_id: TaskId, progress: i64) -> Result<(), EngineError> {
        let mut store = self.inner.lock();
        let now = self.clock.now();
        store.update_task_progress(task_id, progress, now)
    }

    /// See [`TeamStore::update_task_priority`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TaskNotFound`] if the task does not exist.
    pub fn update_task_priority(
        &self,
        task_id: TaskId,
        priority: Priority,
    ) -> Result<(), EngineError> {
        self.inner.lock().update_task_priority(task_id, priority)
    }

    /// See [`TeamStore::delete_task`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TaskNotFound`] if the task does not exist.
    pub fn delete_task(&self, task_id: TaskId) -> Result<Task, EngineError> {
        self.inner.lock().delete_task(task_id)
    }
}
