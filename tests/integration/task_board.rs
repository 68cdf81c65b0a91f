//! Integration tests for the task board.
//!
//! Verifies:
//! 1. Progress is clamped and completion follows progress exactly.
//! 2. Progress updates refresh the assignee unless they are offline.
//! 3. Task IDs stay unique across adds and deletes.
//! 4. Unknown task IDs are rejected without touching state.
//! 5. The command host drives the same operations end to end.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use teampulse::app::App;
use teampulse::clock::ManualClock;
use teampulse::command::CommandError;
use teampulse::session::Session;
use teampulse::store::{EngineError, SharedStore, StoreOptions, TeamStore};
use teampulse_model::member::{MemberId, MemberStatus};
use teampulse_model::role::UserRole;
use teampulse_model::task::{NewTask, Priority, TaskId};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn t0() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

fn new_task(assignee: &str, title: &str) -> NewTask {
    NewTask {
        title: title.into(),
        due_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        assigned_to: MemberId::new(assignee),
        priority: Priority::Medium,
    }
}

fn lead_app() -> (App, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(t0()));
    let store = SharedStore::with_clock(TeamStore::seeded(t0()), clock.clone());
    let app = App::new(
        store,
        Session::new(UserRole::Lead, "John Doe"),
        Duration::from_secs(600),
    );
    (app, clock)
}

// ---------------------------------------------------------------------------
// Progress and completion
// ---------------------------------------------------------------------------

#[test]
fn progress_is_clamped_at_both_ends() {
    let mut store = TeamStore::seeded(t0());
    let id = TaskId::new(2);

    store.update_task_progress(id, -30, t0()).unwrap();
    let task = store.task(id).unwrap();
    assert_eq!(task.progress(), 0);
    assert!(!task.is_completed());

    store.update_task_progress(id, 140, t0()).unwrap();
    let task = store.task(id).unwrap();
    assert_eq!(task.progress(), 100);
    assert!(task.is_completed());
}

#[test]
fn completing_meeting_members_task_refreshes_activity_only() {
    let mut store = TeamStore::seeded(t0());
    let later = t0() + TimeDelta::minutes(3);

    store.update_task_progress(TaskId::new(5), 100, later).unwrap();

    assert!(store.task(TaskId::new(5)).unwrap().is_completed());
    let assignee = store.member(&MemberId::new("5")).unwrap();
    assert_eq!(assignee.status, MemberStatus::Meeting);
    assert_eq!(assignee.last_activity, Some(later));
}

#[test]
fn progress_on_offline_assignee_leaves_member_untouched() {
    let mut store = TeamStore::seeded(t0());
    let before = store.member(&MemberId::new("4")).unwrap().clone();

    store
        .update_task_progress(TaskId::new(4), 90, t0() + TimeDelta::minutes(1))
        .unwrap();

    assert_eq!(store.task(TaskId::new(4)).unwrap().progress(), 90);
    assert_eq!(store.member(&MemberId::new("4")).unwrap(), &before);
}

#[test]
fn progress_can_be_decoupled_from_activity() {
    let mut store = TeamStore::seeded(t0()).with_options(StoreOptions {
        progress_counts_as_activity: false,
    });
    store
        .update_task_progress(TaskId::new(1), 95, t0() + TimeDelta::minutes(5))
        .unwrap();
    assert_eq!(
        store.member(&MemberId::new("1")).unwrap().last_activity,
        Some(t0())
    );
}

#[test]
fn reopening_a_completed_task() {
    let mut store = TeamStore::seeded(t0());
    let id = TaskId::new(3);
    store.update_task_progress(id, 100, t0()).unwrap();
    store.update_task_progress(id, 60, t0()).unwrap();
    assert!(!store.task(id).unwrap().is_completed());
}

// ---------------------------------------------------------------------------
// Identity, creation, and deletion
// ---------------------------------------------------------------------------

#[test]
fn ids_are_never_reused_after_delete() {
    let mut store = TeamStore::seeded(t0());
    let first = store.add_task(new_task("1", "first")).unwrap();
    store.delete_task(first).unwrap();
    let second = store.add_task(new_task("1", "second")).unwrap();

    assert_ne!(first, second);
    let mut ids: Vec<_> = store.tasks().iter().map(|t| t.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), store.tasks().len());
}

#[test]
fn add_then_delete_restores_board() {
    let mut store = TeamStore::seeded(t0());
    let before = store.tasks().to_vec();

    let id = store.add_task(new_task("2", "temporary")).unwrap();
    assert_eq!(store.tasks().len(), before.len() + 1);
    let removed = store.delete_task(id).unwrap();

    assert_eq!(removed.title, "temporary");
    assert_eq!(store.tasks(), before.as_slice());
}

#[test]
fn task_for_unknown_member_is_accepted() {
    let mut store = TeamStore::seeded(t0());
    let id = store.add_task(new_task("ghost", "orphan")).unwrap();
    assert_eq!(store.task(id).unwrap().assigned_to, MemberId::new("ghost"));
    // Progress on an orphan task has no member to refresh.
    store.update_task_progress(id, 50, t0()).unwrap();
}

#[test]
fn unknown_task_ids_are_rejected_without_mutation() {
    let mut store = TeamStore::seeded(t0());
    let before = store.snapshot();
    let ghost = TaskId::new(999);

    assert_eq!(
        store.update_task_progress(ghost, 50, t0()),
        Err(EngineError::TaskNotFound(ghost))
    );
    assert_eq!(
        store.update_task_priority(ghost, Priority::Low),
        Err(EngineError::TaskNotFound(ghost))
    );
    assert!(matches!(
        store.delete_task(ghost),
        Err(EngineError::TaskNotFound(_))
    ));

    let after = store.snapshot();
    assert_eq!(after.tasks, before.tasks);
    assert_eq!(after.members, before.members);
}

// ---------------------------------------------------------------------------
// Through the command host
// ---------------------------------------------------------------------------

#[test]
fn command_host_task_workflow() {
    let (mut app, clock) = lead_app();

    let out = app
        .handle_line("add 3 high 2025-01-10 Review design system")
        .unwrap();
    assert_eq!(out, "created task 6");

    clock.advance(TimeDelta::minutes(2));
    let out = app.handle_line("progress 6 150").unwrap();
    assert_eq!(out, "task 6 at 100% done");
    assert_eq!(
        app.store()
            .member(&MemberId::new("3"))
            .unwrap()
            .last_activity,
        Some(t0() + TimeDelta::minutes(2))
    );

    let out = app.handle_line("priority 6 low").unwrap();
    assert_eq!(out, "task 6 priority set to low");

    let out = app.handle_line("tasks 3").unwrap();
    assert!(out.starts_with("1/2 completed"));
    assert!(out.contains("Review design system"));

    let out = app.handle_line("delete 6").unwrap();
    assert_eq!(out, "deleted task 6 (Review design system)");
    assert!(app.store().task(TaskId::new(6)).is_none());
}

#[test]
fn command_host_reports_missing_tasks() {
    let (mut app, _clock) = lead_app();
    let err = app.handle_line("progress 42 10").unwrap_err();
    assert!(matches!(
        err,
        CommandError::Engine(EngineError::TaskNotFound(id)) if id == TaskId::new(42)
    ));
    let err = app.handle_line("priority 1 urgent").unwrap_err();
    assert!(matches!(err, CommandError::Parse(_)));
    assert_eq!(
        app.store().task(TaskId::new(1)).unwrap().priority,
        Priority::High
    );
}
