//! Property-based tests for the task board and activity tracking.
//!
//! Uses proptest to verify:
//! 1. Any progress input lands in `0..=100` and `completed` tracks it.
//! 2. New tasks start at zero progress; adding then deleting restores the board.
//! 3. Task IDs stay unique under any sequence of adds and deletes.
//! 4. Pings never revive an offline member or move its timestamp.
//! 5. A sweep moves exactly the idle, non-offline members offline.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use proptest::prelude::*;
use teampulse::store::TeamStore;
use teampulse_model::member::{MemberId, MemberStatus};
use teampulse_model::task::{NewTask, Priority, TaskId};

fn t0() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

/// Strategy for generating arbitrary `Priority` values.
fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Low),
        Just(Priority::Medium),
        Just(Priority::High),
    ]
}

/// Strategy for generating arbitrary `MemberStatus` values.
fn arb_status() -> impl Strategy<Value = MemberStatus> {
    prop::sample::select(MemberStatus::ALL.to_vec())
}

/// Strategy for generating task creation input against the demo roster.
fn arb_new_task() -> impl Strategy<Value = NewTask> {
    (
        "[a-zA-Z ]{1,40}",
        0u32..365,
        1u8..=5,
        arb_priority(),
    )
        .prop_map(|(title, day, member, priority)| NewTask {
            title,
            due_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
                + TimeDelta::days(i64::from(day)),
            assigned_to: MemberId::new(member.to_string()),
            priority,
        })
}

proptest! {
    #[test]
    fn progress_is_clamped_and_drives_completion(task in 1u64..=5, progress in any::<i64>()) {
        let mut store = TeamStore::seeded(t0());
        let id = TaskId::new(task);
        store.update_task_progress(id, progress, t0()).unwrap();
        let task = store.task(id).unwrap();

        prop_assert!(task.progress() <= 100);
        prop_assert_eq!(i64::from(task.progress()), progress.clamp(0, 100));
        prop_assert_eq!(task.is_completed(), task.progress() == 100);
    }

    #[test]
    fn add_then_delete_restores_board(new in arb_new_task()) {
        let mut store = TeamStore::seeded(t0());
        let before = store.tasks().to_vec();

        let id = store.add_task(new.clone()).unwrap();
        let created = store.task(id).unwrap().clone();
        prop_assert_eq!(created.progress(), 0);
        prop_assert!(!created.is_completed());
        prop_assert_eq!(&created.title, &new.title);

        let removed = store.delete_task(id).unwrap();
        prop_assert_eq!(removed, created);
        prop_assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn task_ids_stay_unique(ops in prop::collection::vec((any::<bool>(), arb_new_task()), 1..40)) {
        let mut store = TeamStore::seeded(t0());
        let mut issued = Vec::new();
        for (delete_first, new) in ops {
            if delete_first && let Some(id) = store.tasks().first().map(|t| t.id) {
                store.delete_task(id).unwrap();
            }
            let id = store.add_task(new).unwrap();
            prop_assert!(!issued.contains(&id));
            issued.push(id);
        }
        let mut ids: Vec<_> = store.tasks().iter().map(|t| t.id).collect();
        let len = ids.len();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), len);
    }

    #[test]
    fn pings_never_revive_offline(member in 1u8..=5, offsets in prop::collection::vec(0i64..3600, 1..20)) {
        let mut store = TeamStore::seeded(t0());
        let id = MemberId::new(member.to_string());
        store.set_status(&id, MemberStatus::Offline, t0()).unwrap();

        for secs in offsets {
            store.ping_activity(&id, t0() + TimeDelta::seconds(secs)).unwrap();
        }

        let m = store.member(&id).unwrap();
        prop_assert_eq!(m.status, MemberStatus::Offline);
        prop_assert_eq!(m.last_activity, Some(t0()));
    }

    #[test]
    fn sweep_transitions_exactly_the_idle(
        statuses in prop::collection::vec(arb_status(), 5),
        idle_minutes in prop::collection::vec(0i64..30, 5),
    ) {
        let mut store = TeamStore::seeded(t0());
        let now = t0() + TimeDelta::minutes(30);
        for (i, (status, idle)) in statuses.iter().zip(&idle_minutes).enumerate() {
            let id = MemberId::new((i + 1).to_string());
            store.set_status(&id, *status, now - TimeDelta::minutes(*idle)).unwrap();
        }
        let before = store.members().to_vec();

        let swept = store.sweep_inactive(now, Duration::from_secs(600));

        let expected = before
            .iter()
            .filter(|m| !m.status.is_offline() && m.last_activity < Some(now - TimeDelta::minutes(10)))
            .count();
        prop_assert_eq!(swept, expected);
        for (old, new) in before.iter().zip(store.members()) {
            if old.status.is_offline() {
                prop_assert_eq!(old, new);
            } else if new.status.is_offline() {
                prop_assert_eq!(new.last_activity, Some(now));
            } else {
                prop_assert_eq!(old, new);
            }
        }
    }
}
