//! Integration tests for the member status lifecycle.
//!
//! Verifies:
//! 1. Explicit status changes stamp activity and can revive offline members.
//! 2. Pings refresh active members and are inert while offline.
//! 3. The sweep moves idle members offline exactly once.
//! 4. Listener and sweeper background tasks drive the same transitions.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use teampulse::activity::{ActivityListener, ActivitySignal};
use teampulse::clock::{Clock, ManualClock};
use teampulse::store::{PingOutcome, SharedStore, TeamStore};
use teampulse::sweeper::{SweepConfig, Sweeper};
use teampulse_model::member::{Member, MemberId, MemberStatus};

const THRESHOLD: Duration = Duration::from_secs(10 * 60);

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn t0() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

fn member(id: &str, status: MemberStatus, last: Option<DateTime<Utc>>) -> Member {
    Member {
        id: MemberId::new(id),
        name: format!("Member {id}"),
        email: format!("member{id}@example.com"),
        avatar: None,
        department: "Engineering".into(),
        position: "Developer".into(),
        join_date: NaiveDate::from_ymd_opt(2022, 5, 1).unwrap(),
        status,
        last_activity: last,
    }
}

fn shared_seeded() -> (SharedStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(t0()));
    let store = SharedStore::with_clock(TeamStore::seeded(t0()), clock.clone());
    (store, clock)
}

// ---------------------------------------------------------------------------
// Store-level scenarios
// ---------------------------------------------------------------------------

#[test]
fn set_status_stamps_for_every_status() {
    let mut store = TeamStore::seeded(t0());
    let id = MemberId::new("1");
    for (i, status) in MemberStatus::ALL.into_iter().enumerate() {
        let now = t0() + TimeDelta::minutes(i64::try_from(i).unwrap() + 1);
        store.set_status(&id, status, now).unwrap();
        let m = store.member(&id).unwrap();
        assert_eq!(m.status, status);
        assert_eq!(m.last_activity, Some(now));
    }
}

#[test]
fn idle_working_member_is_swept_at_threshold() {
    let now = t0();
    let mut store = TeamStore::new(vec![
        member("a", MemberStatus::Working, Some(now - TimeDelta::minutes(11))),
        member("b", MemberStatus::Working, Some(now - TimeDelta::minutes(2))),
    ]);

    let count = store.sweep_inactive(now, THRESHOLD);

    assert_eq!(count, 1);
    let a = store.member(&MemberId::new("a")).unwrap();
    assert_eq!(a.status, MemberStatus::Offline);
    assert_eq!(a.last_activity, Some(now));
    let b = store.member(&MemberId::new("b")).unwrap();
    assert_eq!(b.status, MemberStatus::Working);
}

#[test]
fn offline_then_ping_keeps_set_status_time() {
    let mut store = TeamStore::seeded(t0());
    let id = MemberId::new("2");
    let set_at = t0() + TimeDelta::seconds(10);
    let ping_at = t0() + TimeDelta::seconds(11);

    store.set_status(&id, MemberStatus::Offline, set_at).unwrap();
    let outcome = store.ping_activity(&id, ping_at).unwrap();

    assert_eq!(outcome, PingOutcome::IgnoredOffline);
    let m = store.member(&id).unwrap();
    assert_eq!(m.status, MemberStatus::Offline);
    assert_eq!(m.last_activity, Some(set_at));
}

#[test]
fn members_without_activity_are_never_swept() {
    let mut store = TeamStore::new(vec![member("x", MemberStatus::Meeting, None)]);
    assert_eq!(
        store.sweep_inactive(t0() + TimeDelta::days(30), THRESHOLD),
        0
    );
    assert_eq!(store.members()[0].status, MemberStatus::Meeting);
    assert_eq!(store.members()[0].last_activity, None);
}

#[test]
fn revived_member_can_be_swept_again() {
    let mut store = TeamStore::seeded(t0());
    let id = MemberId::new("4");
    store.set_status(&id, MemberStatus::Working, t0()).unwrap();
    assert_eq!(
        store.sweep_inactive(t0() + TimeDelta::minutes(5), THRESHOLD),
        0
    );
    let later = t0() + TimeDelta::minutes(20);
    assert!(store.sweep_inactive(later, THRESHOLD) >= 1);
    assert_eq!(store.member(&id).unwrap().status, MemberStatus::Offline);
}

#[test]
fn pings_keep_member_online_across_sweeps() {
    let mut store = TeamStore::seeded(t0());
    let id = MemberId::new("1");
    for minute in (5..=60).step_by(5) {
        let now = t0() + TimeDelta::minutes(minute);
        store.ping_activity(&id, now).unwrap();
        store.sweep_inactive(now, THRESHOLD);
    }
    assert_eq!(store.member(&id).unwrap().status, MemberStatus::Working);
    // Everyone else who was not pinged has gone offline.
    assert!(
        store
            .members()
            .iter()
            .filter(|m| m.id != id)
            .all(|m| m.status.is_offline())
    );
}

// ---------------------------------------------------------------------------
// Background tasks
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn listener_and_sweeper_cooperate() {
    let (store, clock) = shared_seeded();
    let sweeper = Sweeper::spawn(
        store.clone(),
        SweepConfig {
            threshold: THRESHOLD,
            cadence: Duration::from_secs(60),
        },
    );
    let listener = ActivityListener::register(store.clone(), MemberId::new("1"), 16);
    let sender = listener.sender();

    // Twelve simulated minutes: member 1 keeps interacting, the rest idle.
    for _ in 0..12 {
        clock.advance(TimeDelta::minutes(1));
        sender.signal(ActivitySignal::Pointer);
        tokio::time::sleep(Duration::from_secs(60)).await;
    }

    let snapshot = store.snapshot();
    let one = snapshot
        .members
        .iter()
        .find(|m| m.id == MemberId::new("1"))
        .unwrap();
    assert_eq!(one.status, MemberStatus::Working);
    assert_eq!(
        snapshot
            .members
            .iter()
            .filter(|m| m.status.is_offline())
            .count(),
        4
    );
    assert_eq!(sweeper.swept(), 3);

    listener.shutdown().await;
    sweeper.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn swept_member_ignores_listener_until_status_set() {
    let (store, clock) = shared_seeded();
    let id = MemberId::new("3");
    let listener = ActivityListener::register(store.clone(), id.clone(), 16);

    clock.advance(TimeDelta::minutes(11));
    assert_eq!(store.sweep_inactive(THRESHOLD), 4);
    let swept_at = store.member(&id).unwrap().last_activity;

    clock.advance(TimeDelta::minutes(1));
    listener.sender().signal(ActivitySignal::Keyboard);
    tokio::task::yield_now().await;
    let m = store.member(&id).unwrap();
    assert_eq!(m.status, MemberStatus::Offline);
    assert_eq!(m.last_activity, swept_at);

    store.set_status(&id, MemberStatus::Meeting).unwrap();
    clock.advance(TimeDelta::minutes(1));
    listener.sender().signal(ActivitySignal::Keyboard);
    listener.shutdown().await;

    let m = store.member(&id).unwrap();
    assert_eq!(m.status, MemberStatus::Meeting);
    assert_eq!(m.last_activity, Some(clock.now()));
}
