//! Derived dashboard figures.
//!
//! Everything here is a pure function of a roster/task snapshot and is
//! recomputed on every call. Nothing is cached.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use teampulse_model::member::{Member, MemberId, MemberStatus};
use teampulse_model::task::Task;

/// Headline numbers for the dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Roster size.
    pub total_members: usize,
    /// Tasks not yet completed.
    pub active_tasks: usize,
    /// Tasks at 100% progress.
    pub completed_tasks: usize,
    /// Average task progress, rounded half-up; 0 with no tasks.
    pub productivity_score: u64,
    /// Non-offline members, scaled by ten.
    pub attendance: usize,
    /// One tenth of the roster, rounded down.
    pub late_coming: usize,
    /// Offline members.
    pub absent: usize,
    /// One fifth of the roster, rounded down.
    pub leave_apply: usize,
}

/// Computes the dashboard headline numbers.
#[must_use]
pub fn dashboard_stats(members: &[Member], tasks: &[Task]) -> DashboardStats {
    let total_members = members.len();
    let completed_tasks = tasks.iter().filter(|t| t.is_completed()).count();
    let absent = members.iter().filter(|m| m.status.is_offline()).count();

    DashboardStats {
        total_members,
        active_tasks: tasks.len() - completed_tasks,
        completed_tasks,
        productivity_score: productivity_score(tasks),
        attendance: (total_members - absent) * 10,
        late_coming: total_members / 10,
        absent,
        leave_apply: total_members / 5,
    }
}

/// Average progress across all tasks, rounded half-up.
#[must_use]
pub fn productivity_score(tasks: &[Task]) -> u64 {
    let n = tasks.len() as u64;
    if n == 0 {
        return 0;
    }
    let sum: u64 = tasks.iter().map(|t| u64::from(t.progress())).sum();
    (2 * sum + n) / (2 * n)
}

/// Member counts per status, in order of first appearance. Statuses with
/// no members are omitted.
#[must_use]
pub fn status_distribution(members: &[Member]) -> Vec<(MemberStatus, usize)> {
    let mut counts: Vec<(MemberStatus, usize)> = Vec::new();
    for member in members {
        match counts.iter_mut().find(|(s, _)| *s == member.status) {
            Some((_, n)) => *n += 1,
            None => counts.push((member.status, 1)),
        }
    }
    counts
}

/// Number of incomplete tasks assigned to a member.
#[must_use]
pub fn open_task_count(tasks: &[Task], member_id: &MemberId) -> usize {
    tasks
        .iter()
        .filter(|t| &t.assigned_to == member_id && !t.is_completed())
        .count()
}

/// Roster as shown to a team lead: optionally filtered by status and
/// optionally ordered by open task count, most loaded first. The sort is
/// stable, so ties keep roster order.
#[must_use]
pub fn lead_view<'a>(
    members: &'a [Member],
    tasks: &[Task],
    filter: Option<MemberStatus>,
    sort_by_tasks: bool,
) -> Vec<&'a Member> {
    let mut view: Vec<&Member> = members
        .iter()
        .filter(|m| filter.is_none_or(|status| m.status == status))
        .collect();
    if sort_by_tasks {
        view.sort_by_key(|m| std::cmp::Reverse(open_task_count(tasks, &m.id)));
    }
    view
}

/// Tasks assigned to one member, in creation order.
#[must_use]
pub fn member_tasks<'a>(tasks: &'a [Task], member_id: &MemberId) -> Vec<&'a Task> {
    tasks.iter().filter(|t| &t.assigned_to == member_id).collect()
}

/// `(completed, total)` task counts for one member.
#[must_use]
pub fn task_completion(tasks: &[Task], member_id: &MemberId) -> (usize, usize) {
    let mine = member_tasks(tasks, member_id);
    let done = mine.iter().filter(|t| t.is_completed()).count();
    (done, mine.len())
}

/// Members the next sweep at `now` would mark offline.
#[must_use]
pub fn pending_offline<'a>(
    members: &'a [Member],
    now: DateTime<Utc>,
    threshold: Duration,
) -> Vec<&'a Member> {
    let Some(cutoff) = TimeDelta::from_std(threshold)
        .ok()
        .and_then(|delta| now.checked_sub_signed(delta))
    else {
        return Vec::new();
    };
    members
        .iter()
        .filter(|m| !m.status.is_offline() && m.idle_before(cutoff))
        .collect()
}
