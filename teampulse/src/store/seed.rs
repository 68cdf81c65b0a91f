//! Built-in demo roster and task board.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use teampulse_model::member::{Member, MemberId, MemberStatus};
use teampulse_model::task::{NewTask, Priority, Task, TaskId};

/// The five-person demo roster. Everyone was last active at `now` except
/// the product manager, who went offline fifteen minutes earlier.
#[must_use]
pub fn roster(now: DateTime<Utc>) -> Vec<Member> {
    let entry = |id: &str,
                 name: &str,
                 email: &str,
                 status: MemberStatus,
                 last: DateTime<Utc>,
                 department: &str,
                 position: &str,
                 joined: (i32, u32, u32)| Member {
        id: MemberId::new(id),
        name: name.to_string(),
        email: email.to_string(),
        avatar: None,
        department: department.to_string(),
        position: position.to_string(),
        join_date: date(joined),
        status,
        last_activity: Some(last),
    };

    vec![
        entry(
            "1",
            "John Doe",
            "john@example.com",
            MemberStatus::Working,
            now,
            "Engineering",
            "Frontend Developer",
            (2023, 1, 15),
        ),
        entry(
            "2",
            "Jane Smith",
            "jane@example.com",
            MemberStatus::Break,
            now,
            "Engineering",
            "Backend Developer",
            (2022, 8, 22),
        ),
        entry(
            "3",
            "Mike Johnson",
            "mike@example.com",
            MemberStatus::Meeting,
            now,
            "Design",
            "UI/UX Designer",
            (2023, 3, 10),
        ),
        entry(
            "4",
            "Sarah Wilson",
            "sarah@example.com",
            MemberStatus::Offline,
            now - TimeDelta::minutes(15),
            "Product",
            "Product Manager",
            (2021, 11, 5),
        ),
        entry(
            "5",
            "Sarthak Gupta",
            "sarthak@example.com",
            MemberStatus::Meeting,
            now,
            "Engineering",
            "Full Stack Developer",
            (2023, 6, 18),
        ),
    ]
}

/// One task per demo member, each assigned to the member with the same ID.
#[must_use]
pub fn tasks() -> Vec<Task> {
    [
        (1, "Implement dashboard UI", (2024, 12, 31), 70, Priority::High),
        (2, "Write documentation", (2024, 12, 25), 30, Priority::Medium),
        (3, "Design user flows", (2024, 12, 20), 50, Priority::High),
        (4, "Product roadmap planning", (2024, 12, 28), 80, Priority::Medium),
        (5, "API integration", (2024, 12, 22), 40, Priority::High),
    ]
    .into_iter()
    .map(|(id, title, due, progress, priority)| {
        let mut task = Task::from_new(
            TaskId::new(id),
            NewTask {
                title: title.to_string(),
                due_date: date(due),
                assigned_to: MemberId::new(id.to_string()),
                priority,
            },
        );
        task.set_progress(progress);
        task
    })
    .collect()
}

fn date((y, m, d): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}
