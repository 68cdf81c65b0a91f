//! Line-oriented host commands.
//!
//! Parses one input line into a [`Command`]. Execution lives in
//! [`crate::app::App`].

use chrono::NaiveDate;
use teampulse_model::ParseError;
use teampulse_model::member::{MemberId, MemberStatus};
use teampulse_model::role::UserRole;
use teampulse_model::task::{NewTask, Priority, TaskId};
use thiserror::Error;

use crate::store::EngineError;

/// Usage text printed by `help`.
pub const HELP: &str = "\
commands:
  members [status] [by-tasks]    list the roster (lead: filter/sort)
  tasks [member-id]              list tasks
  status <member-id> <status>    set status (working|break|meeting|offline)
  ping [member-id]               record activity (default: current user)
  add <member-id> <priority> <due YYYY-MM-DD> <title...>
  progress <task-id> <n>         set progress (clamped to 0..=100)
  priority <task-id> <p>         set priority (low|medium|high)
  delete <task-id>               delete a task
  sweep                          run the inactivity sweep now
  pending                        members the next sweep would mark offline
  stats                          dashboard statistics as JSON
  role <lead|member>             switch role
  user <name...>                 switch current user
  snapshot                       full state as JSON
  help                           this text
  quit                           exit";

/// Errors produced while parsing or executing a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The line contained no command.
    #[error("empty command")]
    Empty,
    /// The command word is not recognized.
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),
    /// A required argument was not supplied.
    #[error("{command}: missing {argument}")]
    MissingArgument {
        /// Command being parsed.
        command: &'static str,
        /// Name of the missing argument.
        argument: &'static str,
    },
    /// An argument could not be interpreted.
    #[error("{command}: invalid {argument} `{value}`")]
    InvalidArgument {
        /// Command being parsed.
        command: &'static str,
        /// Name of the argument.
        argument: &'static str,
        /// The offending input.
        value: String,
    },
    /// A status, priority or role failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The store rejected the operation.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// The current user is not on the roster.
    #[error("current user `{0}` is not on the roster")]
    NoCurrentMember(String),
    /// Output could not be serialized.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

/// A parsed host command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the roster.
    Members {
        /// Only members with this status.
        filter: Option<MemberStatus>,
        /// Order by open task count.
        by_tasks: bool,
    },
    /// List tasks, optionally for one member.
    Tasks(Option<MemberId>),
    /// Set a member's status.
    Status {
        /// Target member.
        member: MemberId,
        /// New status.
        status: MemberStatus,
    },
    /// Record activity for a member, or the current user.
    Ping(Option<MemberId>),
    /// Create a task.
    Add(NewTask),
    /// Set task progress.
    Progress {
        /// Target task.
        task: TaskId,
        /// Requested progress, clamped by the store.
        progress: i64,
    },
    /// Set task priority.
    Priority {
        /// Target task.
        task: TaskId,
        /// New priority.
        priority: Priority,
    },
    /// Delete a task.
    Delete(TaskId),
    /// Run the inactivity sweep immediately.
    Sweep,
    /// List members about to be swept.
    Pending,
    /// Print dashboard statistics.
    Stats,
    /// Switch viewer role.
    Role(UserRole),
    /// Switch logged-in user.
    User(String),
    /// Dump the full state.
    Snapshot,
    /// Print usage.
    Help,
    /// Exit the host.
    Quit,
}

impl Command {
    /// Parses one input line.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if the line is empty, the command is
    /// unknown, or an argument is missing or malformed.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Empty);
        };
        let rest: Vec<&str> = words.collect();

        match head.to_ascii_lowercase().as_str() {
            "members" | "ls" => {
                let mut filter = None;
                let mut by_tasks = false;
                for arg in rest {
                    if arg.eq_ignore_ascii_case("by-tasks") {
                        by_tasks = true;
                    } else {
                        filter = Some(arg.parse()?);
                    }
                }
                Ok(Self::Members { filter, by_tasks })
            }
            "tasks" => Ok(Self::Tasks(rest.first().map(|id| MemberId::new(*id)))),
            "status" => {
                let member = required(&rest, 0, "status", "member-id")?;
                let status = required(&rest, 1, "status", "status")?.parse()?;
                Ok(Self::Status {
                    member: MemberId::new(member),
                    status,
                })
            }
            "ping" => Ok(Self::Ping(rest.first().map(|id| MemberId::new(*id)))),
            "add" => {
                let member = required(&rest, 0, "add", "member-id")?;
                let priority = required(&rest, 1, "add", "priority")?.parse()?;
                let due_raw = required(&rest, 2, "add", "due date")?;
                let due_date = NaiveDate::parse_from_str(due_raw, "%Y-%m-%d").map_err(|_| {
                    CommandError::InvalidArgument {
                        command: "add",
                        argument: "due date",
                        value: due_raw.to_string(),
                    }
                })?;
                let title = rest.get(3..).unwrap_or_default().join(" ");
                if title.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "add",
                        argument: "title",
                    });
                }
                Ok(Self::Add(NewTask {
                    title,
                    due_date,
                    assigned_to: MemberId::new(member),
                    priority,
                }))
            }
            "progress" => {
                let task = task_id(&rest, "progress")?;
                let raw = required(&rest, 1, "progress", "progress")?;
                let progress = raw.parse().map_err(|_| CommandError::InvalidArgument {
                    command: "progress",
                    argument: "progress",
                    value: raw.to_string(),
                })?;
                Ok(Self::Progress { task, progress })
            }
            "priority" => {
                let task = task_id(&rest, "priority")?;
                let priority = required(&rest, 1, "priority", "priority")?.parse()?;
                Ok(Self::Priority { task, priority })
            }
            "delete" | "rm" => Ok(Self::Delete(task_id(&rest, "delete")?)),
            "sweep" => Ok(Self::Sweep),
            "pending" => Ok(Self::Pending),
            "stats" => Ok(Self::Stats),
            "role" => Ok(Self::Role(required(&rest, 0, "role", "role")?.parse()?)),
            "user" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "user",
                        argument: "name",
                    });
                }
                Ok(Self::User(rest.join(" ")))
            }
            "snapshot" => Ok(Self::Snapshot),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn required<'a>(
    args: &[&'a str],
    index: usize,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or(CommandError::MissingArgument { command, argument })
}

fn task_id(args: &[&str], command: &'static str) -> Result<TaskId, CommandError> {
    let raw = required(args, 0, command, "task-id")?;
    raw.parse().map_err(|_| CommandError::InvalidArgument {
        command,
        argument: "task-id",
        value: raw.to_string(),
    })
}
