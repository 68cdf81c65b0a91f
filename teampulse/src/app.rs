//! Host application state and command execution.

use std::fmt::Write as _;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use teampulse_model::member::{Member, MemberId, MemberStatus};
use teampulse_model::role::UserRole;
use teampulse_model::task::Task;

use crate::command::{Command, CommandError, HELP};
use crate::session::Session;
use crate::stats;
use crate::store::{PingOutcome, SharedStore};

/// Main application state for the line-oriented host.
pub struct App {
    store: SharedStore,
    session: Session,
    threshold: Duration,
    /// Whether the host should exit.
    pub should_quit: bool,
}

impl App {
    /// Creates an application over `store`. `threshold` is the inactivity
    /// limit used by manual sweeps and the pending-offline report.
    #[must_use]
    pub const fn new(store: SharedStore, session: Session, threshold: Duration) -> Self {
        Self {
            store,
            session,
            threshold,
            should_quit: false,
        }
    }

    /// The shared store.
    #[must_use]
    pub const fn store(&self) -> &SharedStore {
        &self.store
    }

    /// The current session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Roster ID of the logged-in user, if they are on the roster.
    #[must_use]
    pub fn current_member(&self) -> Option<MemberId> {
        self.store.read(|s| self.session.resolve_member(s))
    }

    /// Parses and executes one input line, returning the text to print.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if the line cannot be parsed or the
    /// operation is rejected. No state changes on error.
    pub fn handle_line(&mut self, line: &str) -> Result<String, CommandError> {
        let command = Command::parse(line)?;
        self.execute(command)
    }

    /// Executes a parsed command.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if the operation is rejected.
    pub fn execute(&mut self, command: Command) -> Result<String, CommandError> {
        match command {
            Command::Members { filter, by_tasks } => Ok(self.render_members(filter, by_tasks)),
            Command::Tasks(member) => Ok(self.render_tasks(member.as_ref())),
            Command::Status { member, status } => {
                self.store.set_status(&member, status)?;
                Ok(format!("{member} is now {status}"))
            }
            Command::Ping(member) => {
                let member = match member {
                    Some(id) => id,
                    None => self.require_current_member()?,
                };
                Ok(match self.store.ping_activity(&member)? {
                    PingOutcome::Recorded => format!("activity recorded for {member}"),
                    PingOutcome::IgnoredOffline => {
                        format!("{member} is offline; set a status to come back online")
                    }
                })
            }
            Command::Add(new) => {
                let id = self.store.add_task(new)?;
                Ok(format!("created task {id}"))
            }
            Command::Progress { task, progress } => {
                self.store.update_task_progress(task, progress)?;
                let summary = self
                    .store
                    .task(task)
                    .map(|t| format!("task {task} at {}%{}", t.progress(), done_marker(&t)))
                    .unwrap_or_default();
                Ok(summary)
            }
            Command::Priority { task, priority } => {
                self.store.update_task_priority(task, priority)?;
                Ok(format!("task {task} priority set to {priority}"))
            }
            Command::Delete(task) => {
                let removed = self.store.delete_task(task)?;
                Ok(format!("deleted task {task} ({})", removed.title))
            }
            Command::Sweep => {
                let n = self.store.sweep_inactive(self.threshold);
                Ok(format!("{n} member(s) marked offline"))
            }
            Command::Pending => Ok(self.render_pending()),
            Command::Stats => self.render_stats(),
            Command::Role(role) => {
                self.session.switch_role(role);
                Ok(format!("role: {role}"))
            }
            Command::User(name) => {
                self.session.set_user(name);
                Ok(match self.current_member() {
                    Some(id) => format!("user: {} ({id})", self.session.current_user),
                    None => format!("user: {} (not on roster)", self.session.current_user),
                })
            }
            Command::Snapshot => Ok(serde_json::to_string_pretty(&self.store.snapshot())?),
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => {
                self.should_quit = true;
                Ok(String::new())
            }
        }
    }

    fn require_current_member(&self) -> Result<MemberId, CommandError> {
        self.current_member()
            .ok_or_else(|| CommandError::NoCurrentMember(self.session.current_user.clone()))
    }

    /// Leads see the filtered/sorted roster; members see only themselves.
    fn render_members(&self, filter: Option<MemberStatus>, by_tasks: bool) -> String {
        let snapshot = self.store.snapshot();
        let current = self.current_member();
        let rows: Vec<&Member> = match self.session.role {
            UserRole::Lead => stats::lead_view(&snapshot.members, &snapshot.tasks, filter, by_tasks),
            UserRole::Member => snapshot
                .members
                .iter()
                .filter(|m| Some(&m.id) == current.as_ref())
                .collect(),
        };

        let mut out = String::new();
        for m in rows {
            let open = stats::open_task_count(&snapshot.tasks, &m.id);
            let _ = writeln!(
                out,
                "{:>3}  {:<16} {:<8} {:<22} last active {}  open tasks {open}",
                m.id,
                m.name,
                m.status.to_string(),
                m.position,
                format_activity(m.last_activity),
            );
        }
        out.trim_end().to_string()
    }

    fn render_tasks(&self, member: Option<&MemberId>) -> String {
        let snapshot = self.store.snapshot();
        let scope = match (member, self.session.role) {
            (Some(id), _) => Some(id.clone()),
            (None, UserRole::Lead) => None,
            (None, UserRole::Member) => self.current_member(),
        };
        let tasks: Vec<&Task> = match &scope {
            Some(id) => stats::member_tasks(&snapshot.tasks, id),
            None => snapshot.tasks.iter().collect(),
        };

        let mut out = String::new();
        if let Some(id) = &scope {
            let (done, total) = stats::task_completion(&snapshot.tasks, id);
            let _ = writeln!(out, "{done}/{total} completed");
        }
        for t in tasks {
            let _ = writeln!(
                out,
                "{:>4}  [{:>3}%{}] {:<6} due {}  @{}  {}",
                t.id,
                t.progress(),
                done_marker(t),
                t.priority.to_string(),
                t.due_date,
                t.assigned_to,
                t.title,
            );
        }
        out.trim_end().to_string()
    }

    fn render_pending(&self) -> String {
        let snapshot = self.store.snapshot();
        let now = self.store.clock().now();
        let pending = stats::pending_offline(&snapshot.members, now, self.threshold);
        if pending.is_empty() {
            return "no members pending offline".to_string();
        }
        let names: Vec<&str> = pending.iter().map(|m| m.name.as_str()).collect();
        format!(
            "{} team member(s) will be marked offline due to inactivity: {}",
            pending.len(),
            names.join(", ")
        )
    }

    fn render_stats(&self) -> Result<String, CommandError> {
        let snapshot = self.store.snapshot();
        let now = self.store.clock().now();
        let distribution: serde_json::Map<String, serde_json::Value> =
            stats::status_distribution(&snapshot.members)
                .into_iter()
                .map(|(status, n)| (status.to_string(), n.into()))
                .collect();
        let report = serde_json::json!({
            "stats": stats::dashboard_stats(&snapshot.members, &snapshot.tasks),
            "statusDistribution": distribution,
            "pendingOffline": stats::pending_offline(&snapshot.members, now, self.threshold).len(),
        });
        Ok(serde_json::to_string_pretty(&report)?)
    }
}

const fn done_marker(task: &Task) -> &'static str {
    if task.is_completed() { " done" } else { "" }
}

/// Format an activity timestamp as local "HH:MM:SS".
fn format_activity(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(
        || "never".to_string(),
        |t| t.with_timezone(&Local).format("%H:%M:%S").to_string(),
    )
}
