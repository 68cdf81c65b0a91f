//! Team member types: identity, work status, and activity tracking.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ParseError;

/// Stable identifier of a roster member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    /// Creates a member identifier from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

/// Work status of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberStatus {
    /// Actively working.
    Working,
    /// On a break.
    Break,
    /// In a meeting.
    Meeting,
    /// Not available. Entered explicitly or by the inactivity sweep.
    Offline,
}

impl MemberStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 4] = [Self::Working, Self::Break, Self::Meeting, Self::Offline];

    /// Returns `true` for [`MemberStatus::Offline`].
    #[must_use]
    pub const fn is_offline(self) -> bool {
        matches!(self, Self::Offline)
    }
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Working => write!(f, "Working"),
            Self::Break => write!(f, "Break"),
            Self::Meeting => write!(f, "Meeting"),
            Self::Offline => write!(f, "Offline"),
        }
    }
}

impl std::str::FromStr for MemberStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "working" => Ok(Self::Working),
            "break" => Ok(Self::Break),
            "meeting" => Ok(Self::Meeting),
            "offline" => Ok(Self::Offline),
            _ => Err(ParseError::InvalidStatus(s.to_string())),
        }
    }
}

/// A tracked team member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Stable identifier, assigned at creation.
    pub id: MemberId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Optional avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Department the member belongs to.
    pub department: String,
    /// Job title.
    pub position: String,
    /// Date the member joined the team.
    pub join_date: NaiveDate,
    /// Current work status.
    pub status: MemberStatus,
    /// Last time the member was seen active. `None` means never recorded.
    pub last_activity: Option<DateTime<Utc>>,
}

impl Member {
    /// Records activity at `now`.
    ///
    /// The stored timestamp never moves backwards: a `now` earlier than the
    /// recorded activity leaves the recorded value in place.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = Some(self.last_activity.map_or(now, |prev| prev.max(now)));
    }

    /// Returns `true` if the last recorded activity is strictly before `cutoff`.
    ///
    /// A member with no recorded activity is never considered idle.
    #[must_use]
    pub fn idle_before(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_activity.is_some_and(|last| last < cutoff)
    }
}
