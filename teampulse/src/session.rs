//! The current viewer: role and logged-in identity.

use teampulse_model::member::MemberId;
use teampulse_model::role::UserRole;

use crate::store::TeamStore;

/// Default display name of the logged-in user.
pub const DEFAULT_USER: &str = "John Doe";

/// Who is looking at the dashboard and in which role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Current viewer role.
    pub role: UserRole,
    /// Display name of the logged-in user.
    pub current_user: String,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            role: UserRole::Member,
            current_user: DEFAULT_USER.to_string(),
        }
    }
}

impl Session {
    /// Creates a session for the given role and user.
    #[must_use]
    pub fn new(role: UserRole, current_user: impl Into<String>) -> Self {
        Self {
            role,
            current_user: current_user.into(),
        }
    }

    /// Switches the viewer role.
    pub fn switch_role(&mut self, role: UserRole) {
        tracing::debug!(from = %self.role, to = %role, "role switched");
        self.role = role;
    }

    /// Switches the logged-in user.
    pub fn set_user(&mut self, name: impl Into<String>) {
        self.current_user = name.into();
    }

    /// Maps the logged-in display name to a roster member.
    #[must_use]
    pub fn resolve_member(&self, store: &TeamStore) -> Option<MemberId> {
        store
            .member_by_name(&self.current_user)
            .map(|m| m.id.clone())
    }
}
