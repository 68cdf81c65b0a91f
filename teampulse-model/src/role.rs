//! Viewer roles.

use serde::{Deserialize, Serialize};

use crate::ParseError;

/// Role of the person viewing the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Team lead: sees the whole roster.
    Lead,
    /// Regular member: sees their own tasks.
    #[default]
    Member,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lead => write!(f, "lead"),
            Self::Member => write!(f, "member"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lead" => Ok(Self::Lead),
            "member" => Ok(Self::Member),
            _ => Err(ParseError::InvalidRole(s.to_string())),
        }
    }
}
