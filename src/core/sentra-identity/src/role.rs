//! Access roles.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Access role of an authenticated identity.
///
/// Every published identity carries a resolved role; sessions that report
/// no role (or an unrecognized one) fall back to [`Role::Student`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular end user.
    Student,
    /// Staff with management access.
    Management,
}

impl Role {
    /// Parses a role string, defaulting to [`Role::Student`] when the value
    /// is not a known role.
    pub fn parse_lossy(value: &str) -> Self {
        match value {
            "student" => Role::Student,
            "management" => Role::Management,
            other => {
                debug!(role = %other, "unknown role value, defaulting to student");
                Role::Student
            },
        }
    }

    /// Canonical string form, as stored in the role claim.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Management => "management",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
