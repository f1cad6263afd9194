//! Demographics enrichment record.

use serde::{Deserialize, Serialize};

use crate::Role;

/// Optional demographics record attached to an identity.
///
/// Absence of a profile is a valid terminal state: a fresh account has no
/// record yet, and identity resolution never waits for one to appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Identity id this record belongs to.
    pub user_id: String,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Year group / cohort label.
    #[serde(default)]
    pub year_group: Option<String>,
    /// Role recorded on the profile, used as a fallback when the session
    /// claims carry none.
    #[serde(default)]
    pub role: Option<Role>,
}

impl Profile {
    /// Creates an empty profile for the given identity id.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            first_name: None,
            last_name: None,
            year_group: None,
            role: None,
        }
    }

    /// Sets the recorded role.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Sets first and last name.
    #[must_use]
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    /// Full name assembled from first and last name, when either is present.
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        }
    }
}
