//! The reconciled identity published to consumers.

use serde::{Deserialize, Serialize};

use crate::{Profile, RawSession, Role};

/// The engine's reconciled view of the signed-in user.
///
/// Combines the session base claims with a resolved [`Role`] and an
/// optional [`Profile`]. An identity is never published with the role
/// unresolved; the profile may be `None` because the fetch failed or the
/// record does not exist.
///
/// Derives `PartialEq` so that "changed" checks are structural - the cache
/// relies on this to keep writes idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable subject identifier.
    pub user_id: String,
    /// Email address, when the provider reports one.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name, from the session claims or the profile.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Resolved role.
    pub role: Role,
    /// Demographics record, when one exists and could be fetched.
    #[serde(default)]
    pub profile: Option<Profile>,
}

impl Identity {
    /// Builds an identity from session base claims, a resolved role, and an
    /// optional profile.
    ///
    /// The display name prefers the session `name` claim and falls back to
    /// the profile's full name.
    pub fn from_session(session: &RawSession, role: Role, profile: Option<Profile>) -> Self {
        let display_name = session
            .display_name()
            .map(str::to_string)
            .or_else(|| profile.as_ref().and_then(Profile::full_name));

        Self {
            user_id: session.user_id.clone(),
            email: session.email.clone(),
            display_name,
            role,
            profile,
        }
    }
}
