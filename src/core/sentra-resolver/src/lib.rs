//! # Sentra Resolver
//!
//! Merges a provider session with profile data and resolves the role.
//!
//! ## Fallback order
//!
//! 1. Role claim on the session, when present.
//! 2. Role recorded on the profile - with a best-effort write-back of that
//!    role into the provider claim map, so the claim path succeeds on the
//!    next resolution.
//! 3. Default to `student`.
//!
//! The write-back is idempotent across tabs: the claim is re-read from the
//! provider immediately before writing, not tracked with a local flag.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use sentra_identity::{ClaimPatch, Identity, Profile, RawSession, Role};
use sentra_provider::IdentityProvider;

/// Where the resolved role came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleSource {
    /// Role claim on the session.
    Claim,
    /// Role recorded on the profile (write-back attempted).
    Profile,
    /// Neither source had one; defaulted to student.
    Defaulted,
}

/// Outcome of one resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The merged identity, role always resolved.
    pub identity: Identity,
    /// Where the role came from.
    pub role_source: RoleSource,
}

/// Resolves sessions into identities.
pub struct IdentityResolver {
    provider: Arc<dyn IdentityProvider>,
    role_claim: String,
}

impl IdentityResolver {
    /// Creates a resolver that reads and writes the given role claim key.
    pub fn new(provider: Arc<dyn IdentityProvider>, role_claim: impl Into<String>) -> Self {
        Self {
            provider,
            role_claim: role_claim.into(),
        }
    }

    /// Resolves `session` plus an optionally pre-fetched `profile` into an
    /// [`Identity`].
    ///
    /// Always completes with a role; never fails. Write-back failures are
    /// logged and swallowed.
    pub async fn resolve(&self, session: &RawSession, profile: Option<Profile>) -> Resolution {
        if let Some(role) = session.role_claim(&self.role_claim) {
            return Resolution {
                identity: Identity::from_session(session, role, profile),
                role_source: RoleSource::Claim,
            };
        }

        if let Some(role) = profile.as_ref().and_then(|p| p.role) {
            debug!(user_id = %session.user_id, role = %role, "role taken from profile");
            self.write_back(&session.user_id, role).await;
            return Resolution {
                identity: Identity::from_session(session, role, profile),
                role_source: RoleSource::Profile,
            };
        }

        debug!(user_id = %session.user_id, "no role claim or profile role, defaulting to student");
        Resolution {
            identity: Identity::from_session(session, Role::Student, profile),
            role_source: RoleSource::Defaulted,
        }
    }

    /// Best-effort write-back of the role into the provider claim map.
    ///
    /// Re-reads the current session first: the claim may have been written
    /// by a different tab since this resolution started, and a second write
    /// must not happen in that case. Skips silently when the session is
    /// gone. Failures are logged, never surfaced, never retried.
    async fn write_back(&self, user_id: &str, role: Role) {
        match self.provider.current_session().await {
            Ok(Some(current)) => {
                if current.role_claim(&self.role_claim).is_some() {
                    debug!(user_id = %user_id, "role claim already present, skipping write-back");
                    return;
                }
            },
            Ok(None) => {
                debug!(user_id = %user_id, "session gone before write-back, skipping");
                return;
            },
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "could not re-check role claim, skipping write-back");
                return;
            },
        }

        let mut patch = ClaimPatch::new();
        patch.insert(
            self.role_claim.clone(),
            Value::String(role.as_str().to_string()),
        );

        match self.provider.update_claims(patch).await {
            Ok(()) => debug!(user_id = %user_id, role = %role, "role claim written back"),
            Err(e) => warn!(user_id = %user_id, error = %e, "role claim write-back failed"),
        }
    }
}
