//! Provider-issued session types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Role;

/// Claim map attached to a session.
pub type Claims = serde_json::Map<String, Value>;

/// Partial claim update pushed back to the provider.
pub type ClaimPatch = serde_json::Map<String, Value>;

/// A provider-issued authentication session.
///
/// The provider owns this bundle; the engine only reads it and republishes
/// the base claims through [`Identity`](crate::Identity). Token contents are
/// opaque here - no validation or refresh happens in the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSession {
    /// Stable subject identifier.
    pub user_id: String,
    /// Email address, when the provider reports one.
    #[serde(default)]
    pub email: Option<String>,
    /// Opaque access token.
    pub access_token: String,
    /// Expiry (Unix seconds), when the provider reports one.
    #[serde(default)]
    pub expires_at: Option<u64>,
    /// Arbitrary claim map, possibly carrying a role claim.
    #[serde(default)]
    pub claims: Claims,
}

impl RawSession {
    /// Creates a session with the given subject and token.
    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            access_token: access_token.into(),
            expires_at: None,
            claims: Claims::new(),
        }
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the expiry timestamp (Unix seconds).
    #[must_use]
    pub fn with_expiry(mut self, expires_at: u64) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Adds a claim.
    #[must_use]
    pub fn with_claim(mut self, key: impl Into<String>, value: Value) -> Self {
        self.claims.insert(key.into(), value);
        self
    }

    /// Reads the role out of the claim map, if the claim is present.
    ///
    /// Non-string claim values are treated as absent.
    pub fn role_claim(&self, claim_key: &str) -> Option<Role> {
        self.claims
            .get(claim_key)
            .and_then(Value::as_str)
            .map(Role::parse_lossy)
    }

    /// Display name claim, when present.
    pub fn display_name(&self) -> Option<&str> {
        self.claims.get("name").and_then(Value::as_str)
    }
}
