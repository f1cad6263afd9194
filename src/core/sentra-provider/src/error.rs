//! Provider error types.

use thiserror::Error;

/// Errors reported by the external identity provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Fetching the current session failed.
    #[error("session fetch failed: {0}")]
    SessionFetch(String),

    /// Establishing or servicing the event subscription failed.
    #[error("subscription failed: {0}")]
    Subscription(String),

    /// Pushing a claim update back to the provider failed.
    #[error("claim update failed: {0}")]
    ClaimUpdate(String),
}
