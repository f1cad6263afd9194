//! # Sentra Provider
//!
//! External identity-provider contract.
//!
//! The provider is an opaque external service: login, signup, and token
//! refresh happen elsewhere. The engine only needs three operations from
//! it, all fallible:
//!
//! - fetch the current session
//! - subscribe to session change events
//! - push a partial claim update back
//!
//! No delivery-ordering guarantee is assumed beyond "events reflect
//! provider-side state at time of emission".

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod event;

use async_trait::async_trait;

use sentra_identity::{ClaimPatch, RawSession};

pub use error::ProviderError;
pub use event::{SessionEvent, SessionEventKind, SessionEvents};

/// External identity/session provider.
///
/// Implementations wrap whatever service actually authenticates users.
/// All three operations are part of the external contract surface and may
/// fail independently.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fetches the session the provider currently holds, or `None` when no
    /// user is signed in.
    async fn current_session(&self) -> Result<Option<RawSession>, ProviderError>;

    /// Subscribes to session change events.
    ///
    /// Dropping the returned stream ends the subscription.
    fn subscribe(&self) -> SessionEvents;

    /// Merges a partial claim update into the current session's claim map.
    async fn update_claims(&self, patch: ClaimPatch) -> Result<(), ProviderError>;
}
