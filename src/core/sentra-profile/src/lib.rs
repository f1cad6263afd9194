//! # Sentra Profile
//!
//! Profile store contract and the enrichment step of identity resolution.
//!
//! The store distinguishes "record does not exist" from transport or
//! permission failure; the [`ProfileEnricher`] maps the former to a valid
//! empty result so that a missing record never blocks identity resolution.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod enricher;
pub mod error;

use async_trait::async_trait;

use sentra_identity::Profile;

pub use enricher::ProfileEnricher;
pub use error::{ProfileFetchError, ProfileStoreError};

/// External profile/demographics record store.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetches the profile record for an identity id.
    ///
    /// Returns [`ProfileStoreError::NotFound`] when no record exists - a
    /// distinguishable outcome, not a transport failure.
    async fn profile(&self, identity_id: &str) -> Result<Profile, ProfileStoreError>;
}
