//! Profile enrichment.

use std::sync::Arc;

use tracing::debug;

use sentra_identity::Profile;

use crate::{ProfileFetchError, ProfileStore, ProfileStoreError};

/// Fetches the profile record for an identity, treating "no record" as a
/// valid empty result.
///
/// Whether a failure is surfaced to the user or only logged is the
/// caller's policy; the enricher just reports it.
pub struct ProfileEnricher {
    store: Arc<dyn ProfileStore>,
}

impl ProfileEnricher {
    /// Creates an enricher over the given store.
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Fetches the profile for `identity_id`.
    ///
    /// Returns `Ok(None)` when the record does not exist and an error only
    /// for transport/permission failures.
    pub async fn fetch(&self, identity_id: &str) -> Result<Option<Profile>, ProfileFetchError> {
        match self.store.profile(identity_id).await {
            Ok(profile) => Ok(Some(profile)),
            Err(ProfileStoreError::NotFound) => {
                debug!(identity_id = %identity_id, "no profile record");
                Ok(None)
            },
            Err(ProfileStoreError::Transport(msg)) => Err(ProfileFetchError::Transport(msg)),
            Err(ProfileStoreError::PermissionDenied(msg)) => {
                Err(ProfileFetchError::PermissionDenied(msg))
            },
        }
    }
}
