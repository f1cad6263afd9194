//! Profile error types.

use thiserror::Error;

/// Store-level outcome of a profile lookup.
#[derive(Debug, Error)]
pub enum ProfileStoreError {
    /// No record exists for this identity id.
    #[error("profile not found")]
    NotFound,

    /// The store could not be reached.
    #[error("profile store unreachable: {0}")]
    Transport(String),

    /// The caller is not allowed to read this record.
    #[error("profile read denied: {0}")]
    PermissionDenied(String),
}

/// Enricher failure - transport or permission only.
///
/// "Not found" never becomes one of these; the enricher maps it to a valid
/// empty result instead.
#[derive(Debug, Error)]
pub enum ProfileFetchError {
    /// The store could not be reached.
    #[error("profile fetch failed: {0}")]
    Transport(String),

    /// The caller is not allowed to read this record.
    #[error("profile fetch denied: {0}")]
    PermissionDenied(String),
}
