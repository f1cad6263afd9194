//! Cache error types.

use thiserror::Error;

/// Errors from the cache store.
///
/// Cache failures never affect engine state; callers log and continue.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading or writing the backing store failed.
    #[error("cache io error: {0}")]
    Io(String),

    /// The stored document could not be (de)serialized.
    #[error("cache serialization error: {0}")]
    Serialization(String),
}
