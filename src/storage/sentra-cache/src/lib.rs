//! # Sentra Cache
//!
//! Tab-scoped persistent store of the last resolved identity.
//!
//! Backs the first paint on remount: consumers read the cached identity
//! synchronously while the engine re-resolves in the background. Writes are
//! guarded by deep equality so an unchanged identity never produces a
//! redundant write, and cache failures never propagate - the engine logs
//! and continues.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod store;

use tracing::{debug, trace, warn};

use sentra_identity::Identity;

pub use error::CacheError;
pub use store::{CacheStore, FileStore, MemoryStore};

/// Cache of the single active identity for one scope.
pub struct SessionCache {
    store: Box<dyn CacheStore>,
}

impl SessionCache {
    /// Creates a cache over an in-memory store.
    pub fn in_memory() -> Self {
        Self::with_store(Box::new(MemoryStore::new()))
    }

    /// Creates a cache over the given store.
    pub fn with_store(store: Box<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Returns the cached identity, if any.
    ///
    /// Unreadable or corrupt cache contents read as empty.
    pub fn read(&self) -> Option<Identity> {
        let document = match self.store.load() {
            Ok(Some(document)) => document,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "cache read failed");
                return None;
            },
        };

        match serde_json::from_str(&document) {
            Ok(identity) => Some(identity),
            Err(e) => {
                warn!(error = %e, "cache document corrupt, ignoring");
                None
            },
        }
    }

    /// Writes the identity, unless it deep-equals the stored one.
    ///
    /// Returns whether a write happened.
    pub fn write(&self, identity: &Identity) -> bool {
        if self.read().as_ref() == Some(identity) {
            trace!(user_id = %identity.user_id, "identity unchanged, skipping cache write");
            return false;
        }

        let document = match serde_json::to_string(identity) {
            Ok(document) => document,
            Err(e) => {
                warn!(error = %e, "identity serialization failed");
                return false;
            },
        };

        match self.store.store(&document) {
            Ok(()) => {
                debug!(user_id = %identity.user_id, "identity cached");
                true
            },
            Err(e) => {
                warn!(error = %e, "cache write failed");
                false
            },
        }
    }

    /// Removes the entry - the published identity became `None`.
    pub fn remove(&self) {
        if let Err(e) = self.store.remove() {
            warn!(error = %e, "cache remove failed");
        }
    }

    /// Clears the cache on the teardown signal.
    pub fn clear(&self) {
        match self.store.remove() {
            Ok(()) => debug!("session cache cleared"),
            Err(e) => warn!(error = %e, "cache clear failed"),
        }
    }
}
