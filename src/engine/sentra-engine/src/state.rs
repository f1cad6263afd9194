//! Published engine state.

use serde::Serialize;

use sentra_identity::{Identity, RawSession};

/// The reconciled state published to consumers.
///
/// After initialization starts, exactly one of these holds at any time:
/// `loading` is true, or `loading` is false and `identity` is settled
/// (possibly `None` for an anonymous session). `error` and `timed_out` are
/// the hard failure flags; `warning` carries the non-blocking profile
/// warning from the initial load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineState {
    /// The reconciled identity, `None` when signed out or not yet resolved.
    pub identity: Option<Identity>,
    /// The raw provider session behind `identity`.
    pub raw_session: Option<RawSession>,
    /// True from `initialize()` until the first resolution settles; never
    /// true again after that.
    pub loading: bool,
    /// Hard failure: session fetch failed or the initial resolution timed
    /// out. Cleared by `retry()` or by a successful resolution.
    pub error: Option<String>,
    /// Non-blocking warning: the profile fetch failed on the initial load.
    pub warning: Option<String>,
    /// The initial resolution exceeded its deadline. Cleared when the
    /// resolution completes anyway or `retry()` is called.
    pub timed_out: bool,
}

impl EngineState {
    /// Idle pre-initialization state.
    pub fn new() -> Self {
        Self::with_cached_identity(None)
    }

    /// Pre-initialization state seeded with a cached identity, so a
    /// remount paints the last known user while re-resolving.
    pub fn with_cached_identity(identity: Option<Identity>) -> Self {
        Self {
            identity,
            raw_session: None,
            loading: false,
            error: None,
            warning: None,
            timed_out: false,
        }
    }

    /// Whether a signed-in identity is currently published.
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}
