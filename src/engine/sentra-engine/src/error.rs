//! Engine error types.

use thiserror::Error;

/// Controller misuse errors.
///
/// Operational failures (provider, profile, cache) never surface as `Err`;
/// they land in [`EngineState`](crate::EngineState) or in logs.
#[derive(Debug, Error)]
pub enum EngineError {
    /// `initialize()` was called twice.
    #[error("controller already initialized")]
    AlreadyInitialized,

    /// The controller has been disposed.
    #[error("controller disposed")]
    Disposed,
}
