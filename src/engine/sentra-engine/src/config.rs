//! Engine configuration.

use std::time::Duration;

/// Tunables for one [`AuthController`](crate::AuthController).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long the initial resolution may take before the engine reports
    /// a timeout. The resolution itself keeps running; a late completion
    /// still supersedes the timeout.
    pub initial_timeout: Duration,

    /// Claim key carrying the role, both for reads and for write-back.
    pub role_claim: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_timeout: Duration::from_secs(8),
            role_claim: "role".to_string(),
        }
    }
}
