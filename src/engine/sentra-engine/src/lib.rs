//! # Sentra Engine
//!
//! The auth controller: one continuously-reconciled view of "who is
//! currently authenticated, with what role and profile".
//!
//! ## How it works
//!
//! - One initial session fetch plus a live subscription to provider change
//!   events, both feeding the same resolution pipeline
//! - A monotonic generation token discards stale async results, so a
//!   later-issued, faster-completing resolution always wins
//! - A timeout bounds the initial resolution; a late completion still
//!   supersedes the timeout
//! - `dispose()` is soft cancellation: in-flight provider calls are not
//!   aborted, their results are just rendered inert
//!
//! Consumers read [`EngineState`] through a watch channel and never mutate
//! it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod controller;
pub mod error;
pub mod state;

pub use config::EngineConfig;
pub use controller::AuthController;
pub use error::EngineError;
pub use state::EngineState;
