//! # Sentra Identity
//!
//! Data model for the identity synchronization engine.
//!
//! ## Types
//!
//! - [`RawSession`] - provider-issued token/claims bundle (read-only here)
//! - [`Role`] - resolved access role
//! - [`Profile`] - optional demographics enrichment record
//! - [`Identity`] - the reconciled, published view of "who is signed in"

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod identity;
pub mod profile;
pub mod role;
pub mod session;

pub use identity::Identity;
pub use profile::Profile;
pub use role::Role;
pub use session::{ClaimPatch, Claims, RawSession};
