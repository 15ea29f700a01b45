//! Hashing primitives for the moniker registry.
//!
//! - **Blake2b-256** for all digests
//! - Commit derivation for the commit-reveal acquisition flow

pub mod commit;
pub mod hash;

pub use commit::{commit_hash, Secret};
pub use hash::{blake2b_256, blake2b_256_multi};
