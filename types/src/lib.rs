//! Fundamental types for the moniker name registry.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! accounts, amounts, timestamps, name identifiers, and commit hashes.

pub mod account;
pub mod amount;
pub mod error;
pub mod hash;
pub mod name;
pub mod time;

pub use account::AccountId;
pub use amount::{Amount, WAD};
pub use error::MonikerError;
pub use hash::CommitHash;
pub use name::{validate_name, NameId, MAX_NAME_LEN};
pub use time::Timestamp;
