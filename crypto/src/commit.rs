//! Commit derivation for the commit-reveal flow.
//!
//! A commit binds the name, the intended owner, a caller-chosen secret and
//! the recovery address. `register` recomputes the same hash from its own
//! arguments, so any mismatch lands on a commit that was never made.

use crate::hash::blake2b_256_multi;
use moniker_types::{AccountId, CommitHash};

/// Caller-chosen blinding value.
pub type Secret = [u8; 32];

const DOMAIN: &[u8] = b"moniker/commit/v2";

/// Derive the commit hash for `(name, owner, secret, recovery)`.
///
/// The name carries a little-endian `u64` length prefix so that no two
/// argument tuples share an encoding, whatever the name's length.
pub fn commit_hash(
    name: &str,
    owner: &AccountId,
    secret: &Secret,
    recovery: Option<&AccountId>,
) -> CommitHash {
    let recovery = recovery.copied().unwrap_or(AccountId::ZERO);
    let len = (name.len() as u64).to_le_bytes();
    CommitHash::new(blake2b_256_multi(&[
        DOMAIN,
        &len,
        name.as_bytes(),
        owner.as_bytes(),
        secret,
        recovery.as_bytes(),
    ]))
}
