//! Lifecycle clock: the state of a name is a pure function of its expiry
//! and the current time. It is never stored.

use moniker_types::Timestamp;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Never registered (`expiry == 0`).
    Registrable,
    /// `now < expiry`.
    Registered,
    /// `expiry <= now < expiry + renewal_period`.
    Renewable,
    /// `now >= expiry + renewal_period`; open to anyone through the auction.
    Biddable,
}

impl LifecycleState {
    /// Registered or Renewable: the owner still holds the name.
    pub fn is_held(&self) -> bool {
        matches!(self, Self::Registered | Self::Renewable)
    }
}

/// Classify `expiry` at `now`.
///
/// An expiry so large that `expiry + renewal_period` overflows is treated as
/// never reaching the auction.
pub fn lifecycle_state(expiry: Timestamp, now: Timestamp, renewal_period_secs: u64) -> LifecycleState {
    if expiry.is_epoch() {
        return LifecycleState::Registrable;
    }
    if now < expiry {
        return LifecycleState::Registered;
    }
    match expiry.checked_add_secs(renewal_period_secs) {
        Some(auction_start) if now >= auction_start => LifecycleState::Biddable,
        _ => LifecycleState::Renewable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRACE: u64 = 30 * 86_400;

    fn state(expiry: u64, now: u64) -> LifecycleState {
        lifecycle_state(Timestamp::new(expiry), Timestamp::new(now), GRACE)
    }

    #[test]
    fn zero_expiry_is_registrable() {
        assert_eq!(state(0, 0), LifecycleState::Registrable);
        assert_eq!(state(0, u64::MAX), LifecycleState::Registrable);
    }

    #[test]
    fn boundaries() {
        let expiry = 1_000_000;
        assert_eq!(state(expiry, expiry - 1), LifecycleState::Registered);
        assert_eq!(state(expiry, expiry), LifecycleState::Renewable);
        assert_eq!(state(expiry, expiry + GRACE - 1), LifecycleState::Renewable);
        assert_eq!(state(expiry, expiry + GRACE), LifecycleState::Biddable);
        assert_eq!(state(expiry, u64::MAX), LifecycleState::Biddable);
    }

    #[test]
    fn overflowing_grace_never_biddable() {
        assert_eq!(state(u64::MAX - 1, u64::MAX), LifecycleState::Renewable);
    }

    #[test]
    fn held_states() {
        assert!(LifecycleState::Registered.is_held());
        assert!(LifecycleState::Renewable.is_held());
        assert!(!LifecycleState::Biddable.is_held());
        assert!(!LifecycleState::Registrable.is_held());
    }
}
