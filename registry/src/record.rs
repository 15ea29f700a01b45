//! Name records.

use crate::lifecycle::{lifecycle_state, LifecycleState};
use moniker_recovery::{RecoveryRequest, RecoveryState};
use moniker_types::{AccountId, NameId, Timestamp};
use serde::{Deserialize, Serialize};

/// The ledger entry for a name.
///
/// A record exists only once the name has been acquired, so `owner` is
/// always set and `expiry` is always non-zero; a missing record is the
/// Registrable state. Records are never deleted.
///
/// Persisted via snapshots: new fields are appended at the end.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub id: NameId,
    pub owner: AccountId,
    pub expiry: Timestamp,
    pub recovery: RecoveryState,
    /// Delegated transfer agent.
    pub approved: Option<AccountId>,
}

impl NameRecord {
    pub fn new(
        id: NameId,
        owner: AccountId,
        expiry: Timestamp,
        recovery_address: Option<AccountId>,
    ) -> Self {
        Self {
            id,
            owner,
            expiry,
            recovery: RecoveryState::new(recovery_address),
            approved: None,
        }
    }

    pub fn state(&self, now: Timestamp, renewal_period_secs: u64) -> LifecycleState {
        lifecycle_state(self.expiry, now, renewal_period_secs)
    }

    /// Owner or the delegated transfer agent.
    pub fn can_transfer(&self, who: &AccountId) -> bool {
        self.owner == *who || self.approved.as_ref() == Some(who)
    }

    /// Hand the record to `to`, dropping any pending recovery request and
    /// transfer approval. The recovery address and expiry are kept.
    ///
    /// Returns the dropped request, if one was pending.
    pub fn reassign(&mut self, to: AccountId) -> Option<RecoveryRequest> {
        self.owner = to;
        self.approved = None;
        self.recovery.clear_request()
    }
}
