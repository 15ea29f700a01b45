//! Per-record recovery state.

use moniker_types::{AccountId, Timestamp};
use serde::{Deserialize, Serialize};

/// A pending request to move a record to `destination`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryRequest {
    pub destination: AccountId,
    pub requested_at: Timestamp,
}

/// Recovery fields carried by every recoverable record.
///
/// A request is pending exactly when `request` is `Some`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryState {
    pub recovery_address: Option<AccountId>,
    pub request: Option<RecoveryRequest>,
}

/// Where a record sits in the recovery sub-state-machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoveryPhase {
    NoRecovery,
    Requested(RecoveryRequest),
}

impl RecoveryState {
    pub fn new(recovery_address: Option<AccountId>) -> Self {
        Self {
            recovery_address: recovery_address.filter(|a| !a.is_zero()),
            request: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.request.is_some()
    }

    pub fn phase(&self) -> RecoveryPhase {
        match self.request {
            Some(request) => RecoveryPhase::Requested(request),
            None => RecoveryPhase::NoRecovery,
        }
    }

    /// Whether `who` is the configured recovery address.
    pub fn is_recovery_address(&self, who: &AccountId) -> bool {
        self.recovery_address.as_ref() == Some(who)
    }

    /// Drop any pending request, returning it.
    pub fn clear_request(&mut self) -> Option<RecoveryRequest> {
        self.request.take()
    }

    /// Drop the recovery address and any pending request.
    pub fn clear_all(&mut self) -> Option<RecoveryRequest> {
        self.recovery_address = None;
        self.request.take()
    }
}
