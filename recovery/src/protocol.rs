//! Request / cancel / complete transitions.
//!
//! Every method validates fully before touching the state, so a returned
//! error means the state is unchanged.

use crate::error::RecoveryError;
use crate::state::{RecoveryRequest, RecoveryState};
use moniker_types::{AccountId, Timestamp};
use tracing::debug;

/// The recovery rules, parameterized by the escrow period.
#[derive(Clone, Copy, Debug)]
pub struct RecoveryProtocol {
    escrow_period_secs: u64,
}

impl RecoveryProtocol {
    pub fn new(escrow_period_secs: u64) -> Self {
        Self { escrow_period_secs }
    }

    pub fn escrow_period_secs(&self) -> u64 {
        self.escrow_period_secs
    }

    /// Owner sets (or with `None`, removes) the recovery address.
    ///
    /// Any pending request is dropped and returned.
    pub fn change_recovery_address(
        &self,
        state: &mut RecoveryState,
        owner: &AccountId,
        caller: &AccountId,
        recovery: Option<AccountId>,
    ) -> Result<Option<RecoveryRequest>, RecoveryError> {
        if caller != owner {
            return Err(RecoveryError::NotOwner { caller: *caller });
        }
        state.recovery_address = recovery.filter(|a| !a.is_zero());
        Ok(state.clear_request())
    }

    /// Recovery address asks to move the record to `destination`.
    ///
    /// A later request replaces an earlier one and restarts the escrow clock.
    pub fn request(
        &self,
        state: &mut RecoveryState,
        caller: &AccountId,
        destination: AccountId,
        now: Timestamp,
    ) -> Result<RecoveryRequest, RecoveryError> {
        if !state.is_recovery_address(caller) {
            return Err(RecoveryError::NotRecoveryAddress { caller: *caller });
        }
        if destination.is_zero() {
            return Err(RecoveryError::InvalidDestination);
        }
        let request = RecoveryRequest {
            destination,
            requested_at: now,
        };
        if let Some(previous) = state.request.replace(request) {
            debug!(
                previous = %previous.destination,
                replacement = %destination,
                "recovery request replaced"
            );
        }
        Ok(request)
    }

    /// Owner or recovery address withdraws the pending request.
    pub fn cancel(
        &self,
        state: &mut RecoveryState,
        owner: Option<&AccountId>,
        caller: &AccountId,
    ) -> Result<RecoveryRequest, RecoveryError> {
        if owner != Some(caller) && !state.is_recovery_address(caller) {
            return Err(RecoveryError::NotCustodian { caller: *caller });
        }
        state.clear_request().ok_or(RecoveryError::NoPendingRecovery)
    }

    /// Earliest time at which `request` may be completed.
    pub fn ready_at(&self, request: &RecoveryRequest) -> Result<Timestamp, RecoveryError> {
        request
            .requested_at
            .checked_add_secs(self.escrow_period_secs)
            .ok_or(RecoveryError::Overflow)
    }

    /// Check that `caller` may complete recovery at `now` and return the
    /// destination. Does not mutate; the host applies its own checks and
    /// then calls [`RecoveryProtocol::finish`].
    pub fn check_complete(
        &self,
        state: &RecoveryState,
        caller: &AccountId,
        now: Timestamp,
    ) -> Result<AccountId, RecoveryError> {
        if !state.is_recovery_address(caller) {
            return Err(RecoveryError::NotRecoveryAddress { caller: *caller });
        }
        let request = state.request.ok_or(RecoveryError::NoPendingRecovery)?;
        let ready_at = self.ready_at(&request)?;
        if now < ready_at {
            return Err(RecoveryError::EscrowNotElapsed { ready_at });
        }
        Ok(request.destination)
    }

    /// Clear the recovery address and the request after a completed move.
    pub fn finish(&self, state: &mut RecoveryState) -> Option<RecoveryRequest> {
        state.clear_all()
    }
}
