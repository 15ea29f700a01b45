//! Name-registry bindings for the shared recovery protocol.
//!
//! The protocol itself lives in `moniker-recovery`; this module resolves the
//! record, applies the lifecycle checks that only the name registry has, and
//! emits events.

use crate::context::CallContext;
use crate::error::RegistryError;
use crate::events::RegistryEvent;
use crate::payments::Payments;
use crate::registry::{rejected, Registry};
use moniker_recovery::RecoveryRequest;
use moniker_types::{AccountId, NameId, Timestamp};
use tracing::info;

impl<P: Payments> Registry<P> {
    /// Owner sets or clears the recovery address of a held name.
    ///
    /// Any pending request is cancelled. Allowed while paused.
    pub fn change_recovery_address(
        &mut self,
        ctx: &CallContext,
        name: &str,
        recovery: Option<AccountId>,
    ) -> Result<(), RegistryError> {
        self.apply_change_recovery_address(ctx, name, recovery)
            .inspect_err(rejected("change_recovery_address"))
    }

    fn apply_change_recovery_address(
        &mut self,
        ctx: &CallContext,
        name: &str,
        recovery: Option<AccountId>,
    ) -> Result<(), RegistryError> {
        let id = NameId::from_name(name)?;
        let owner = self.held_record(id, ctx.now)?.owner;
        let protocol = self.recovery;

        let record = self.record_mut(id)?;
        let dropped =
            protocol.change_recovery_address(&mut record.recovery, &owner, &ctx.acting_as, recovery)?;
        let recovery = record.recovery.recovery_address;
        self.emit_request_dropped(id, ctx.acting_as, dropped);
        self.emit(RegistryEvent::ChangeRecoveryAddress { id, recovery });
        info!(name = %id, ?recovery, "recovery address changed");
        Ok(())
    }

    /// The recovery address asks to move the name to `destination`.
    pub fn request_recovery(
        &mut self,
        ctx: &CallContext,
        name: &str,
        destination: AccountId,
    ) -> Result<RecoveryRequest, RegistryError> {
        self.apply_request_recovery(ctx, name, destination)
            .inspect_err(rejected("request_recovery"))
    }

    fn apply_request_recovery(
        &mut self,
        ctx: &CallContext,
        name: &str,
        destination: AccountId,
    ) -> Result<RecoveryRequest, RegistryError> {
        self.require_not_paused()?;
        let id = NameId::from_name(name)?;
        let protocol = self.recovery;

        let record = self.record_mut(id)?;
        let request = protocol.request(&mut record.recovery, &ctx.acting_as, destination, ctx.now)?;
        let from = record.owner;
        self.emit(RegistryEvent::RequestRecovery {
            id,
            from,
            to: destination,
        });
        info!(
            name = %id,
            %from,
            to = %destination,
            requested_at = %request.requested_at,
            "recovery requested"
        );
        Ok(request)
    }

    /// Owner or recovery address withdraws the pending request.
    /// Allowed while paused.
    pub fn cancel_recovery(&mut self, ctx: &CallContext, name: &str) -> Result<(), RegistryError> {
        self.apply_cancel_recovery(ctx, name)
            .inspect_err(rejected("cancel_recovery"))
    }

    fn apply_cancel_recovery(&mut self, ctx: &CallContext, name: &str) -> Result<(), RegistryError> {
        let id = NameId::from_name(name)?;
        let protocol = self.recovery;

        let record = self.record_mut(id)?;
        let owner = record.owner;
        let cancelled = protocol.cancel(&mut record.recovery, Some(&owner), &ctx.acting_as)?;
        self.emit(RegistryEvent::CancelRecovery {
            id,
            by: ctx.acting_as,
        });
        info!(name = %id, by = %ctx.acting_as, destination = %cancelled.destination, "recovery cancelled");
        Ok(())
    }

    /// The recovery address completes a request whose escrow has elapsed.
    ///
    /// Ownership moves to the requested destination; the recovery address,
    /// the request and any approval are cleared.
    pub fn complete_recovery(
        &mut self,
        ctx: &CallContext,
        name: &str,
    ) -> Result<AccountId, RegistryError> {
        self.apply_complete_recovery(ctx, name)
            .inspect_err(rejected("complete_recovery"))
    }

    fn apply_complete_recovery(
        &mut self,
        ctx: &CallContext,
        name: &str,
    ) -> Result<AccountId, RegistryError> {
        self.require_not_paused()?;
        let id = NameId::from_name(name)?;
        let record = self.existing_record(id)?;
        let destination = self
            .recovery
            .check_complete(&record.recovery, &ctx.acting_as, ctx.now)?;
        let record = self.held_record(id, ctx.now)?;
        let from = record.owner;
        let protocol = self.recovery;

        let record = self.record_mut(id)?;
        let address = record.recovery.recovery_address;
        let fulfilled = protocol.finish(&mut record.recovery);
        record.reassign(destination);
        let expiry = record.expiry;
        self.emit_request_dropped(id, ctx.acting_as, fulfilled);
        self.emit_address_replaced(id, address, None);
        self.emit(RegistryEvent::Transfer {
            id,
            from: Some(from),
            to: destination,
            expiry,
        });
        info!(name = %id, %from, to = %destination, "recovery completed");
        Ok(destination)
    }

    /// When the pending request on `name` can be completed, if any.
    pub fn recovery_ready_at(&self, name: &str) -> Result<Option<Timestamp>, RegistryError> {
        let id = NameId::from_name(name)?;
        let record = self.existing_record(id)?;
        match record.recovery.request {
            Some(request) => Ok(Some(self.recovery.ready_at(&request)?)),
            None => Ok(None),
        }
    }
}
