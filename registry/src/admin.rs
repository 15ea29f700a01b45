//! Privileged operations: bootstrap, reclaim, treasury, pause, and roles.

use crate::access::Role;
use crate::context::CallContext;
use crate::error::RegistryError;
use crate::events::RegistryEvent;
use crate::ledger::Receipt;
use crate::lifecycle::LifecycleState;
use crate::payments::Payments;
use crate::record::NameRecord;
use crate::registry::{rejected, Registry};
use moniker_types::{AccountId, Amount, NameId};
use tracing::{info, warn};

/// One entry of a batch reclaim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReclaimAction {
    pub id: NameId,
    pub destination: AccountId,
}

impl ReclaimAction {
    pub fn new(name: &str, destination: AccountId) -> Result<Self, RegistryError> {
        Ok(Self {
            id: NameId::from_name(name)?,
            destination,
        })
    }
}

impl<P: Payments> Registry<P> {
    // ── Bootstrap ───────────────────────────────────────────────────────

    /// Acquire a Registrable name during bootstrap. Trusted caller only;
    /// no commit and no fee.
    pub fn trusted_register(
        &mut self,
        ctx: &CallContext,
        name: &str,
        owner: AccountId,
        recovery: Option<AccountId>,
    ) -> Result<Receipt, RegistryError> {
        self.apply_trusted_register(ctx, name, owner, recovery)
            .inspect_err(rejected("trusted_register"))
    }

    fn apply_trusted_register(
        &mut self,
        ctx: &CallContext,
        name: &str,
        owner: AccountId,
        recovery: Option<AccountId>,
    ) -> Result<Receipt, RegistryError> {
        self.require_not_paused()?;
        if !self.config.trusted_only {
            return Err(RegistryError::BootstrapInactive);
        }
        if self.config.trusted_caller != Some(ctx.acting_as) {
            return Err(RegistryError::NotTrustedCaller {
                caller: ctx.acting_as,
            });
        }
        let id = NameId::from_name(name)?;
        if owner.is_zero() {
            return Err(RegistryError::NullAccount { role: "owner" });
        }
        if let Some(existing) = self.records.get(&id) {
            return Err(RegistryError::NotRegistrable {
                name: id,
                state: self.state_at(existing, ctx.now),
            });
        }
        let expiry = ctx
            .now
            .checked_add_secs(self.config.registration_period_secs)
            .ok_or(RegistryError::Overflow)?;

        self.records
            .insert(id, NameRecord::new(id, owner, expiry, recovery));
        self.emit(RegistryEvent::Transfer {
            id,
            from: None,
            to: owner,
            expiry,
        });
        info!(name = %id, %owner, %expiry, "name registered by trusted caller");
        Ok(Receipt {
            id,
            owner,
            expiry,
            price: Amount::ZERO,
            refund: Amount::ZERO,
        })
    }

    /// Admin reassigns the trusted caller while bootstrap is active.
    pub fn change_trusted_caller(
        &mut self,
        ctx: &CallContext,
        trusted_caller: AccountId,
    ) -> Result<(), RegistryError> {
        self.apply_change_trusted_caller(ctx, trusted_caller)
            .inspect_err(rejected("change_trusted_caller"))
    }

    fn apply_change_trusted_caller(
        &mut self,
        ctx: &CallContext,
        trusted_caller: AccountId,
    ) -> Result<(), RegistryError> {
        self.policy.require(Role::Admin, &ctx.acting_as)?;
        if !self.config.trusted_only {
            return Err(RegistryError::BootstrapInactive);
        }
        if trusted_caller.is_zero() {
            return Err(RegistryError::NullAccount {
                role: "trusted caller",
            });
        }
        self.config.trusted_caller = Some(trusted_caller);
        self.emit(RegistryEvent::ChangeTrustedCaller { trusted_caller });
        info!(%trusted_caller, "trusted caller changed");
        Ok(())
    }

    /// End bootstrap. There is no way back.
    pub fn disable_trusted_only(&mut self, ctx: &CallContext) -> Result<(), RegistryError> {
        self.policy
            .require(Role::Admin, &ctx.acting_as)
            .map_err(RegistryError::from)
            .inspect_err(rejected("disable_trusted_only"))?;
        if self.config.trusted_only {
            self.config.trusted_only = false;
            self.emit(RegistryEvent::DisableTrustedOnly);
            warn!(by = %ctx.acting_as, "bootstrap phase ended");
        }
        Ok(())
    }

    // ── Reclaim ─────────────────────────────────────────────────────────

    /// Moderator forcibly moves a name to `destination`.
    ///
    /// Works in every state except Registrable. A name past its expiry gets
    /// a fresh expiry of `now + renewal_period`; a Registered name keeps its
    /// expiry. Recovery state and approval are cleared.
    pub fn reclaim(
        &mut self,
        ctx: &CallContext,
        name: &str,
        destination: AccountId,
    ) -> Result<(), RegistryError> {
        let action = ReclaimAction::new(name, destination).inspect_err(rejected("reclaim"))?;
        self.reclaim_many(ctx, &[action])
    }

    /// Reclaim several names. Either every action applies or none does.
    pub fn reclaim_many(
        &mut self,
        ctx: &CallContext,
        actions: &[ReclaimAction],
    ) -> Result<(), RegistryError> {
        self.apply_reclaim_many(ctx, actions)
            .inspect_err(rejected("reclaim"))
    }

    fn apply_reclaim_many(
        &mut self,
        ctx: &CallContext,
        actions: &[ReclaimAction],
    ) -> Result<(), RegistryError> {
        self.policy.require(Role::Moderator, &ctx.acting_as)?;
        let refreshed_expiry = ctx
            .now
            .checked_add_secs(self.config.renewal_period_secs)
            .ok_or(RegistryError::Overflow)?;
        for action in actions {
            self.existing_record(action.id)?;
            if action.destination.is_zero() {
                return Err(RegistryError::NullAccount {
                    role: "destination",
                });
            }
        }

        for action in actions {
            let state = self.state_at(self.existing_record(action.id)?, ctx.now);
            let record = self.record_mut(action.id)?;
            let from = record.owner;
            if matches!(state, LifecycleState::Renewable | LifecycleState::Biddable) {
                record.expiry = refreshed_expiry;
            }
            let cleared = std::mem::take(&mut record.recovery);
            record.approved = None;
            record.owner = action.destination;
            let expiry = record.expiry;
            self.emit_request_dropped(action.id, ctx.acting_as, cleared.request);
            self.emit_address_replaced(action.id, cleared.recovery_address, None);
            self.emit(RegistryEvent::Transfer {
                id: action.id,
                from: Some(from),
                to: action.destination,
                expiry,
            });
            info!(
                name = %action.id,
                %from,
                to = %action.destination,
                %expiry,
                moderator = %ctx.acting_as,
                "name reclaimed"
            );
        }
        Ok(())
    }

    // ── Treasury ────────────────────────────────────────────────────────

    /// Treasurer sets the flat fee.
    pub fn change_fee(&mut self, ctx: &CallContext, fee: Amount) -> Result<(), RegistryError> {
        self.policy
            .require(Role::Treasurer, &ctx.acting_as)
            .map_err(RegistryError::from)
            .inspect_err(rejected("change_fee"))?;
        self.config.fee = fee;
        self.emit(RegistryEvent::ChangeFee { fee });
        info!(%fee, "fee changed");
        Ok(())
    }

    /// Admin sets the account that receives withdrawals.
    pub fn change_vault(&mut self, ctx: &CallContext, vault: AccountId) -> Result<(), RegistryError> {
        self.apply_change_vault(ctx, vault)
            .inspect_err(rejected("change_vault"))
    }

    fn apply_change_vault(&mut self, ctx: &CallContext, vault: AccountId) -> Result<(), RegistryError> {
        self.policy.require(Role::Admin, &ctx.acting_as)?;
        if vault.is_zero() {
            return Err(RegistryError::NullAccount { role: "vault" });
        }
        self.config.vault = vault;
        self.emit(RegistryEvent::ChangeVault { vault });
        info!(%vault, "vault changed");
        Ok(())
    }

    /// Treasurer moves retained fees to the vault.
    pub fn withdraw(&mut self, ctx: &CallContext, amount: Amount) -> Result<(), RegistryError> {
        self.apply_withdraw(ctx, amount)
            .inspect_err(rejected("withdraw"))
    }

    fn apply_withdraw(&mut self, ctx: &CallContext, amount: Amount) -> Result<(), RegistryError> {
        self.policy.require(Role::Treasurer, &ctx.acting_as)?;
        let remaining = self
            .balance
            .checked_sub(amount)
            .ok_or(RegistryError::InsufficientBalance {
                requested: amount,
                available: self.balance,
            })?;
        let vault = self.config.vault;

        let checkpoint = self.checkpoint(None, None);
        self.balance = remaining;
        self.emit(RegistryEvent::Withdraw { to: vault, amount });
        if let Err(source) = self.payments.send(&vault, amount) {
            self.rollback(checkpoint);
            return Err(RegistryError::WithdrawalRejected { to: vault, source });
        }
        info!(%vault, %amount, %remaining, "funds withdrawn");
        Ok(())
    }

    // ── Pause ───────────────────────────────────────────────────────────

    pub fn pause(&mut self, ctx: &CallContext) -> Result<(), RegistryError> {
        self.set_paused(ctx, true)
            .inspect_err(rejected("pause"))
    }

    pub fn unpause(&mut self, ctx: &CallContext) -> Result<(), RegistryError> {
        self.set_paused(ctx, false)
            .inspect_err(rejected("unpause"))
    }

    fn set_paused(&mut self, ctx: &CallContext, paused: bool) -> Result<(), RegistryError> {
        self.policy.require(Role::Operator, &ctx.acting_as)?;
        if self.paused == paused {
            return Ok(());
        }
        self.paused = paused;
        let by = ctx.acting_as;
        if paused {
            self.emit(RegistryEvent::Paused { by });
            warn!(%by, "registry paused");
        } else {
            self.emit(RegistryEvent::Unpaused { by });
            info!(%by, "registry unpaused");
        }
        Ok(())
    }

    // ── Roles ───────────────────────────────────────────────────────────

    pub fn grant_role(
        &mut self,
        ctx: &CallContext,
        role: Role,
        account: AccountId,
    ) -> Result<(), RegistryError> {
        let changed = self
            .policy
            .grant(&ctx.acting_as, role, account)
            .map_err(RegistryError::from)
            .inspect_err(rejected("grant_role"))?;
        if changed {
            self.emit(RegistryEvent::RoleGranted { role, account });
            info!(%role, %account, "role granted");
        }
        Ok(())
    }

    pub fn revoke_role(
        &mut self,
        ctx: &CallContext,
        role: Role,
        account: AccountId,
    ) -> Result<(), RegistryError> {
        let changed = self
            .policy
            .revoke(&ctx.acting_as, role, &account)
            .map_err(RegistryError::from)
            .inspect_err(rejected("revoke_role"))?;
        if changed {
            self.emit(RegistryEvent::RoleRevoked { role, account });
            info!(%role, %account, "role revoked");
        }
        Ok(())
    }
}
