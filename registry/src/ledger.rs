//! Name acquisition, renewal, auction, and transfer.

use crate::context::CallContext;
use crate::error::RegistryError;
use crate::events::RegistryEvent;
use crate::lifecycle::LifecycleState;
use crate::payments::Payments;
use crate::record::NameRecord;
use crate::registry::{rejected, Registry};
use moniker_crypto::{commit_hash, Secret};
use moniker_recovery::RecoveryState;
use moniker_types::{AccountId, Amount, CommitHash, NameId, Timestamp};
use tracing::{debug, info};

/// Outcome of a paid or acquiring operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub id: NameId,
    pub owner: AccountId,
    pub expiry: Timestamp,
    /// Amount retained by the registry.
    pub price: Amount,
    /// Overpayment returned to the sender.
    pub refund: Amount,
}

impl<P: Payments> Registry<P> {
    /// Record an opaque commitment to a future registration, dropping any
    /// commits that lapsed unrevealed.
    ///
    /// Unavailable while bootstrap is active.
    pub fn make_commit(&mut self, ctx: &CallContext, hash: CommitHash) -> Result<(), RegistryError> {
        self.apply_make_commit(ctx, hash)
            .inspect_err(rejected("make_commit"))
    }

    fn apply_make_commit(&mut self, ctx: &CallContext, hash: CommitHash) -> Result<(), RegistryError> {
        self.require_not_paused()?;
        if self.config.trusted_only {
            return Err(RegistryError::BootstrapActive);
        }
        self.commits
            .make(hash, ctx.now, self.config.commit_replay_delay_secs)?;
        let lapsed = self.commits.prune(ctx.now, self.config.commit_lifetime_secs);
        debug!(%hash, at = %ctx.now, lapsed, "commit recorded");
        Ok(())
    }

    /// Reveal a matured commit and acquire a Registrable name.
    ///
    /// `paid` must cover the flat fee; the excess is refunded to
    /// `ctx.sender`.
    pub fn register(
        &mut self,
        ctx: &CallContext,
        name: &str,
        owner: AccountId,
        secret: &Secret,
        recovery: Option<AccountId>,
        paid: Amount,
    ) -> Result<Receipt, RegistryError> {
        self.apply_register(ctx, name, owner, secret, recovery, paid)
            .inspect_err(rejected("register"))
    }

    fn apply_register(
        &mut self,
        ctx: &CallContext,
        name: &str,
        owner: AccountId,
        secret: &Secret,
        recovery: Option<AccountId>,
        paid: Amount,
    ) -> Result<Receipt, RegistryError> {
        self.require_not_paused()?;
        if self.config.trusted_only {
            return Err(RegistryError::BootstrapActive);
        }
        let id = NameId::from_name(name)?;
        if owner.is_zero() {
            return Err(RegistryError::NullAccount { role: "owner" });
        }

        let hash = commit_hash(name, &owner, secret, recovery.as_ref());
        self.commits
            .check(
                &hash,
                ctx.now,
                self.config.reveal_delay_secs,
                self.config.commit_lifetime_secs,
            )?;

        if let Some(existing) = self.records.get(&id) {
            return Err(RegistryError::NotRegistrable {
                name: id,
                state: self.state_at(existing, ctx.now),
            });
        }

        let price = self.config.fee;
        let refund = self.pricing().settle(price, paid)?;
        let expiry = ctx
            .now
            .checked_add_secs(self.config.registration_period_secs)
            .ok_or(RegistryError::Overflow)?;

        let checkpoint = self.checkpoint(Some(id), Some(hash));
        self.commits
            .consume(
                &hash,
                ctx.now,
                self.config.reveal_delay_secs,
                self.config.commit_lifetime_secs,
            )?;
        self.records
            .insert(id, NameRecord::new(id, owner, expiry, recovery));
        self.emit(RegistryEvent::Transfer {
            id,
            from: None,
            to: owner,
            expiry,
        });
        self.collect(checkpoint, ctx.sender, price, refund)?;

        info!(name = %id, %owner, %expiry, %price, %refund, "name registered");
        Ok(Receipt {
            id,
            owner,
            expiry,
            price,
            refund,
        })
    }

    /// Extend a name in its grace period by one registration term.
    ///
    /// Anyone may pay for a renewal. The new expiry is counted from the old
    /// one. A pending recovery request is cancelled.
    pub fn renew(
        &mut self,
        ctx: &CallContext,
        name: &str,
        paid: Amount,
    ) -> Result<Receipt, RegistryError> {
        self.apply_renew(ctx, name, paid)
            .inspect_err(rejected("renew"))
    }

    fn apply_renew(
        &mut self,
        ctx: &CallContext,
        name: &str,
        paid: Amount,
    ) -> Result<Receipt, RegistryError> {
        self.require_not_paused()?;
        let id = NameId::from_name(name)?;
        let record = self.existing_record(id)?;
        let state = self.state_at(record, ctx.now);
        if state != LifecycleState::Renewable {
            return Err(RegistryError::NotRenewable { name: id, state });
        }
        let owner = record.owner;
        let expiry = record
            .expiry
            .checked_add_secs(self.config.registration_period_secs)
            .ok_or(RegistryError::Overflow)?;

        let price = self.config.fee;
        let refund = self.pricing().settle(price, paid)?;

        let checkpoint = self.checkpoint(Some(id), None);
        let record = self.record_mut(id)?;
        record.expiry = expiry;
        let dropped = record.recovery.clear_request();
        self.emit_request_dropped(id, ctx.acting_as, dropped);
        self.emit(RegistryEvent::Renew { id, expiry });
        self.collect(checkpoint, ctx.sender, price, refund)?;

        info!(name = %id, %expiry, %price, %refund, "name renewed");
        Ok(Receipt {
            id,
            owner,
            expiry,
            price,
            refund,
        })
    }

    /// Win a Biddable name at the current auction price.
    ///
    /// The winner's record starts fresh: new term, the given recovery
    /// address, no pending request, no approval.
    pub fn bid(
        &mut self,
        ctx: &CallContext,
        name: &str,
        recipient: AccountId,
        recovery: Option<AccountId>,
        paid: Amount,
    ) -> Result<Receipt, RegistryError> {
        self.apply_bid(ctx, name, recipient, recovery, paid)
            .inspect_err(rejected("bid"))
    }

    fn apply_bid(
        &mut self,
        ctx: &CallContext,
        name: &str,
        recipient: AccountId,
        recovery: Option<AccountId>,
        paid: Amount,
    ) -> Result<Receipt, RegistryError> {
        self.require_not_paused()?;
        let id = NameId::from_name(name)?;
        if recipient.is_zero() {
            return Err(RegistryError::NullAccount { role: "recipient" });
        }
        let previous = self.records.get(&id).map(|r| (r.owner, r.expiry));
        let current_expiry = previous.map_or(Timestamp::EPOCH, |(_, expiry)| expiry);

        let price = self.pricing().auction_price(id, current_expiry, ctx.now)?;
        let refund = self.pricing().settle(price, paid)?;
        let expiry = ctx
            .now
            .checked_add_secs(self.config.registration_period_secs)
            .ok_or(RegistryError::Overflow)?;

        let checkpoint = self.checkpoint(Some(id), None);
        let record = self.record_mut(id)?;
        record.owner = recipient;
        record.expiry = expiry;
        record.approved = None;
        let before = std::mem::replace(&mut record.recovery, RecoveryState::new(recovery));
        let after = record.recovery.recovery_address;
        self.emit_request_dropped(id, ctx.acting_as, before.request);
        self.emit_address_replaced(id, before.recovery_address, after);
        self.emit(RegistryEvent::Transfer {
            id,
            from: previous.map(|(owner, _)| owner),
            to: recipient,
            expiry,
        });
        self.collect(checkpoint, ctx.sender, price, refund)?;

        info!(name = %id, winner = %recipient, %expiry, %price, %refund, "auction won");
        Ok(Receipt {
            id,
            owner: recipient,
            expiry,
            price,
            refund,
        })
    }

    /// Move a held name to `to`. The owner or the approved agent may call.
    pub fn transfer(
        &mut self,
        ctx: &CallContext,
        name: &str,
        to: AccountId,
    ) -> Result<(), RegistryError> {
        self.apply_transfer(ctx, name, to)
            .inspect_err(rejected("transfer"))
    }

    fn apply_transfer(
        &mut self,
        ctx: &CallContext,
        name: &str,
        to: AccountId,
    ) -> Result<(), RegistryError> {
        self.require_not_paused()?;
        let id = NameId::from_name(name)?;
        if to.is_zero() {
            return Err(RegistryError::NullAccount { role: "recipient" });
        }
        let record = self.held_record(id, ctx.now)?;
        if !record.can_transfer(&ctx.acting_as) {
            return Err(RegistryError::Unauthorized {
                caller: ctx.acting_as,
                name: id,
            });
        }
        let from = record.owner;

        let record = self.record_mut(id)?;
        let dropped = record.reassign(to);
        let expiry = record.expiry;
        self.emit_request_dropped(id, ctx.acting_as, dropped);
        self.emit(RegistryEvent::Transfer {
            id,
            from: Some(from),
            to,
            expiry,
        });
        info!(name = %id, %from, %to, "name transferred");
        Ok(())
    }

    /// Set or clear the account allowed to transfer on the owner's behalf.
    pub fn approve(
        &mut self,
        ctx: &CallContext,
        name: &str,
        agent: Option<AccountId>,
    ) -> Result<(), RegistryError> {
        self.apply_approve(ctx, name, agent)
            .inspect_err(rejected("approve"))
    }

    fn apply_approve(
        &mut self,
        ctx: &CallContext,
        name: &str,
        agent: Option<AccountId>,
    ) -> Result<(), RegistryError> {
        self.require_not_paused()?;
        let id = NameId::from_name(name)?;
        let record = self.held_record(id, ctx.now)?;
        if record.owner != ctx.acting_as {
            return Err(RegistryError::Unauthorized {
                caller: ctx.acting_as,
                name: id,
            });
        }
        let owner = record.owner;
        let approved = agent.filter(|a| !a.is_zero());

        self.record_mut(id)?.approved = approved;
        self.emit(RegistryEvent::Approval {
            id,
            owner,
            approved,
        });
        debug!(name = %id, ?approved, "approval set");
        Ok(())
    }
}
