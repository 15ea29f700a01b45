//! The registry: owns every name record, the commit store, the treasury
//! balance, and the event log. Operations are spread across `ledger`,
//! `recovery`, and `admin`; this module holds the shared plumbing.

use std::collections::BTreeMap;

use crate::access::AccessPolicy;
use crate::commit::CommitStore;
use crate::config::{ConfigError, RegistryConfig};
use crate::error::RegistryError;
use crate::events::RegistryEvent;
use crate::lifecycle::{lifecycle_state, LifecycleState};
use crate::payments::Payments;
use crate::pricing::PricingEngine;
use crate::record::NameRecord;
use moniker_recovery::{RecoveryProtocol, RecoveryRequest};
use moniker_types::{AccountId, Amount, CommitHash, NameId, Timestamp};
use moniker_utils::format_duration;
use tracing::{debug, info};

pub struct Registry<P> {
    pub(crate) config: RegistryConfig,
    pub(crate) policy: AccessPolicy,
    pub(crate) records: BTreeMap<NameId, NameRecord>,
    pub(crate) commits: CommitStore,
    pub(crate) recovery: RecoveryProtocol,
    pub(crate) balance: Amount,
    pub(crate) paused: bool,
    pub(crate) events: Vec<RegistryEvent>,
    pub(crate) payments: P,
}

/// Everything a single call may touch, captured before it mutates.
pub(crate) struct Checkpoint {
    record: Option<(NameId, Option<NameRecord>)>,
    commit: Option<(CommitHash, Option<Timestamp>)>,
    balance: Amount,
    events_len: usize,
}

impl<P: Payments> Registry<P> {
    /// Create an empty registry. The configured admin receives the admin role.
    pub fn new(config: RegistryConfig, payments: P) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            admin = %config.admin,
            bootstrap = config.trusted_only,
            fee = %config.fee,
            term = %format_duration(config.registration_period_secs),
            grace = %format_duration(config.renewal_period_secs),
            escrow = %format_duration(config.escrow_period_secs),
            "registry created"
        );
        Ok(Self {
            policy: AccessPolicy::with_admin(config.admin),
            recovery: RecoveryProtocol::new(config.escrow_period_secs),
            config,
            records: BTreeMap::new(),
            commits: CommitStore::new(),
            balance: Amount::ZERO,
            paused: false,
            events: Vec::new(),
            payments,
        })
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn payments(&self) -> &P {
        &self.payments
    }

    pub fn payments_mut(&mut self) -> &mut P {
        &mut self.payments
    }

    /// Fees retained and not yet withdrawn.
    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_trusted_only(&self) -> bool {
        self.config.trusted_only
    }

    pub fn pricing(&self) -> PricingEngine {
        PricingEngine::new(
            self.config.fee,
            self.config.renewal_period_secs,
            self.config.auction.clone(),
        )
    }

    pub fn record(&self, name: &str) -> Result<Option<&NameRecord>, RegistryError> {
        let id = NameId::from_name(name)?;
        Ok(self.records.get(&id))
    }

    pub fn record_by_id(&self, id: &NameId) -> Option<&NameRecord> {
        self.records.get(id)
    }

    pub fn records(&self) -> impl Iterator<Item = &NameRecord> {
        self.records.values()
    }

    pub fn owner_of(&self, name: &str) -> Result<Option<AccountId>, RegistryError> {
        Ok(self.record(name)?.map(|r| r.owner))
    }

    /// Expiry of `name`; the epoch if it was never registered.
    pub fn expiry_of(&self, name: &str) -> Result<Timestamp, RegistryError> {
        Ok(self.record(name)?.map_or(Timestamp::EPOCH, |r| r.expiry))
    }

    pub fn state_of(&self, name: &str, now: Timestamp) -> Result<LifecycleState, RegistryError> {
        let expiry = self.expiry_of(name)?;
        Ok(lifecycle_state(expiry, now, self.config.renewal_period_secs))
    }

    /// Current winning price for a Biddable name.
    pub fn auction_price(&self, name: &str, now: Timestamp) -> Result<Amount, RegistryError> {
        let id = NameId::from_name(name)?;
        let expiry = self.records.get(&id).map_or(Timestamp::EPOCH, |r| r.expiry);
        self.pricing().auction_price(id, expiry, now)
    }

    pub fn commit_timestamp(&self, hash: &CommitHash) -> Option<Timestamp> {
        self.commits.get(hash)
    }

    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<RegistryEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Shared plumbing ─────────────────────────────────────────────────

    pub(crate) fn require_not_paused(&self) -> Result<(), RegistryError> {
        if self.paused {
            return Err(RegistryError::Paused);
        }
        Ok(())
    }

    pub(crate) fn state_at(&self, record: &NameRecord, now: Timestamp) -> LifecycleState {
        record.state(now, self.config.renewal_period_secs)
    }

    /// The record for `id`, which must be Registered or Renewable.
    pub(crate) fn held_record(
        &self,
        id: NameId,
        now: Timestamp,
    ) -> Result<&NameRecord, RegistryError> {
        let record = self
            .records
            .get(&id)
            .ok_or(RegistryError::Unregistered { name: id })?;
        if !self.state_at(record, now).is_held() {
            return Err(RegistryError::Expired { name: id });
        }
        Ok(record)
    }

    pub(crate) fn existing_record(&self, id: NameId) -> Result<&NameRecord, RegistryError> {
        self.records
            .get(&id)
            .ok_or(RegistryError::Unregistered { name: id })
    }

    /// Mutable access to a record whose preconditions were already checked.
    pub(crate) fn record_mut(&mut self, id: NameId) -> Result<&mut NameRecord, RegistryError> {
        self.records
            .get_mut(&id)
            .ok_or(RegistryError::Unregistered { name: id })
    }

    pub(crate) fn emit(&mut self, event: RegistryEvent) {
        self.events.push(event);
    }

    /// Report a pending request dropped as a side effect of another call.
    pub(crate) fn emit_request_dropped(
        &mut self,
        id: NameId,
        by: AccountId,
        dropped: Option<RecoveryRequest>,
    ) {
        if dropped.is_some() {
            self.emit(RegistryEvent::CancelRecovery { id, by });
        }
    }

    /// Report a recovery address replaced as a side effect of another call.
    pub(crate) fn emit_address_replaced(
        &mut self,
        id: NameId,
        before: Option<AccountId>,
        after: Option<AccountId>,
    ) {
        if before != after {
            self.emit(RegistryEvent::ChangeRecoveryAddress { id, recovery: after });
        }
    }

    pub(crate) fn checkpoint(&self, id: Option<NameId>, commit: Option<CommitHash>) -> Checkpoint {
        Checkpoint {
            record: id.map(|id| (id, self.records.get(&id).cloned())),
            commit: commit.map(|hash| (hash, self.commits.get(&hash))),
            balance: self.balance,
            events_len: self.events.len(),
        }
    }

    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint) {
        if let Some((id, previous)) = checkpoint.record {
            match previous {
                Some(record) => {
                    self.records.insert(id, record);
                }
                None => {
                    self.records.remove(&id);
                }
            }
        }
        if let Some((hash, previous)) = checkpoint.commit {
            self.commits.restore(hash, previous);
        }
        self.balance = checkpoint.balance;
        self.events.truncate(checkpoint.events_len);
    }

    /// Retain `price` and send `refund` back to `payer`.
    ///
    /// Called after all state for the operation has been written. If the
    /// payer rejects the refund, everything since `checkpoint` is undone.
    pub(crate) fn collect(
        &mut self,
        checkpoint: Checkpoint,
        payer: AccountId,
        price: Amount,
        refund: Amount,
    ) -> Result<(), RegistryError> {
        let Some(balance) = self.balance.checked_add(price) else {
            self.rollback(checkpoint);
            return Err(RegistryError::Overflow);
        };
        self.balance = balance;
        if refund.is_zero() {
            return Ok(());
        }
        if let Err(source) = self.payments.send(&payer, refund) {
            self.rollback(checkpoint);
            return Err(RegistryError::RefundRejected { to: payer, source });
        }
        Ok(())
    }
}

/// Logs a rejected call; used as `.inspect_err(rejected("register"))`.
pub(crate) fn rejected(op: &'static str) -> impl Fn(&RegistryError) {
    move |error: &RegistryError| debug!(op, %error, kind = ?error.kind(), "call rejected")
}
