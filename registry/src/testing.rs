//! Shared fixtures for unit tests.

use crate::config::RegistryConfig;
use crate::context::CallContext;
use crate::payments::{PaymentError, Payments};
use crate::registry::Registry;
use moniker_crypto::{commit_hash, Secret};
use moniker_types::{AccountId, Amount, Timestamp, WAD};
use std::collections::BTreeSet;

pub const ADMIN: AccountId = AccountId::new([0xad; 20]);
pub const VAULT: AccountId = AccountId::new([0xfa; 20]);
pub const TRUSTED: AccountId = AccountId::new([0x7c; 20]);
pub const SECRET: Secret = [0x5e; 32];
pub const T0: u64 = 1_700_000_000;
pub const FEE: Amount = Amount::new(WAD / 100);

pub fn account(n: u8) -> AccountId {
    AccountId::new([n; 20])
}

pub fn at(secs: u64) -> CallContext {
    CallContext::direct(account(1), Timestamp::new(secs))
}

pub fn as_caller(who: AccountId, secs: u64) -> CallContext {
    CallContext::direct(who, Timestamp::new(secs))
}

/// Records every transfer; refuses anything sent to a blocked account.
#[derive(Debug, Default)]
pub struct RecordingPayments {
    pub sent: Vec<(AccountId, Amount)>,
    pub blocked: BTreeSet<AccountId>,
}

impl Payments for RecordingPayments {
    fn send(&mut self, to: &AccountId, amount: Amount) -> Result<(), PaymentError> {
        if self.blocked.contains(to) {
            return Err(PaymentError::Rejected(*to));
        }
        self.sent.push((*to, amount));
        Ok(())
    }
}

/// A registry out of bootstrap with default pricing.
pub fn fixture() -> Registry<RecordingPayments> {
    let mut config = RegistryConfig::new(ADMIN, VAULT);
    config.trusted_caller = Some(TRUSTED);
    config.trusted_only = false;
    Registry::new(config, RecordingPayments::default()).unwrap()
}

/// A registry still in bootstrap.
pub fn bootstrap_fixture() -> Registry<RecordingPayments> {
    let mut config = RegistryConfig::new(ADMIN, VAULT);
    config.trusted_caller = Some(TRUSTED);
    Registry::new(config, RecordingPayments::default()).unwrap()
}

/// Commit at `T0` and register `name` to `owner` once the commit matures.
/// Returns the registration time.
pub fn register(
    registry: &mut Registry<RecordingPayments>,
    name: &str,
    owner: AccountId,
    recovery: Option<AccountId>,
) -> u64 {
    let hash = commit_hash(name, &owner, &SECRET, recovery.as_ref());
    registry.make_commit(&at(T0), hash).unwrap();
    let now = T0 + registry.config().reveal_delay_secs;
    registry
        .register(&at(now), name, owner, &SECRET, recovery, FEE)
        .unwrap();
    now
}
