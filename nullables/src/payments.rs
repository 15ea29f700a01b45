//! Nullable payments — record transfers instead of moving value.

use moniker_registry::{PaymentError, Payments};
use moniker_types::{AccountId, Amount};
use std::collections::BTreeSet;

/// A payment backend that records every transfer.
///
/// Accounts passed to [`NullPayments::reject`] refuse anything sent to
/// them, which lets tests drive the registry's rollback path.
#[derive(Debug, Default)]
pub struct NullPayments {
    sent: Vec<(AccountId, Amount)>,
    rejecting: BTreeSet<AccountId>,
}

impl NullPayments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `account` refuse incoming transfers.
    pub fn reject(&mut self, account: AccountId) {
        self.rejecting.insert(account);
    }

    /// Let `account` receive transfers again.
    pub fn accept(&mut self, account: AccountId) {
        self.rejecting.remove(&account);
    }

    /// All transfers that went through, in order.
    pub fn sent(&self) -> &[(AccountId, Amount)] {
        &self.sent
    }

    /// Transfers received by `account`.
    pub fn sent_to(&self, account: &AccountId) -> Vec<Amount> {
        self.sent
            .iter()
            .filter(|(to, _)| to == account)
            .map(|(_, amount)| *amount)
            .collect()
    }

    /// Sum of every transfer that went through.
    pub fn total(&self) -> Amount {
        self.sent
            .iter()
            .fold(Amount::ZERO, |acc, (_, amount)| acc.saturating_add(*amount))
    }

    /// Clear all state.
    pub fn reset(&mut self) {
        self.sent.clear();
        self.rejecting.clear();
    }
}

impl Payments for NullPayments {
    fn send(&mut self, to: &AccountId, amount: Amount) -> Result<(), PaymentError> {
        if self.rejecting.contains(to) {
            return Err(PaymentError::Rejected(*to));
        }
        self.sent.push((*to, amount));
        Ok(())
    }
}
