//! Outbound value transfers (refunds and withdrawals).

use moniker_types::{AccountId, Amount};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("receiver {0} rejected the transfer")]
    Rejected(AccountId),

    #[error("{0}")]
    Other(String),
}

/// Sends value out of the registry.
///
/// The registry calls this only after every state change of the current
/// operation has been written. An `Err` aborts the operation and the
/// registry restores its pre-call state.
pub trait Payments {
    fn send(&mut self, to: &AccountId, amount: Amount) -> Result<(), PaymentError>;
}
