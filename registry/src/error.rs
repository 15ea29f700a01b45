//! Registry errors.

use crate::access::AccessError;
use crate::lifecycle::LifecycleState;
use crate::payments::PaymentError;
use moniker_recovery::RecoveryError;
use moniker_types::{AccountId, Amount, MonikerError, NameId, Timestamp};
use thiserror::Error;

/// Broad class of a failure, so clients can decide whether resubmitting
/// makes sense (wait out escrow, re-commit, top up payment).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    State,
    Authorization,
    Funds,
    Recovery,
    Arithmetic,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    // ── Validation ──────────────────────────────────────────────────────
    #[error(transparent)]
    InvalidName(#[from] MonikerError),

    #[error("no matured commit matches these registration parameters")]
    InvalidCommit,

    #[error("commit was made too recently to be replaced, retry at {retry_at}")]
    CommitReplay { retry_at: Timestamp },

    #[error("{role} cannot be the null account")]
    NullAccount { role: &'static str },

    // ── State ───────────────────────────────────────────────────────────
    #[error("{name} is already registered ({state:?})")]
    NotRegistrable { name: NameId, state: LifecycleState },

    #[error("{name} has never been registered")]
    Unregistered { name: NameId },

    #[error("{name} has expired")]
    Expired { name: NameId },

    #[error("{name} is not renewable ({state:?})")]
    NotRenewable { name: NameId, state: LifecycleState },

    #[error("{name} is not up for auction ({state:?})")]
    NotBiddable { name: NameId, state: LifecycleState },

    // ── Authorization ───────────────────────────────────────────────────
    #[error("{caller} is not authorized to act on {name}")]
    Unauthorized { caller: AccountId, name: NameId },

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("registration is restricted to the trusted caller during bootstrap")]
    BootstrapActive,

    #[error("bootstrap phase is over")]
    BootstrapInactive,

    #[error("{caller} is not the trusted caller")]
    NotTrustedCaller { caller: AccountId },

    #[error("registry is paused")]
    Paused,

    // ── Funds ───────────────────────────────────────────────────────────
    #[error("insufficient funds: price {price}, paid {paid}")]
    InsufficientFunds { price: Amount, paid: Amount },

    #[error("insufficient registry balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: Amount, available: Amount },

    #[error("refund to {to} rejected: {source}")]
    RefundRejected { to: AccountId, source: PaymentError },

    #[error("withdrawal to {to} rejected: {source}")]
    WithdrawalRejected { to: AccountId, source: PaymentError },

    // ── Recovery ────────────────────────────────────────────────────────
    #[error(transparent)]
    Recovery(#[from] RecoveryError),

    // ── Arithmetic ──────────────────────────────────────────────────────
    #[error("arithmetic overflow")]
    Overflow,
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidName(_)
            | Self::InvalidCommit
            | Self::CommitReplay { .. }
            | Self::NullAccount { .. } => ErrorKind::Validation,
            Self::NotRegistrable { .. }
            | Self::Unregistered { .. }
            | Self::Expired { .. }
            | Self::NotRenewable { .. }
            | Self::NotBiddable { .. } => ErrorKind::State,
            Self::Unauthorized { .. }
            | Self::Access(_)
            | Self::BootstrapActive
            | Self::BootstrapInactive
            | Self::NotTrustedCaller { .. }
            | Self::Paused => ErrorKind::Authorization,
            Self::InsufficientFunds { .. }
            | Self::InsufficientBalance { .. }
            | Self::RefundRejected { .. }
            | Self::WithdrawalRejected { .. } => ErrorKind::Funds,
            Self::Recovery(e) => match e {
                RecoveryError::NotOwner { .. }
                | RecoveryError::NotRecoveryAddress { .. }
                | RecoveryError::NotCustodian { .. } => ErrorKind::Authorization,
                RecoveryError::InvalidDestination => ErrorKind::Validation,
                RecoveryError::NoPendingRecovery | RecoveryError::EscrowNotElapsed { .. } => {
                    ErrorKind::Recovery
                }
                RecoveryError::Overflow => ErrorKind::Arithmetic,
            },
            Self::Overflow => ErrorKind::Arithmetic,
        }
    }
}
