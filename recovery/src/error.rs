use moniker_types::{AccountId, Timestamp};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecoveryError {
    #[error("{caller} is not the owner")]
    NotOwner { caller: AccountId },

    #[error("{caller} is not the recovery address")]
    NotRecoveryAddress { caller: AccountId },

    #[error("{caller} is neither the owner nor the recovery address")]
    NotCustodian { caller: AccountId },

    #[error("recovery destination cannot be the null account")]
    InvalidDestination,

    #[error("no pending recovery request")]
    NoPendingRecovery,

    #[error("escrow period has not elapsed, completes at {ready_at}")]
    EscrowNotElapsed { ready_at: Timestamp },

    #[error("escrow deadline overflows the clock")]
    Overflow,
}
