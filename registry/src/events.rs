//! Notifications for off-chain observers.
//!
//! Every successful state transition appends one or more events. Events from
//! a call that fails are discarded along with its state changes.

use crate::access::Role;
use moniker_types::{AccountId, Amount, NameId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RegistryEvent {
    /// Ownership changed. `from` is `None` on first acquisition.
    Transfer {
        id: NameId,
        from: Option<AccountId>,
        to: AccountId,
        expiry: Timestamp,
    },
    Renew {
        id: NameId,
        expiry: Timestamp,
    },
    Approval {
        id: NameId,
        owner: AccountId,
        approved: Option<AccountId>,
    },
    ChangeRecoveryAddress {
        id: NameId,
        recovery: Option<AccountId>,
    },
    RequestRecovery {
        id: NameId,
        from: AccountId,
        to: AccountId,
    },
    CancelRecovery {
        id: NameId,
        by: AccountId,
    },
    ChangeTrustedCaller {
        trusted_caller: AccountId,
    },
    DisableTrustedOnly,
    ChangeFee {
        fee: Amount,
    },
    ChangeVault {
        vault: AccountId,
    },
    Withdraw {
        to: AccountId,
        amount: Amount,
    },
    Paused {
        by: AccountId,
    },
    Unpaused {
        by: AccountId,
    },
    RoleGranted {
        role: Role,
        account: AccountId,
    },
    RoleRevoked {
        role: Role,
        account: AccountId,
    },
}

impl RegistryEvent {
    /// The name this event concerns, if any.
    pub fn name_id(&self) -> Option<NameId> {
        match self {
            Self::Transfer { id, .. }
            | Self::Renew { id, .. }
            | Self::Approval { id, .. }
            | Self::ChangeRecoveryAddress { id, .. }
            | Self::RequestRecovery { id, .. }
            | Self::CancelRecovery { id, .. } => Some(*id),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
