//! Per-call context supplied by the execution environment.

use moniker_types::{AccountId, Timestamp};

/// Who is calling and when.
///
/// `acting_as` is the identity every authorization check is made against.
/// `sender` is the account that attached value to the call and receives any
/// refund. They differ only when a forwarder relays a call on someone's
/// behalf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    pub sender: AccountId,
    pub acting_as: AccountId,
    pub now: Timestamp,
}

impl CallContext {
    /// A call made directly by `caller`.
    pub fn direct(caller: AccountId, now: Timestamp) -> Self {
        Self {
            sender: caller,
            acting_as: caller,
            now,
        }
    }

    /// A call relayed by `forwarder` on behalf of `acting_as`.
    pub fn forwarded(forwarder: AccountId, acting_as: AccountId, now: Timestamp) -> Self {
        Self {
            sender: forwarder,
            acting_as,
            now,
        }
    }
}
