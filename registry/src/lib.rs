//! Name registry engine.
//!
//! Names move through a lifecycle derived purely from their expiry and the
//! caller-supplied clock: Registrable → Registered → Renewable → Biddable.
//! Acquisition goes through commit-reveal (or, during bootstrap, a trusted
//! caller), renewal is a flat fee, and abandoned names are re-sold through a
//! decaying-premium auction. A per-record recovery sub-protocol lets a
//! trusted address reclaim a name after an escrow period.
//!
//! Every mutating call either applies in full or leaves no trace. State is
//! written before any outbound refund or withdrawal; if the receiving side
//! rejects the value, the call is rolled back.

pub mod access;
pub mod admin;
pub mod commit;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod ledger;
pub mod lifecycle;
pub mod payments;
pub mod pricing;
pub mod record;
pub mod recovery;
pub mod registry;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod testing;

pub use access::{AccessError, AccessPolicy, Role};
pub use admin::ReclaimAction;
pub use commit::CommitStore;
pub use config::{ConfigError, RegistryConfig};
pub use context::CallContext;
pub use error::{ErrorKind, RegistryError};
pub use events::RegistryEvent;
pub use ledger::Receipt;
pub use lifecycle::{lifecycle_state, LifecycleState};
pub use payments::{PaymentError, Payments};
pub use pricing::{AuctionSchedule, PricingEngine};
pub use record::NameRecord;
pub use registry::Registry;
pub use snapshot::{RegistrySnapshot, SnapshotError, SNAPSHOT_VERSION};
