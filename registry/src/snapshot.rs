//! Versioned snapshots of the full registry state.
//!
//! Wire format: a little-endian `u32` schema version followed by the bincode
//! encoding of that version's [`RegistrySnapshot`]. Unknown versions are
//! refused rather than guessed at.

use crate::access::AccessPolicy;
use crate::commit::CommitStore;
use crate::config::{ConfigError, RegistryConfig};
use crate::payments::Payments;
use crate::pricing::AuctionSchedule;
use crate::record::NameRecord;
use crate::registry::Registry;
use moniker_recovery::RecoveryProtocol;
use moniker_types::{AccountId, Amount, CommitHash, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub const SNAPSHOT_VERSION: u32 = 2;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    #[error("snapshot is too short to carry a version tag")]
    Truncated,

    #[error("snapshot encoding error: {0}")]
    Codec(#[from] bincode::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Everything needed to rebuild a registry except its payment backend.
///
/// The event log is not included; observers are expected to have drained it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub config: RegistryConfig,
    pub policy: AccessPolicy,
    pub records: Vec<NameRecord>,
    pub commits: Vec<(CommitHash, Timestamp)>,
    pub balance: Amount,
    pub paused: bool,
}

impl RegistrySnapshot {
    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        let mut bytes = SNAPSHOT_VERSION.to_le_bytes().to_vec();
        bytes.extend(bincode::serialize(self)?);
        Ok(bytes)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        if bytes.len() < 4 {
            return Err(SnapshotError::Truncated);
        }
        let (tag, body) = bytes.split_at(4);
        let version = u32::from_le_bytes([tag[0], tag[1], tag[2], tag[3]]);
        migrate(version, body)
    }
}

/// Decode a body written under `version` into the current layout.
fn migrate(version: u32, body: &[u8]) -> Result<RegistrySnapshot, SnapshotError> {
    match version {
        1 => Ok(bincode::deserialize::<SnapshotV1>(body)?.into()),
        2 => Ok(bincode::deserialize(body)?),
        other => Err(SnapshotError::UnsupportedVersion(other)),
    }
}

/// Version 1 layout: the configuration had no commit lifetime.
#[derive(Serialize, Deserialize)]
struct SnapshotV1 {
    config: ConfigV1,
    policy: AccessPolicy,
    records: Vec<NameRecord>,
    commits: Vec<(CommitHash, Timestamp)>,
    balance: Amount,
    paused: bool,
}

#[derive(Serialize, Deserialize)]
struct ConfigV1 {
    admin: AccountId,
    vault: AccountId,
    trusted_caller: Option<AccountId>,
    trusted_only: bool,
    fee: Amount,
    registration_period_secs: u64,
    renewal_period_secs: u64,
    reveal_delay_secs: u64,
    commit_replay_delay_secs: u64,
    escrow_period_secs: u64,
    auction: AuctionSchedule,
}

impl From<SnapshotV1> for RegistrySnapshot {
    fn from(v1: SnapshotV1) -> Self {
        let old = v1.config;
        let mut config = RegistryConfig::new(old.admin, old.vault);
        config.trusted_caller = old.trusted_caller;
        config.trusted_only = old.trusted_only;
        config.fee = old.fee;
        config.registration_period_secs = old.registration_period_secs;
        config.renewal_period_secs = old.renewal_period_secs;
        config.reveal_delay_secs = old.reveal_delay_secs;
        config.commit_replay_delay_secs = old.commit_replay_delay_secs;
        config.escrow_period_secs = old.escrow_period_secs;
        config.auction = old.auction;
        Self {
            config,
            policy: v1.policy,
            records: v1.records,
            commits: v1.commits,
            balance: v1.balance,
            paused: v1.paused,
        }
    }
}

impl<P: Payments> Registry<P> {
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            config: self.config.clone(),
            policy: self.policy.clone(),
            records: self.records.values().cloned().collect(),
            commits: self.commits.iter().map(|(h, t)| (*h, *t)).collect(),
            balance: self.balance,
            paused: self.paused,
        }
    }

    /// Rebuild a registry from `snapshot`, revalidating its configuration.
    pub fn from_snapshot(snapshot: RegistrySnapshot, payments: P) -> Result<Self, SnapshotError> {
        snapshot.config.validate()?;
        let names = snapshot.records.len();
        let records = snapshot
            .records
            .into_iter()
            .map(|record| (record.id, record))
            .collect();
        info!(
            names,
            balance = %snapshot.balance,
            "registry restored from snapshot"
        );
        Ok(Self {
            recovery: RecoveryProtocol::new(snapshot.config.escrow_period_secs),
            config: snapshot.config,
            policy: snapshot.policy,
            records,
            commits: CommitStore::from_entries(snapshot.commits),
            balance: snapshot.balance,
            paused: snapshot.paused,
            events: Vec::new(),
            payments,
        })
    }
}
