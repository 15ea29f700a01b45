//! Commit store: the anti-front-running buffer.
//!
//! A commit records when an opaque hash was first seen. It can be used by
//! `register` once it is at least `reveal_delay` old, and cannot be
//! overwritten until it is at least `replay_delay` old. Consumption removes
//! the entry. A commit that reaches `lifetime` unrevealed has lapsed: it can
//! no longer be used and is dropped by the next [`CommitStore::prune`].

use crate::error::RegistryError;
use moniker_types::{CommitHash, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStore {
    commits: BTreeMap<CommitHash, Timestamp>,
}

impl CommitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `hash` at `now`.
    ///
    /// Fails with [`RegistryError::CommitReplay`] while an unconsumed commit
    /// for the same hash is younger than `replay_delay_secs`.
    pub fn make(
        &mut self,
        hash: CommitHash,
        now: Timestamp,
        replay_delay_secs: u64,
    ) -> Result<(), RegistryError> {
        if let Some(made_at) = self.commits.get(&hash) {
            let retry_at = made_at.saturating_add_secs(replay_delay_secs);
            if now < retry_at {
                return Err(RegistryError::CommitReplay { retry_at });
            }
        }
        self.commits.insert(hash, now);
        Ok(())
    }

    /// Check that `hash` exists, has matured, and has not lapsed, without
    /// consuming it.
    pub fn check(
        &self,
        hash: &CommitHash,
        now: Timestamp,
        reveal_delay_secs: u64,
        lifetime_secs: u64,
    ) -> Result<Timestamp, RegistryError> {
        let made_at = *self.commits.get(hash).ok_or(RegistryError::InvalidCommit)?;
        let matured_at = made_at
            .checked_add_secs(reveal_delay_secs)
            .ok_or(RegistryError::InvalidCommit)?;
        if now < matured_at || is_lapsed(made_at, now, lifetime_secs) {
            return Err(RegistryError::InvalidCommit);
        }
        Ok(made_at)
    }

    /// Check and remove `hash`.
    pub fn consume(
        &mut self,
        hash: &CommitHash,
        now: Timestamp,
        reveal_delay_secs: u64,
        lifetime_secs: u64,
    ) -> Result<Timestamp, RegistryError> {
        let made_at = self.check(hash, now, reveal_delay_secs, lifetime_secs)?;
        self.commits.remove(hash);
        Ok(made_at)
    }

    /// Drop every commit that has lapsed by `now`. Returns how many went.
    pub fn prune(&mut self, now: Timestamp, lifetime_secs: u64) -> usize {
        let before = self.commits.len();
        self.commits
            .retain(|_, made_at| !is_lapsed(*made_at, now, lifetime_secs));
        before - self.commits.len()
    }

    pub fn get(&self, hash: &CommitHash) -> Option<Timestamp> {
        self.commits.get(hash).copied()
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Put an entry back to exactly `previous` (used by rollback).
    pub(crate) fn restore(&mut self, hash: CommitHash, previous: Option<Timestamp>) {
        match previous {
            Some(made_at) => {
                self.commits.insert(hash, made_at);
            }
            None => {
                self.commits.remove(&hash);
            }
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&CommitHash, &Timestamp)> {
        self.commits.iter()
    }

    pub(crate) fn from_entries(entries: impl IntoIterator<Item = (CommitHash, Timestamp)>) -> Self {
        Self {
            commits: entries.into_iter().collect(),
        }
    }
}

fn is_lapsed(made_at: Timestamp, now: Timestamp, lifetime_secs: u64) -> bool {
    now >= made_at.saturating_add_secs(lifetime_secs)
}
