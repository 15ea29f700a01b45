//! Registry configuration with TOML file support.

use crate::pricing::{AuctionSchedule, MAX_AUCTION_STEPS};
use moniker_types::{AccountId, Amount, WAD};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for a registry instance.
///
/// Can be loaded from a TOML file via [`RegistryConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Amounts are decimal strings and
/// accounts are `0x`-prefixed hex.
///
/// ```toml
/// admin = "0x0101010101010101010101010101010101010101"
/// vault = "0x0202020202020202020202020202020202020202"
/// trusted_caller = "0x0303030303030303030303030303030303030303"
/// fee = "0.01"
///
/// [auction]
/// start_premium = "1000"
/// decay_factor = "0.9"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Initial holder of the admin role.
    pub admin: AccountId,

    /// Receives withdrawn funds.
    pub vault: AccountId,

    /// The only account allowed to acquire names while bootstrap is active.
    #[serde(default)]
    pub trusted_caller: Option<AccountId>,

    /// Bootstrap flag. Once cleared it can never be set again.
    #[serde(default = "default_true")]
    pub trusted_only: bool,

    /// Flat fee for register, renew, and the post-decay auction.
    #[serde(default = "default_fee")]
    pub fee: Amount,

    /// Length of a registration or renewal term.
    #[serde(default = "default_registration_period")]
    pub registration_period_secs: u64,

    /// Grace period after expiry during which only renewal is possible.
    #[serde(default = "default_renewal_period")]
    pub renewal_period_secs: u64,

    /// Minimum commit age before it can be revealed.
    #[serde(default = "default_reveal_delay")]
    pub reveal_delay_secs: u64,

    /// Minimum commit age before the same hash can be committed again.
    #[serde(default = "default_commit_replay_delay")]
    pub commit_replay_delay_secs: u64,

    /// Wait between a recovery request and its completion.
    #[serde(default = "default_escrow_period")]
    pub escrow_period_secs: u64,

    /// Age at which an unrevealed commit lapses and is pruned.
    #[serde(default = "default_commit_lifetime")]
    pub commit_lifetime_secs: u64,

    #[serde(default)]
    pub auction: AuctionSchedule,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_true() -> bool {
    true
}

fn default_fee() -> Amount {
    Amount::new(WAD / 100)
}

fn default_registration_period() -> u64 {
    365 * 86_400
}

fn default_renewal_period() -> u64 {
    30 * 86_400
}

fn default_reveal_delay() -> u64 {
    60
}

fn default_commit_replay_delay() -> u64 {
    10 * 60
}

fn default_escrow_period() -> u64 {
    3 * 86_400
}

fn default_commit_lifetime() -> u64 {
    7 * 86_400
}

impl RegistryConfig {
    /// Defaults for everything except the accounts.
    pub fn new(admin: AccountId, vault: AccountId) -> Self {
        Self {
            admin,
            vault,
            trusted_caller: None,
            trusted_only: default_true(),
            fee: default_fee(),
            registration_period_secs: default_registration_period(),
            renewal_period_secs: default_renewal_period(),
            reveal_delay_secs: default_reveal_delay(),
            commit_replay_delay_secs: default_commit_replay_delay(),
            escrow_period_secs: default_escrow_period(),
            commit_lifetime_secs: default_commit_lifetime(),
            auction: AuctionSchedule::default(),
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Reject configurations that would make pricing or time arithmetic
    /// meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin.is_zero() {
            return Err(ConfigError::Invalid("admin cannot be the null account".into()));
        }
        if self.vault.is_zero() {
            return Err(ConfigError::Invalid("vault cannot be the null account".into()));
        }
        if self.registration_period_secs == 0 {
            return Err(ConfigError::Invalid(
                "registration_period_secs must be positive".into(),
            ));
        }
        if self.auction.step_secs == 0 {
            return Err(ConfigError::Invalid("auction.step_secs must be positive".into()));
        }
        if self.auction.step_count > MAX_AUCTION_STEPS {
            return Err(ConfigError::Invalid(format!(
                "auction.step_count must be at most {MAX_AUCTION_STEPS}, got {}",
                self.auction.step_count
            )));
        }
        if self.commit_lifetime_secs <= self.reveal_delay_secs
            || self.commit_lifetime_secs < self.commit_replay_delay_secs
        {
            return Err(ConfigError::Invalid(
                "commit_lifetime_secs must exceed reveal_delay_secs and cover commit_replay_delay_secs"
                    .into(),
            ));
        }
        if self.auction.decay_factor.raw() >= WAD {
            return Err(ConfigError::Invalid(format!(
                "auction.decay_factor must be below 1, got {}",
                self.auction.decay_factor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
        admin = "0x0101010101010101010101010101010101010101"
        vault = "0x0202020202020202020202020202020202020202"
    "#;

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = RegistryConfig::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.admin, AccountId::new([1; 20]));
        assert!(config.trusted_only);
        assert_eq!(config.trusted_caller, None);
        assert_eq!(config.fee, Amount::parse_decimal("0.01").unwrap());
        assert_eq!(config.registration_period_secs, 365 * 86_400);
        assert_eq!(config.renewal_period_secs, 30 * 86_400);
        assert_eq!(config.reveal_delay_secs, 60);
        assert_eq!(config.commit_replay_delay_secs, 600);
        assert_eq!(config.escrow_period_secs, 3 * 86_400);
        assert_eq!(config.auction, AuctionSchedule::default());
        assert_eq!(config.commit_lifetime_secs, 7 * 86_400);
    }

    #[test]
    fn full_toml_overrides() {
        let raw = r#"
            admin = "0x0101010101010101010101010101010101010101"
            vault = "0x0202020202020202020202020202020202020202"
            trusted_caller = "0x0303030303030303030303030303030303030303"
            trusted_only = false
            fee = "0.5"
            escrow_period_secs = 10

            [auction]
            start_premium = "100"
            decay_factor = "0.5"
            step_secs = 90000
            step_count = 24
        "#;
        let config = RegistryConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.trusted_caller, Some(AccountId::new([3; 20])));
        assert!(!config.trusted_only);
        assert_eq!(config.fee, Amount::new(WAD / 2));
        assert_eq!(config.escrow_period_secs, 10);
        assert_eq!(config.auction.decay_factor, Amount::new(WAD / 2));
        assert_eq!(config.auction.step_count, 24);
    }

    #[test]
    fn decay_of_one_rejected() {
        let raw = format!("{MINIMAL}\n[auction]\ndecay_factor = \"1\"\n");
        assert!(matches!(
            RegistryConfig::from_toml_str(&raw),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn oversized_auction_rejected() {
        let raw = format!("{MINIMAL}\n[auction]\nstep_count = 4294967295\n");
        assert!(matches!(
            RegistryConfig::from_toml_str(&raw),
            Err(ConfigError::Invalid(_))
        ));
        let raw = format!("{MINIMAL}\n[auction]\nstep_count = {MAX_AUCTION_STEPS}\n");
        assert!(RegistryConfig::from_toml_str(&raw).is_ok());
    }

    #[test]
    fn commit_lifetime_must_outlast_reveal_delay() {
        let raw = format!("{MINIMAL}\ncommit_lifetime_secs = 60\n");
        assert!(matches!(
            RegistryConfig::from_toml_str(&raw),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn null_vault_rejected() {
        let raw = r#"
            admin = "0x0101010101010101010101010101010101010101"
            vault = "0x0000000000000000000000000000000000000000"
        "#;
        assert!(matches!(
            RegistryConfig::from_toml_str(raw),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn bad_amount_literal_is_parse_error() {
        let raw = format!("{MINIMAL}\nfee = \"ten\"\n");
        assert!(matches!(
            RegistryConfig::from_toml_str(&raw),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let config = RegistryConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.vault, AccountId::new([2; 20]));
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = RegistryConfig::new(AccountId::new([1; 20]), AccountId::new([2; 20]));
        config.trusted_caller = Some(AccountId::new([3; 20]));
        let rendered = toml::to_string(&config).unwrap();
        assert_eq!(RegistryConfig::from_toml_str(&rendered).unwrap(), config);
    }
}
