//! Flat fee and decaying auction premium.
//!
//! Fixed point: all amounts and the decay factor are u128 with 18 decimals
//! ([`moniker_types::WAD`]). The premium after `k` steps is computed by `k`
//! successive [`Amount::mul_wad`] calls starting from the initial premium,
//! each rounding down, so a given schedule always yields the same sequence.
//!
//! | step k | premium (raw)              |
//! |--------|----------------------------|
//! | 0      | 1000 × 10^18               |
//! | 1      | 900 × 10^18                |
//! | 2      | 810 × 10^18                |
//! | 10     | 348_678_440_100_000_000_000|
//! | 100    | 26_561_398_887_587_473     |
//! | 381    | 3_680                      |
//! | ≥ 382  | 0                          |

use crate::error::RegistryError;
use crate::lifecycle::{lifecycle_state, LifecycleState};
use moniker_types::{Amount, NameId, Timestamp, WAD};
use serde::{Deserialize, Serialize};

/// Upper bound on [`AuctionSchedule::step_count`]; each price query walks
/// up to this many steps.
pub const MAX_AUCTION_STEPS: u32 = 100_000;

/// Parameters of the re-acquisition auction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionSchedule {
    /// Premium at the moment the name becomes biddable.
    #[serde(default = "default_start_premium")]
    pub start_premium: Amount,

    /// Multiplier applied per step, as a fraction below one whole unit
    /// (`"0.9"` in configuration).
    #[serde(default = "default_decay_factor")]
    pub decay_factor: Amount,

    /// Length of one decay step in seconds.
    #[serde(default = "default_step_secs")]
    pub step_secs: u64,

    /// Number of decay steps; from this step on the premium is zero.
    #[serde(default = "default_step_count")]
    pub step_count: u32,
}

fn default_start_premium() -> Amount {
    Amount::new(1_000 * WAD)
}

fn default_decay_factor() -> Amount {
    Amount::new(9 * WAD / 10)
}

fn default_step_secs() -> u64 {
    8 * 3_600
}

fn default_step_count() -> u32 {
    382
}

impl Default for AuctionSchedule {
    fn default() -> Self {
        Self {
            start_premium: default_start_premium(),
            decay_factor: default_decay_factor(),
            step_secs: default_step_secs(),
            step_count: default_step_count(),
        }
    }
}

impl AuctionSchedule {
    /// Premium after `steps` whole decay steps.
    pub fn premium_after_steps(&self, steps: u64) -> Result<Amount, RegistryError> {
        if steps >= u64::from(self.step_count) {
            return Ok(Amount::ZERO);
        }
        let mut premium = self.start_premium;
        for _ in 0..steps {
            if premium.is_zero() {
                break;
            }
            premium = premium
                .mul_wad(self.decay_factor.raw())
                .ok_or(RegistryError::Overflow)?;
        }
        Ok(premium)
    }

    /// Premium `elapsed_secs` after the auction opened.
    pub fn premium_at(&self, elapsed_secs: u64) -> Result<Amount, RegistryError> {
        if self.step_secs == 0 {
            return Err(RegistryError::Overflow);
        }
        self.premium_after_steps(elapsed_secs / self.step_secs)
    }

    /// Seconds from auction start until the premium reaches zero.
    pub fn decay_window_secs(&self) -> Option<u64> {
        self.step_secs.checked_mul(u64::from(self.step_count))
    }
}

/// Prices every paid operation.
#[derive(Clone, Debug)]
pub struct PricingEngine {
    fee: Amount,
    renewal_period_secs: u64,
    schedule: AuctionSchedule,
}

impl PricingEngine {
    pub fn new(fee: Amount, renewal_period_secs: u64, schedule: AuctionSchedule) -> Self {
        Self {
            fee,
            renewal_period_secs,
            schedule,
        }
    }

    /// The flat periodic fee charged by register, renew, and the tail of bid.
    pub fn flat_fee(&self) -> Amount {
        self.fee
    }

    pub fn schedule(&self) -> &AuctionSchedule {
        &self.schedule
    }

    /// When a name with `expiry` becomes biddable.
    pub fn auction_start(&self, expiry: Timestamp) -> Result<Timestamp, RegistryError> {
        expiry
            .checked_add_secs(self.renewal_period_secs)
            .ok_or(RegistryError::Overflow)
    }

    /// Total price (`premium + fee`) to win `name` at `now`.
    ///
    /// Fails with [`RegistryError::NotBiddable`] unless the name is Biddable.
    pub fn auction_price(
        &self,
        name: NameId,
        expiry: Timestamp,
        now: Timestamp,
    ) -> Result<Amount, RegistryError> {
        let state = lifecycle_state(expiry, now, self.renewal_period_secs);
        if state != LifecycleState::Biddable {
            return Err(RegistryError::NotBiddable { name, state });
        }
        let elapsed = now.as_secs() - self.auction_start(expiry)?.as_secs();
        self.schedule
            .premium_at(elapsed)?
            .checked_add(self.fee)
            .ok_or(RegistryError::Overflow)
    }

    /// Check `paid` covers `price` and return the overpayment to refund.
    pub fn settle(&self, price: Amount, paid: Amount) -> Result<Amount, RegistryError> {
        paid.checked_sub(price)
            .ok_or(RegistryError::InsufficientFunds { price, paid })
    }
}
