//! Value amounts.
//!
//! Amounts are fixed-point integers (u128) with 18 decimal places to avoid
//! floating-point errors. The smallest unit is 1 raw; one whole unit is
//! [`WAD`] raw. The same representation is used for fractional factors such
//! as the auction decay, so every multiplication goes through [`Amount::mul_wad`].

use crate::error::MonikerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Raw units per whole unit (10^18).
pub const WAD: u128 = 1_000_000_000_000_000_000;

const DECIMALS: usize = 18;

/// A value amount in raw units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Whole units, e.g. `Amount::units(1000)` is 1000 × 10^18 raw.
    pub fn units(whole: u128) -> Option<Self> {
        whole.checked_mul(WAD).map(Self)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Multiply by a WAD-scaled factor, rounding down: `floor(self × factor / WAD)`.
    ///
    /// Split as `(a / WAD) × f + (a mod WAD) × f / WAD` so the intermediate
    /// product stays inside u128 for any factor up to `WAD`. Returns `None`
    /// on overflow.
    pub fn mul_wad(self, factor: u128) -> Option<Self> {
        let whole = (self.0 / WAD).checked_mul(factor)?;
        let frac = (self.0 % WAD).checked_mul(factor)? / WAD;
        whole.checked_add(frac).map(Self)
    }

    /// Parse a decimal literal such as `"1000"`, `"0.01"` or `"0.9"`.
    pub fn parse_decimal(s: &str) -> Result<Self, MonikerError> {
        let invalid = || MonikerError::InvalidAmount(s.to_string());
        let trimmed = s.trim();
        let (whole, frac) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if frac.len() > DECIMALS {
            return Err(invalid());
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || !all_digits(frac) {
            return Err(invalid());
        }
        let whole_raw = if whole.is_empty() {
            0
        } else {
            whole.parse::<u128>().map_err(|_| invalid())?
        };
        let frac_raw = if frac.is_empty() {
            0
        } else {
            let padded = format!("{frac:0<width$}", width = DECIMALS);
            padded.parse::<u128>().map_err(|_| invalid())?
        };
        whole_raw
            .checked_mul(WAD)
            .and_then(|w| w.checked_add(frac_raw))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / WAD;
        let frac = self.0 % WAD;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{frac:0>width$}", width = DECIMALS);
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

impl FromStr for Amount {
    type Err = MonikerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_decimal(s)
    }
}

// Human-readable formats carry amounts as decimal strings (`fee = "0.01"`):
// TOML integers are 64-bit and JSON numbers lose precision past 2^53.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        if s.is_human_readable() {
            s.collect_str(self)
        } else {
            self.0.serialize(s)
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        if d.is_human_readable() {
            let raw = String::deserialize(d)?;
            Self::parse_decimal(&raw).map_err(serde::de::Error::custom)
        } else {
            u128::deserialize(d).map(Self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_whole_and_fraction() {
        assert_eq!(Amount::parse_decimal("1000").unwrap().raw(), 1000 * WAD);
        assert_eq!(Amount::parse_decimal("0.01").unwrap().raw(), WAD / 100);
        assert_eq!(Amount::parse_decimal("0.9").unwrap().raw(), 9 * WAD / 10);
        assert_eq!(Amount::parse_decimal(".5").unwrap().raw(), WAD / 2);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Amount::parse_decimal("").is_err());
        assert!(Amount::parse_decimal(".").is_err());
        assert!(Amount::parse_decimal("1.2.3").is_err());
        assert!(Amount::parse_decimal("-1").is_err());
        assert!(Amount::parse_decimal("0.0000000000000000001").is_err());
    }

    #[test]
    fn display_trims_trailing_zeros() {
        assert_eq!(Amount::new(1000 * WAD + WAD / 100).to_string(), "1000.01");
        assert_eq!(Amount::new(900 * WAD).to_string(), "900");
        assert_eq!(Amount::new(1).to_string(), "0.000000000000000001");
    }

    #[test]
    fn mul_wad_exact_for_decimal_factors() {
        let premium = Amount::units(1000).unwrap();
        let decayed = premium.mul_wad(9 * WAD / 10).unwrap();
        assert_eq!(decayed, Amount::units(900).unwrap());
    }

    #[test]
    fn mul_wad_large_values_do_not_overflow() {
        let big = Amount::new(u128::MAX / 2);
        assert_eq!(big.mul_wad(WAD), Some(big));
        assert_eq!(Amount::new(u128::MAX).mul_wad(2 * WAD), None);
    }

    #[test]
    fn mul_wad_rounds_down() {
        assert_eq!(Amount::new(3).mul_wad(WAD / 2), Some(Amount::new(1)));
    }

    #[test]
    fn checked_arithmetic() {
        assert_eq!(Amount::new(1).checked_sub(Amount::new(2)), None);
        assert_eq!(Amount::new(u128::MAX).checked_add(Amount::new(1)), None);
        assert_eq!(Amount::new(5).saturating_sub(Amount::new(9)), Amount::ZERO);
    }
}
