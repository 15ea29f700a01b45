//! Names and their identifiers.
//!
//! A name is 1 to [`MAX_NAME_LEN`] bytes drawn from `[a-z0-9-]`. Its
//! [`NameId`] is the name's bytes left-aligned in 32 zero-padded bytes, so
//! the id is derived deterministically and can be turned back into the name.

use crate::error::MonikerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Longest name accepted, in bytes.
pub const MAX_NAME_LEN: usize = 16;

/// Check the charset and length rule.
pub fn validate_name(name: &str) -> Result<(), MonikerError> {
    let invalid = |reason| MonikerError::InvalidName {
        name: name.to_string(),
        reason,
    };
    if name.is_empty() {
        return Err(invalid("empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(invalid("longer than 16 bytes"));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        return Err(invalid("only a-z, 0-9 and '-' are allowed"));
    }
    Ok(())
}

/// Identifier of a name record.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameId([u8; 32]);

impl NameId {
    /// Validate `name` and derive its id.
    pub fn from_name(name: &str) -> Result<Self, MonikerError> {
        validate_name(name)?;
        let mut bytes = [0u8; 32];
        bytes[..name.len()].copy_from_slice(name.as_bytes());
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Recover the name this id was derived from.
    pub fn to_name(&self) -> String {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(self.0.len());
        String::from_utf8_lossy(&self.0[..end]).into_owned()
    }
}

impl fmt::Debug for NameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameId({})", self.to_name())
    }
}

impl fmt::Display for NameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_name())
    }
}

impl Serialize for NameId {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        if s.is_human_readable() {
            s.serialize_str(&self.to_name())
        } else {
            self.0.serialize(s)
        }
    }
}

impl<'de> Deserialize<'de> for NameId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        if d.is_human_readable() {
            let raw = String::deserialize(d)?;
            Self::from_name(&raw).map_err(serde::de::Error::custom)
        } else {
            <[u8; 32]>::deserialize(d).map(Self)
        }
    }
}
