//! Errors raised while constructing the shared types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonikerError {
    #[error("invalid account id: {0}")]
    InvalidAccount(String),

    #[error("invalid amount literal: {0}")]
    InvalidAmount(String),

    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },
}
