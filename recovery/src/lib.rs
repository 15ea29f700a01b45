//! Escrowed social recovery.
//!
//! An owner names a recovery address. That address may request a move of
//! the record to any non-null destination; the move can only be completed
//! once the escrow period has passed, and the owner (or the recovery
//! address itself) may cancel at any point before then.
//!
//! The protocol holds no records of its own. It validates and mutates a
//! [`RecoveryState`] embedded in whatever the host registry stores, and
//! takes the record's current owner as an argument, so the name registry and
//! the numeric identity registry run the same code.

pub mod error;
pub mod protocol;
pub mod state;

pub use error::RecoveryError;
pub use protocol::RecoveryProtocol;
pub use state::{RecoveryPhase, RecoveryRequest, RecoveryState};
