//! Nullable infrastructure for deterministic testing.
//!
//! The registry never reads a wall clock and never moves value itself: time
//! arrives in each [`moniker_registry::CallContext`] and value leaves through
//! [`moniker_registry::Payments`]. This crate provides test-friendly versions
//! of both that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Record everything for later assertions

pub mod clock;
pub mod payments;

pub use clock::NullClock;
pub use payments::NullPayments;
