//! Fundamental types for the Plenum governance engine.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, token amounts, and timestamps.

pub mod address;
pub mod amount;
pub mod time;

pub use address::Address;
pub use amount::TokenAmount;
pub use time::Timestamp;
