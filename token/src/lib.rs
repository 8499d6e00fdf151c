//! Fungible token ledger: the collaborator holding real balances.
//!
//! The governance engine never mints or stores tokens itself. Members approve
//! the engine on a `TokenLedger`, the engine pulls deposits in and pushes
//! withdrawals out, and a confirmed proposal can drive the ledger through the
//! [`TokenCall`] byte codec.

pub mod calls;
pub mod error;
pub mod ledger;

pub use calls::TokenCall;
pub use error::TokenError;
pub use ledger::{StandardToken, TokenLedger};
