//! Byte codec for token calls carried in proposal call data.

use plenum_types::{Address, TokenAmount};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;
use crate::ledger::TokenLedger;

/// A command addressed to a token ledger.
///
/// Proposals store opaque call data. Encoding a `TokenCall` as that data
/// makes the ledger a valid proposal recipient: on confirmation the bytes
/// are decoded and applied on behalf of the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenCall {
    /// Move tokens held by the caller to `to`.
    Transfer { to: Address, amount: TokenAmount },
    /// Let `spender` move up to `amount` of the caller's tokens.
    Approve {
        spender: Address,
        amount: TokenAmount,
    },
}

impl TokenCall {
    /// Encode this call for embedding in proposal call data.
    pub fn encode(&self) -> Vec<u8> {
        bincode::serialize(self).unwrap_or_default()
    }

    /// Decode call data produced by [`TokenCall::encode`].
    pub fn decode(data: &[u8]) -> Result<Self, TokenError> {
        bincode::deserialize(data).map_err(|_| TokenError::MalformedCall)
    }

    /// Apply this call against `ledger` on behalf of `caller`.
    pub fn apply(&self, ledger: &mut dyn TokenLedger, caller: &Address) -> Result<(), TokenError> {
        match self {
            TokenCall::Transfer { to, amount } => ledger.transfer(caller, to, *amount),
            TokenCall::Approve { spender, amount } => {
                ledger.approve(caller, spender, *amount);
                Ok(())
            }
        }
    }
}
