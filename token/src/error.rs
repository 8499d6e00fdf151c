//! Token-specific errors.

use plenum_types::TokenAmount;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds {
        needed: TokenAmount,
        available: TokenAmount,
    },

    #[error("insufficient allowance: need {needed}, approved {approved}")]
    InsufficientAllowance {
        needed: TokenAmount,
        approved: TokenAmount,
    },

    #[error("token amount overflow")]
    Overflow,

    #[error("malformed token call data")]
    MalformedCall,
}
