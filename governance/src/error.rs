use plenum_token::TokenError;
use plenum_types::TokenAmount;
use thiserror::Error;

use crate::proposal::ProposalId;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("only the chairperson can do that")]
    Unauthorized,

    #[error("proposal {0} not found")]
    NotFound(ProposalId),

    #[error("proposal {0} voting is not active")]
    VotingNotActive(ProposalId),

    #[error("proposal {0} voting is not ended")]
    VotingNotEnded(ProposalId),

    #[error("proposal {0} voting ended")]
    VotingEnded(ProposalId),

    #[error("no suffrage")]
    NoSuffrage,

    #[error("too few tokens on balance: need {needed}, have {available}")]
    InsufficientBalance {
        needed: TokenAmount,
        available: TokenAmount,
    },

    #[error("active voting lock: {pending} proposals still open")]
    ActiveVotingLock { pending: usize },

    #[error("token transfer failed: {0}")]
    TransferFailed(#[from] TokenError),

    #[error("amount overflow")]
    Overflow,

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("config error: {0}")]
    Config(String),
}
