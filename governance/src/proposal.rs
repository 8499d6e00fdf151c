//! Governance proposals and their permanent registry.

use plenum_types::{Address, Timestamp, TokenAmount};
use serde::{Deserialize, Serialize};

/// Sequential proposal identifier. Dense from zero, never reused.
pub type ProposalId = u64;

/// Terminal status of a finished proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishedProposalStatus {
    /// Quorum was reached but the against side won or tied.
    Rejected,
    /// Total collected weight fell short of the minimum quorum.
    RejectedTooFewQuorum,
    /// Confirmed, and the recipient call did not revert.
    ///
    /// "Did not revert" includes dispatch to a recipient nobody claims,
    /// matching a call to an account with no code behind it.
    ConfirmedCallSucceeded,
    /// Confirmed, but the recipient call reverted.
    ConfirmedCallFailed,
}

/// A proposal put to vote.
///
/// Records are permanent: finalization flips `is_active` and freezes the
/// tallies, it never removes the entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    /// Accumulated weight in favor.
    pub votes_for: TokenAmount,
    /// Accumulated weight against.
    pub votes_against: TokenAmount,
    /// Voting closes strictly after this moment; finalization opens there too.
    pub deadline: Timestamp,
    /// Where the confirmed call is dispatched.
    pub recipient: Address,
    /// True from creation until the single finalization.
    pub is_active: bool,
    /// Opaque call payload, stored verbatim.
    pub call_data: Vec<u8>,
    /// Human-readable purpose.
    pub description: String,
}

impl Proposal {
    /// Total weight collected so far. `None` when the sum overflows.
    pub fn total_votes(&self) -> Option<TokenAmount> {
        self.votes_for.checked_add(self.votes_against)
    }
}

/// Append-only proposal history with monotonic ids.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProposalRegistry {
    proposals: Vec<Proposal>,
}

impl ProposalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from persisted proposals, assumed to be in id order.
    pub fn from_proposals(proposals: Vec<Proposal>) -> Self {
        Self { proposals }
    }

    /// Append a new active proposal and assign it the next id.
    pub fn add(
        &mut self,
        recipient: Address,
        call_data: Vec<u8>,
        description: String,
        deadline: Timestamp,
    ) -> &Proposal {
        let id = self.proposals.len() as ProposalId;
        self.proposals.push(Proposal {
            id,
            votes_for: TokenAmount::ZERO,
            votes_against: TokenAmount::ZERO,
            deadline,
            recipient,
            is_active: true,
            call_data,
            description,
        });
        &self.proposals[id as usize]
    }

    pub fn get(&self, id: ProposalId) -> Option<&Proposal> {
        self.proposals.get(id as usize)
    }

    pub fn get_mut(&mut self, id: ProposalId) -> Option<&mut Proposal> {
        self.proposals.get_mut(id as usize)
    }

    /// Number of proposals ever created.
    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    /// All proposals in id order, finished ones included.
    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.iter()
    }
}
