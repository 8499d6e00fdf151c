//! Spent-weight accounting and outstanding-vote tracking.

use std::collections::{HashMap, HashSet};

use plenum_types::{Address, TokenAmount};
use serde::{Deserialize, Serialize};

use crate::proposal::ProposalId;

/// Voting-side bookkeeping for the engine.
///
/// Tracks how much weight each member has already put behind each proposal
/// and which active proposals still hold a member's deposit. The forward map
/// (member → open proposals) gates withdrawals; the reverse map (proposal →
/// voters) lets finalization release every voter without scanning the
/// membership. Both maps are maintained in lockstep.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VotingRecords {
    /// (member, proposal) → weight already counted into the tallies.
    spent: HashMap<(Address, ProposalId), TokenAmount>,
    /// member → active proposals the member has voted on.
    outstanding: HashMap<Address, HashSet<ProposalId>>,
    /// Reverse index: proposal → members with outstanding votes on it.
    participants: HashMap<ProposalId, HashSet<Address>>,
}

impl VotingRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Weight `member` has already spent on `proposal`.
    pub fn spent_weight(&self, member: &Address, proposal: ProposalId) -> TokenAmount {
        self.spent
            .get(&(member.clone(), proposal))
            .copied()
            .unwrap_or(TokenAmount::ZERO)
    }

    /// Record that `member` has now spent `weight` in total on `proposal`
    /// and holds an outstanding vote there. Idempotent on the index side.
    pub fn record_vote(&mut self, member: &Address, proposal: ProposalId, weight: TokenAmount) {
        self.spent.insert((member.clone(), proposal), weight);
        self.outstanding
            .entry(member.clone())
            .or_default()
            .insert(proposal);
        self.participants
            .entry(proposal)
            .or_default()
            .insert(member.clone());
    }

    /// Number of active proposals still holding `member`'s deposit.
    pub fn outstanding_count(&self, member: &Address) -> usize {
        self.outstanding.get(member).map(|s| s.len()).unwrap_or(0)
    }

    /// Whether `member` has any outstanding votes.
    pub fn has_outstanding(&self, member: &Address) -> bool {
        self.outstanding_count(member) > 0
    }

    /// Release every voter of `proposal` and drop its spent-weight rows.
    ///
    /// Ids are never reused, so dropped rows cannot influence a later vote.
    pub fn release_proposal(&mut self, proposal: ProposalId) {
        if let Some(voters) = self.participants.remove(&proposal) {
            for voter in voters {
                if let Some(set) = self.outstanding.get_mut(&voter) {
                    set.remove(&proposal);
                    if set.is_empty() {
                        self.outstanding.remove(&voter);
                    }
                }
                self.spent.remove(&(voter, proposal));
            }
        }
    }
}
