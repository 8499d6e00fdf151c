//! Core governance engine.
//!
//! Ties the other modules together: members lock tokens in the
//! [`TreasuryLedger`], the chairperson opens proposals in the
//! [`ProposalRegistry`], locked balances become voting weight through
//! [`VotingRecords`], and finished proposals dispatch their payload
//! through a [`CallRouter`].
//!
//! The engine holds no clock and no token ledger of its own. Callers
//! pass `now` explicitly, and the token backing the locked balances is
//! handed in per call, so the whole lifecycle can be driven in tests
//! without time or I/O.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use plenum_token::TokenLedger;
use plenum_types::{Address, Timestamp, TokenAmount};

use crate::call::{AmendmentCall, CallRouter};
use crate::config::{GovernanceConfig, GovernanceParams};
use crate::error::GovernanceError;
use crate::events::{EventBus, GovernanceEvent};
use crate::proposal::{FinishedProposalStatus, Proposal, ProposalId, ProposalRegistry};
use crate::treasury::TreasuryLedger;
use crate::voting::VotingRecords;

/// Token-weighted governance over a treasury of locked tokens.
#[derive(Debug)]
pub struct GovernanceEngine {
    /// Address this engine answers to. Proposals whose recipient is this
    /// address amend the engine's own parameters when confirmed.
    own_address: Address,
    params: GovernanceParams,
    registry: ProposalRegistry,
    treasury: TreasuryLedger,
    votes: VotingRecords,
    bus: EventBus,
}

impl GovernanceEngine {
    /// Create an engine from a loaded config.
    pub fn new(own_address: Address, config: GovernanceConfig) -> Self {
        Self::with_params(own_address, GovernanceParams::from(config))
    }

    /// Create an engine with explicit parameters.
    pub fn with_params(own_address: Address, params: GovernanceParams) -> Self {
        Self {
            own_address,
            params,
            registry: ProposalRegistry::new(),
            treasury: TreasuryLedger::new(),
            votes: VotingRecords::new(),
            bus: EventBus::new(),
        }
    }

    // ── Member operations ────────────────────────────────────────────────

    /// Lock `amount` of the member's tokens with the engine.
    ///
    /// Pulls the tokens from the member into the engine's own account on
    /// `token` (the member must have approved the engine first), then
    /// credits the member's governance balance. The credited balance is
    /// what `vote` reads as voting weight.
    pub fn deposit(
        &mut self,
        token: &mut dyn TokenLedger,
        member: &Address,
        amount: TokenAmount,
    ) -> Result<(), GovernanceError> {
        // Make sure the credit cannot overflow before pulling tokens, so a
        // failed deposit never leaves funds stranded on the engine account.
        self.treasury
            .balance_of(member)
            .checked_add(amount)
            .ok_or(GovernanceError::Overflow)?;

        token.transfer_from(&self.own_address, member, &self.own_address, amount)?;
        self.treasury.credit(member, amount)?;

        tracing::info!(member = %member, amount = %amount, "tokens deposited");
        self.bus.emit(&GovernanceEvent::Deposited {
            member: member.clone(),
            amount,
        });
        Ok(())
    }

    /// Return `amount` of the member's locked tokens.
    ///
    /// Refused while the member has votes on any open proposal, since the
    /// locked balance is the weight backing those votes.
    pub fn withdraw(
        &mut self,
        token: &mut dyn TokenLedger,
        member: &Address,
        amount: TokenAmount,
    ) -> Result<(), GovernanceError> {
        let available = self.treasury.balance_of(member);
        if available.checked_sub(amount).is_none() {
            return Err(GovernanceError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        let pending = self.votes.outstanding_count(member);
        if pending > 0 {
            return Err(GovernanceError::ActiveVotingLock { pending });
        }

        token.transfer(&self.own_address, member, amount)?;
        self.treasury.debit(member, amount)?;

        tracing::info!(member = %member, amount = %amount, "tokens withdrawn");
        self.bus.emit(&GovernanceEvent::Withdraw {
            member: member.clone(),
            amount,
        });
        Ok(())
    }

    // ── Proposal lifecycle ───────────────────────────────────────────────

    /// Open a new proposal. Chairperson only.
    ///
    /// The voting deadline is `now` plus the configured debating period.
    /// Returns the id of the stored proposal.
    pub fn add_proposal(
        &mut self,
        caller: &Address,
        recipient: Address,
        call_data: Vec<u8>,
        description: String,
        now: Timestamp,
    ) -> Result<ProposalId, GovernanceError> {
        if *caller != self.params.chairperson {
            return Err(GovernanceError::Unauthorized);
        }

        let deadline = now.plus_secs(self.params.debating_period_secs);
        let proposal = self
            .registry
            .add(recipient, call_data, description, deadline)
            .clone();

        tracing::info!(
            id = proposal.id,
            recipient = %proposal.recipient,
            deadline = %proposal.deadline,
            call_data = %hex::encode(&proposal.call_data),
            "proposal added"
        );
        let id = proposal.id;
        self.bus.emit(&GovernanceEvent::Proposed { proposal });
        Ok(id)
    }

    /// Cast or top up a vote on an open proposal.
    ///
    /// The weight counted is the member's locked balance minus whatever
    /// weight they already spent on this proposal, so voting twice without
    /// depositing more adds nothing and is refused. Voting is allowed up
    /// to and including the deadline. Returns the updated proposal.
    pub fn vote(
        &mut self,
        member: &Address,
        proposal_id: ProposalId,
        support: bool,
        now: Timestamp,
    ) -> Result<Proposal, GovernanceError> {
        let balance = self.treasury.balance_of(member);
        let spent = self.votes.spent_weight(member, proposal_id);

        let proposal = self
            .registry
            .get_mut(proposal_id)
            .ok_or(GovernanceError::NotFound(proposal_id))?;
        if !proposal.is_active {
            return Err(GovernanceError::VotingNotActive(proposal_id));
        }
        if proposal.deadline.has_passed(now) {
            return Err(GovernanceError::VotingEnded(proposal_id));
        }

        let delta = balance.saturating_sub(spent);
        if delta.is_zero() {
            return Err(GovernanceError::NoSuffrage);
        }

        let tally = if support {
            &mut proposal.votes_for
        } else {
            &mut proposal.votes_against
        };
        *tally = tally.checked_add(delta).ok_or(GovernanceError::Overflow)?;

        let snapshot = proposal.clone();
        self.votes.record_vote(member, proposal_id, balance);

        tracing::debug!(
            member = %member,
            id = proposal_id,
            support,
            weight = %delta,
            "vote recorded"
        );
        self.bus.emit(&GovernanceEvent::Voted {
            proposal: snapshot.clone(),
        });
        Ok(snapshot)
    }

    /// Close a proposal whose deadline has passed and act on the outcome.
    ///
    /// Anyone may call this. The proposal is confirmed when the turnout
    /// meets the minimum quorum and strictly more weight voted for than
    /// against; a tie rejects. Confirmed proposals addressed to the engine
    /// itself amend its parameters, all others are dispatched through
    /// `router`. Either way the proposal is closed and every voting lock
    /// it held is released.
    pub fn finish_proposal(
        &mut self,
        router: &mut dyn CallRouter,
        proposal_id: ProposalId,
        now: Timestamp,
    ) -> Result<FinishedProposalStatus, GovernanceError> {
        let proposal = self
            .registry
            .get(proposal_id)
            .ok_or(GovernanceError::NotFound(proposal_id))?;
        if !proposal.is_active {
            return Err(GovernanceError::VotingNotActive(proposal_id));
        }
        if !proposal.deadline.has_passed(now) {
            return Err(GovernanceError::VotingNotEnded(proposal_id));
        }

        let turnout = proposal.total_votes().ok_or(GovernanceError::Overflow)?;
        let status = if turnout.checked_sub(self.params.minimum_quorum).is_none() {
            FinishedProposalStatus::RejectedTooFewQuorum
        } else if proposal.votes_for.checked_sub(proposal.votes_against).is_none()
            || proposal.votes_for == proposal.votes_against
        {
            FinishedProposalStatus::Rejected
        } else if proposal.recipient == self.own_address {
            match AmendmentCall::decode(&proposal.call_data) {
                Some(amendment) => {
                    self.params.apply(amendment);
                    FinishedProposalStatus::ConfirmedCallSucceeded
                }
                None => {
                    tracing::warn!(id = proposal_id, "self-call did not decode as an amendment");
                    FinishedProposalStatus::ConfirmedCallFailed
                }
            }
        } else {
            match router.dispatch(&proposal.recipient, &proposal.call_data) {
                Ok(()) => FinishedProposalStatus::ConfirmedCallSucceeded,
                Err(e) => {
                    tracing::warn!(id = proposal_id, error = %e, "proposal call reverted");
                    FinishedProposalStatus::ConfirmedCallFailed
                }
            }
        };

        self.votes.release_proposal(proposal_id);
        let proposal = match self.registry.get_mut(proposal_id) {
            Some(p) => p,
            None => return Err(GovernanceError::NotFound(proposal_id)),
        };
        proposal.is_active = false;
        let snapshot = proposal.clone();

        tracing::info!(
            id = proposal_id,
            status = ?status,
            votes_for = %snapshot.votes_for,
            votes_against = %snapshot.votes_against,
            "proposal finished"
        );
        self.bus.emit(&GovernanceEvent::ProposalFinished {
            status,
            proposal: snapshot,
        });
        Ok(status)
    }

    // ── Read surface ─────────────────────────────────────────────────────

    /// Look up a proposal by id.
    pub fn proposal(&self, proposal_id: ProposalId) -> Result<&Proposal, GovernanceError> {
        self.registry
            .get(proposal_id)
            .ok_or(GovernanceError::NotFound(proposal_id))
    }

    /// All proposals ever opened, in id order.
    pub fn proposals(&self) -> impl Iterator<Item = &Proposal> {
        self.registry.iter()
    }

    /// The member's locked balance.
    pub fn balance_of(&self, member: &Address) -> TokenAmount {
        self.treasury.balance_of(member)
    }

    /// Whether the member has votes on any still-open proposal.
    pub fn has_active_votes(&self, member: &Address) -> bool {
        self.votes.has_outstanding(member)
    }

    /// Current governance parameters.
    pub fn params(&self) -> &GovernanceParams {
        &self.params
    }

    /// The engine's own account address.
    pub fn own_address(&self) -> &Address {
        &self.own_address
    }

    /// Register a listener for governance events.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&GovernanceEvent) + Send + Sync + 'static,
    {
        self.bus.subscribe(Box::new(listener));
    }
}

// ── State persistence ────────────────────────────────────────────────────

const GOVERNANCE_ENGINE_META_KEY: &str = "governance_engine_state";

/// Serializable snapshot of the whole engine state.
#[derive(Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub own_address: Address,
    pub params: GovernanceParams,
    pub proposals: Vec<Proposal>,
    pub balances: HashMap<Address, TokenAmount>,
    pub votes: VotingRecords,
}

impl GovernanceEngine {
    /// Serialize the engine state for persistence.
    pub fn save_state(&self) -> Vec<u8> {
        let snapshot = EngineSnapshot {
            own_address: self.own_address.clone(),
            params: self.params.clone(),
            proposals: self.registry.iter().cloned().collect(),
            balances: self.treasury.balances().clone(),
            votes: self.votes.clone(),
        };
        bincode::serialize(&snapshot).unwrap_or_default()
    }

    /// Restore an engine from persisted state.
    ///
    /// Event listeners are not persisted; the restored engine starts with
    /// an empty bus and callers re-subscribe.
    pub fn load_state(data: &[u8]) -> Result<Self, GovernanceError> {
        let snapshot: EngineSnapshot =
            bincode::deserialize(data).map_err(|e| GovernanceError::Snapshot(e.to_string()))?;
        Ok(Self {
            own_address: snapshot.own_address,
            params: snapshot.params,
            registry: ProposalRegistry::from_proposals(snapshot.proposals),
            treasury: TreasuryLedger::from_balances(snapshot.balances),
            votes: snapshot.votes,
            bus: EventBus::new(),
        })
    }

    /// Key under which the engine state is stored in a metadata store.
    pub fn meta_key() -> &'static str {
        GOVERNANCE_ENGINE_META_KEY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::NullRouter;
    use plenum_token::StandardToken;

    const DEBATE: u64 = 86_400;

    fn test_address(n: u8) -> Address {
        Address::new(format!("plnm_{:0>60}", n))
    }

    fn chairperson() -> Address {
        test_address(1)
    }

    fn engine_address() -> Address {
        test_address(9)
    }

    fn faucet() -> Address {
        test_address(8)
    }

    fn tokens(n: u128) -> TokenAmount {
        TokenAmount::from_whole(n)
    }

    fn make_world() -> (GovernanceEngine, StandardToken) {
        let config = GovernanceConfig::new(chairperson(), test_address(7));
        let engine = GovernanceEngine::new(engine_address(), config);
        let token = StandardToken::with_initial_supply(faucet(), tokens(1_000_000));
        (engine, token)
    }

    fn fund_and_approve(token: &mut StandardToken, member: &Address, amount: TokenAmount) {
        token.transfer(&faucet(), member, amount).unwrap();
        token.approve(member, &engine_address(), amount);
    }

    fn open_proposal(engine: &mut GovernanceEngine, now: Timestamp) -> ProposalId {
        engine
            .add_proposal(
                &chairperson(),
                test_address(42),
                vec![1, 2, 3],
                "send funds".to_string(),
                now,
            )
            .unwrap()
    }

    #[test]
    fn test_deposit_locks_tokens() {
        let (mut engine, mut token) = make_world();
        let member = test_address(2);
        fund_and_approve(&mut token, &member, tokens(100));

        engine.deposit(&mut token, &member, tokens(100)).unwrap();

        assert_eq!(engine.balance_of(&member), tokens(100));
        assert_eq!(token.balance_of(&member), TokenAmount::ZERO);
        assert_eq!(token.balance_of(&engine_address()), tokens(100));
    }

    #[test]
    fn test_deposit_without_approval_fails() {
        let (mut engine, mut token) = make_world();
        let member = test_address(2);
        token.transfer(&faucet(), &member, tokens(100)).unwrap();

        let result = engine.deposit(&mut token, &member, tokens(100));

        match result.unwrap_err() {
            GovernanceError::TransferFailed(_) => {}
            _ => panic!("Expected TransferFailed error"),
        }
        assert_eq!(engine.balance_of(&member), TokenAmount::ZERO);
        assert_eq!(token.balance_of(&member), tokens(100));
    }

    #[test]
    fn test_withdraw_returns_tokens() {
        let (mut engine, mut token) = make_world();
        let member = test_address(2);
        fund_and_approve(&mut token, &member, tokens(100));
        engine.deposit(&mut token, &member, tokens(100)).unwrap();

        engine.withdraw(&mut token, &member, tokens(60)).unwrap();

        assert_eq!(engine.balance_of(&member), tokens(40));
        assert_eq!(token.balance_of(&member), tokens(60));
    }

    #[test]
    fn test_withdraw_more_than_locked_fails() {
        let (mut engine, mut token) = make_world();
        let member = test_address(2);
        fund_and_approve(&mut token, &member, tokens(50));
        engine.deposit(&mut token, &member, tokens(50)).unwrap();

        let result = engine.withdraw(&mut token, &member, tokens(51));

        match result.unwrap_err() {
            GovernanceError::InsufficientBalance { needed, available } => {
                assert_eq!(needed, tokens(51));
                assert_eq!(available, tokens(50));
            }
            _ => panic!("Expected InsufficientBalance error"),
        }
    }

    #[test]
    fn test_withdraw_while_vote_outstanding_fails() {
        let (mut engine, mut token) = make_world();
        let member = test_address(2);
        fund_and_approve(&mut token, &member, tokens(100));
        engine.deposit(&mut token, &member, tokens(100)).unwrap();

        let now = Timestamp::new(1_000_000);
        let id = open_proposal(&mut engine, now);
        engine.vote(&member, id, true, now).unwrap();

        let result = engine.withdraw(&mut token, &member, tokens(100));

        match result.unwrap_err() {
            GovernanceError::ActiveVotingLock { pending } => assert_eq!(pending, 1),
            _ => panic!("Expected ActiveVotingLock error"),
        }
        assert!(engine.has_active_votes(&member));
    }

    #[test]
    fn test_add_proposal_requires_chairperson() {
        let (mut engine, _) = make_world();
        let outsider = test_address(3);

        let result = engine.add_proposal(
            &outsider,
            test_address(42),
            vec![],
            "rogue".to_string(),
            Timestamp::new(1_000_000),
        );

        match result.unwrap_err() {
            GovernanceError::Unauthorized => {}
            _ => panic!("Expected Unauthorized error"),
        }
        assert_eq!(engine.proposals().count(), 0);
    }

    #[test]
    fn test_add_proposal_sets_deadline_from_debating_period() {
        let (mut engine, _) = make_world();
        let now = Timestamp::new(1_000_000);

        let id = open_proposal(&mut engine, now);

        let proposal = engine.proposal(id).unwrap();
        assert_eq!(proposal.deadline, now.plus_secs(DEBATE));
        assert!(proposal.is_active);
        assert_eq!(proposal.votes_for, TokenAmount::ZERO);
        assert_eq!(proposal.votes_against, TokenAmount::ZERO);
    }

    #[test]
    fn test_vote_unknown_proposal_fails() {
        let (mut engine, _) = make_world();

        let result = engine.vote(&test_address(2), 7, true, Timestamp::new(1_000_000));

        match result.unwrap_err() {
            GovernanceError::NotFound(id) => assert_eq!(id, 7),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_vote_without_deposit_is_no_suffrage() {
        let (mut engine, _) = make_world();
        let now = Timestamp::new(1_000_000);
        let id = open_proposal(&mut engine, now);

        let result = engine.vote(&test_address(2), id, true, now);

        match result.unwrap_err() {
            GovernanceError::NoSuffrage => {}
            _ => panic!("Expected NoSuffrage error"),
        }
    }

    #[test]
    fn test_vote_twice_without_topup_is_no_suffrage() {
        let (mut engine, mut token) = make_world();
        let member = test_address(2);
        fund_and_approve(&mut token, &member, tokens(100));
        engine.deposit(&mut token, &member, tokens(100)).unwrap();

        let now = Timestamp::new(1_000_000);
        let id = open_proposal(&mut engine, now);
        engine.vote(&member, id, true, now).unwrap();

        let result = engine.vote(&member, id, true, now);

        match result.unwrap_err() {
            GovernanceError::NoSuffrage => {}
            _ => panic!("Expected NoSuffrage error"),
        }
        assert_eq!(engine.proposal(id).unwrap().votes_for, tokens(100));
    }

    #[test]
    fn test_vote_allowed_at_deadline_but_not_after() {
        let (mut engine, mut token) = make_world();
        let member = test_address(2);
        fund_and_approve(&mut token, &member, tokens(100));
        engine.deposit(&mut token, &member, tokens(100)).unwrap();

        let now = Timestamp::new(1_000_000);
        let id = open_proposal(&mut engine, now);
        let deadline = engine.proposal(id).unwrap().deadline;

        engine.vote(&member, id, true, deadline).unwrap();

        let result = engine.vote(&member, id, true, deadline.plus_secs(1));
        match result.unwrap_err() {
            GovernanceError::VotingEnded(ended) => assert_eq!(ended, id),
            _ => panic!("Expected VotingEnded error"),
        }
    }

    #[test]
    fn test_vote_accumulates_for_and_against() {
        let (mut engine, mut token) = make_world();
        let for_voter = test_address(2);
        let against_voter = test_address(3);
        fund_and_approve(&mut token, &for_voter, tokens(100));
        fund_and_approve(&mut token, &against_voter, tokens(40));
        engine.deposit(&mut token, &for_voter, tokens(100)).unwrap();
        engine
            .deposit(&mut token, &against_voter, tokens(40))
            .unwrap();

        let now = Timestamp::new(1_000_000);
        let id = open_proposal(&mut engine, now);
        engine.vote(&for_voter, id, true, now).unwrap();
        let updated = engine.vote(&against_voter, id, false, now).unwrap();

        assert_eq!(updated.votes_for, tokens(100));
        assert_eq!(updated.votes_against, tokens(40));
    }

    #[test]
    fn test_finish_before_deadline_fails() {
        let (mut engine, _) = make_world();
        let now = Timestamp::new(1_000_000);
        let id = open_proposal(&mut engine, now);

        let result = engine.finish_proposal(&mut NullRouter, id, now.plus_secs(DEBATE));

        match result.unwrap_err() {
            GovernanceError::VotingNotEnded(pending) => assert_eq!(pending, id),
            _ => panic!("Expected VotingNotEnded error"),
        }
    }

    #[test]
    fn test_finish_unknown_proposal_fails() {
        let (mut engine, _) = make_world();

        let result = engine.finish_proposal(&mut NullRouter, 3, Timestamp::new(1_000_000));

        match result.unwrap_err() {
            GovernanceError::NotFound(id) => assert_eq!(id, 3),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_finish_twice_fails() {
        let (mut engine, _) = make_world();
        let now = Timestamp::new(1_000_000);
        let id = open_proposal(&mut engine, now);
        let after = now.plus_secs(DEBATE + 1);

        engine.finish_proposal(&mut NullRouter, id, after).unwrap();
        let result = engine.finish_proposal(&mut NullRouter, id, after);

        match result.unwrap_err() {
            GovernanceError::VotingNotActive(closed) => assert_eq!(closed, id),
            _ => panic!("Expected VotingNotActive error"),
        }
    }

    #[test]
    fn test_finish_without_quorum_rejects() {
        let (mut engine, mut token) = make_world();
        let member = test_address(2);
        fund_and_approve(&mut token, &member, tokens(149));
        engine.deposit(&mut token, &member, tokens(149)).unwrap();

        let now = Timestamp::new(1_000_000);
        let id = open_proposal(&mut engine, now);
        engine.vote(&member, id, true, now).unwrap();

        let status = engine
            .finish_proposal(&mut NullRouter, id, now.plus_secs(DEBATE + 1))
            .unwrap();

        assert_eq!(status, FinishedProposalStatus::RejectedTooFewQuorum);
        assert!(!engine.proposal(id).unwrap().is_active);
    }

    #[test]
    fn test_finish_tie_rejects() {
        let (mut engine, mut token) = make_world();
        let for_voter = test_address(2);
        let against_voter = test_address(3);
        fund_and_approve(&mut token, &for_voter, tokens(100));
        fund_and_approve(&mut token, &against_voter, tokens(100));
        engine.deposit(&mut token, &for_voter, tokens(100)).unwrap();
        engine
            .deposit(&mut token, &against_voter, tokens(100))
            .unwrap();

        let now = Timestamp::new(1_000_000);
        let id = open_proposal(&mut engine, now);
        engine.vote(&for_voter, id, true, now).unwrap();
        engine.vote(&against_voter, id, false, now).unwrap();

        let status = engine
            .finish_proposal(&mut NullRouter, id, now.plus_secs(DEBATE + 1))
            .unwrap();

        assert_eq!(status, FinishedProposalStatus::Rejected);
    }

    #[test]
    fn test_finish_majority_confirms_and_dispatches() {
        let (mut engine, mut token) = make_world();
        let member = test_address(2);
        fund_and_approve(&mut token, &member, tokens(200));
        engine.deposit(&mut token, &member, tokens(200)).unwrap();

        let now = Timestamp::new(1_000_000);
        let id = open_proposal(&mut engine, now);
        engine.vote(&member, id, true, now).unwrap();

        let status = engine
            .finish_proposal(&mut NullRouter, id, now.plus_secs(DEBATE + 1))
            .unwrap();

        assert_eq!(status, FinishedProposalStatus::ConfirmedCallSucceeded);
    }

    #[test]
    fn test_finish_releases_voting_locks() {
        let (mut engine, mut token) = make_world();
        let member = test_address(2);
        fund_and_approve(&mut token, &member, tokens(100));
        engine.deposit(&mut token, &member, tokens(100)).unwrap();

        let now = Timestamp::new(1_000_000);
        let id = open_proposal(&mut engine, now);
        engine.vote(&member, id, true, now).unwrap();
        assert!(engine.has_active_votes(&member));

        engine
            .finish_proposal(&mut NullRouter, id, now.plus_secs(DEBATE + 1))
            .unwrap();

        assert!(!engine.has_active_votes(&member));
        engine.withdraw(&mut token, &member, tokens(100)).unwrap();
        assert_eq!(token.balance_of(&member), tokens(100));
    }

    #[test]
    fn test_vote_on_finished_proposal_fails() {
        let (mut engine, mut token) = make_world();
        let member = test_address(2);
        fund_and_approve(&mut token, &member, tokens(100));
        engine.deposit(&mut token, &member, tokens(100)).unwrap();

        let now = Timestamp::new(1_000_000);
        let id = open_proposal(&mut engine, now);
        let after = now.plus_secs(DEBATE + 1);
        engine.finish_proposal(&mut NullRouter, id, after).unwrap();

        let result = engine.vote(&member, id, true, after);

        match result.unwrap_err() {
            GovernanceError::VotingNotActive(closed) => assert_eq!(closed, id),
            _ => panic!("Expected VotingNotActive error"),
        }
    }

    #[test]
    fn test_self_amendment_garbage_payload_fails_call() {
        let (mut engine, mut token) = make_world();
        let member = test_address(2);
        fund_and_approve(&mut token, &member, tokens(200));
        engine.deposit(&mut token, &member, tokens(200)).unwrap();

        let now = Timestamp::new(1_000_000);
        let own = engine.own_address().clone();
        let id = engine
            .add_proposal(
                &chairperson(),
                own,
                vec![0xff, 0xff, 0xff],
                "broken amendment".to_string(),
                now,
            )
            .unwrap();
        engine.vote(&member, id, true, now).unwrap();

        let status = engine
            .finish_proposal(&mut NullRouter, id, now.plus_secs(DEBATE + 1))
            .unwrap();

        assert_eq!(status, FinishedProposalStatus::ConfirmedCallFailed);
    }

    #[test]
    fn test_self_amendment_changes_quorum() {
        let (mut engine, mut token) = make_world();
        let member = test_address(2);
        fund_and_approve(&mut token, &member, tokens(200));
        engine.deposit(&mut token, &member, tokens(200)).unwrap();

        let now = Timestamp::new(1_000_000);
        let own = engine.own_address().clone();
        let call = AmendmentCall::SetMinimumQuorum(tokens(500)).encode();
        let id = engine
            .add_proposal(&chairperson(), own, call, "raise quorum".to_string(), now)
            .unwrap();
        engine.vote(&member, id, true, now).unwrap();

        let status = engine
            .finish_proposal(&mut NullRouter, id, now.plus_secs(DEBATE + 1))
            .unwrap();

        assert_eq!(status, FinishedProposalStatus::ConfirmedCallSucceeded);
        assert_eq!(engine.params().minimum_quorum, tokens(500));
    }

    #[test]
    fn test_save_and_load_state() {
        let (mut engine, mut token) = make_world();
        let member = test_address(2);
        fund_and_approve(&mut token, &member, tokens(100));
        engine.deposit(&mut token, &member, tokens(100)).unwrap();

        let now = Timestamp::new(1_000_000);
        let id = open_proposal(&mut engine, now);
        engine.vote(&member, id, true, now).unwrap();

        let data = engine.save_state();
        let restored = GovernanceEngine::load_state(&data).unwrap();

        assert_eq!(restored.own_address(), engine.own_address());
        assert_eq!(restored.balance_of(&member), tokens(100));
        assert_eq!(restored.proposal(id).unwrap().votes_for, tokens(100));
        assert!(restored.has_active_votes(&member));
        assert_eq!(
            restored.params().minimum_quorum,
            engine.params().minimum_quorum
        );
    }

    #[test]
    fn test_load_state_rejects_garbage() {
        let result = GovernanceEngine::load_state(&[0xde, 0xad, 0xbe, 0xef]);

        match result.unwrap_err() {
            GovernanceError::Snapshot(_) => {}
            _ => panic!("Expected Snapshot error"),
        }
    }
}
