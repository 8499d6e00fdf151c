//! Events emitted by the governance engine for subscribers.

use std::fmt;

use plenum_types::{Address, TokenAmount};

use crate::proposal::{FinishedProposalStatus, Proposal};

/// Engine-level events that observers can subscribe to via the [`EventBus`].
///
/// Proposal-carrying variants clone the record as it stood right after the
/// operation, updated tallies included.
#[derive(Clone, Debug)]
pub enum GovernanceEvent {
    /// A member locked tokens as voting weight.
    Deposited { member: Address, amount: TokenAmount },
    /// The chairperson opened a proposal for debate.
    Proposed { proposal: Proposal },
    /// A member's weight was counted.
    Voted { proposal: Proposal },
    /// A proposal reached its terminal status.
    ProposalFinished {
        status: FinishedProposalStatus,
        proposal: Proposal,
    },
    /// A member reclaimed unlocked tokens.
    Withdraw { member: Address, amount: TokenAmount },
}

/// Synchronous fan-out event bus for governance events.
///
/// Listeners are invoked inline on the emitting thread; keep handlers fast to
/// avoid stalling the engine.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&GovernanceEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&GovernanceEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &GovernanceEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
