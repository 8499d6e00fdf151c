//! Token-weighted governance over a shared treasury.
//!
//! Members lock fungible tokens with [`GovernanceEngine::deposit`] to gain
//! voting weight, the chairperson submits call-with-data proposals, weight
//! accumulates for or against during a debate window, and once the deadline
//! passes anyone may finalize: quorum and majority decide whether the
//! proposal's call is dispatched. The engine's own parameters (chairperson,
//! quorum, debating period) change only through confirmed proposals addressed
//! to the engine itself.
//!
//! Key principle: weight equals locked balance, read lazily at vote time.
//! Deposits stay withdrawable except while backing votes on active proposals.

pub mod call;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod proposal;
pub mod treasury;
pub mod voting;

pub use call::{AmendmentCall, CallError, CallRouter, CallTarget, NullRouter, RoutingTable};
pub use config::{GovernanceConfig, GovernanceParams};
pub use engine::{EngineSnapshot, GovernanceEngine};
pub use error::GovernanceError;
pub use events::{EventBus, GovernanceEvent};
pub use proposal::{FinishedProposalStatus, Proposal, ProposalId, ProposalRegistry};
pub use treasury::TreasuryLedger;
pub use voting::VotingRecords;
