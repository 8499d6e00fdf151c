//! Dispatch seam for confirmed proposal calls.
//!
//! The engine treats recipients and payloads as opaque bytes. What a call
//! means is the embedder's business: finalization hands the pair to a
//! [`CallRouter`] and only cares whether the call reverted.

use std::collections::HashMap;

use plenum_types::{Address, TokenAmount};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Signaled by a call target to revert the dispatched call.
#[derive(Debug, Error)]
#[error("call reverted: {0}")]
pub struct CallError(pub String);

/// Where confirmed proposal calls are dispatched.
pub trait CallRouter {
    /// Deliver `data` to `recipient`. `Err` marks the call as reverted;
    /// dispatching to an address nobody claims succeeds trivially, like a
    /// call to an account with no code behind it.
    fn dispatch(&mut self, recipient: &Address, data: &[u8]) -> Result<(), CallError>;
}

/// A single recipient registered behind a [`RoutingTable`].
pub trait CallTarget {
    fn call(&mut self, data: &[u8]) -> Result<(), CallError>;
}

/// Router over registered boxed targets.
///
/// Unknown recipients succeed without side effects.
#[derive(Default)]
pub struct RoutingTable {
    targets: HashMap<Address, Box<dyn CallTarget>>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `address`: calls routed there reach `target` from now on.
    pub fn register(&mut self, address: Address, target: Box<dyn CallTarget>) {
        self.targets.insert(address, target);
    }
}

impl CallRouter for RoutingTable {
    fn dispatch(&mut self, recipient: &Address, data: &[u8]) -> Result<(), CallError> {
        match self.targets.get_mut(recipient) {
            Some(target) => target.call(data),
            None => Ok(()),
        }
    }
}

/// A router for setups whose proposals never target a live collaborator.
///
/// Every dispatch succeeds.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRouter;

impl CallRouter for NullRouter {
    fn dispatch(&mut self, _recipient: &Address, _data: &[u8]) -> Result<(), CallError> {
        Ok(())
    }
}

/// A parameter amendment the engine applies to itself.
///
/// Deliberately not a public entry point: the only way to run one is a
/// confirmed proposal whose recipient is the engine's own address and whose
/// call data encodes a variant of this enum. A self-call payload that does
/// not decode reverts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmendmentCall {
    SetChairperson(Address),
    SetMinimumQuorum(TokenAmount),
    SetDebatingPeriod(u64),
}

impl AmendmentCall {
    /// Encode this amendment for embedding in proposal call data.
    pub fn encode(&self) -> Vec<u8> {
        bincode::serialize(self).unwrap_or_default()
    }

    /// Decode self-call data. `None` means the payload is not an amendment.
    pub fn decode(data: &[u8]) -> Option<Self> {
        bincode::deserialize(data).ok()
    }
}
