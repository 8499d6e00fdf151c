//! Locked member balances backing voting weight.

use std::collections::HashMap;

use plenum_types::{Address, TokenAmount};
use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;

/// Per-member deposits held by the engine.
///
/// An entry equals cumulative deposits minus cumulative withdrawals and is
/// never negative. Members appear on first deposit; the real tokens sit on
/// the external ledger under the engine's own account.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TreasuryLedger {
    balances: HashMap<Address, TokenAmount>,
}

impl TreasuryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from persisted balances.
    pub fn from_balances(balances: HashMap<Address, TokenAmount>) -> Self {
        Self { balances }
    }

    /// All locked balances.
    pub fn balances(&self) -> &HashMap<Address, TokenAmount> {
        &self.balances
    }

    /// Current locked balance (zero for unknown members).
    pub fn balance_of(&self, member: &Address) -> TokenAmount {
        self.balances
            .get(member)
            .copied()
            .unwrap_or(TokenAmount::ZERO)
    }

    /// Credit a deposit.
    pub fn credit(
        &mut self,
        member: &Address,
        amount: TokenAmount,
    ) -> Result<(), GovernanceError> {
        let updated = self
            .balance_of(member)
            .checked_add(amount)
            .ok_or(GovernanceError::Overflow)?;
        self.balances.insert(member.clone(), updated);
        Ok(())
    }

    /// Debit a withdrawal. Fails when `amount` exceeds the member's balance.
    pub fn debit(&mut self, member: &Address, amount: TokenAmount) -> Result<(), GovernanceError> {
        let available = self.balance_of(member);
        let remaining =
            available
                .checked_sub(amount)
                .ok_or(GovernanceError::InsufficientBalance {
                    needed: amount,
                    available,
                })?;
        self.balances.insert(member.clone(), remaining);
        Ok(())
    }
}
