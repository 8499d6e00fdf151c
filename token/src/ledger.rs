//! Token ledger trait and the in-memory reference implementation.

use std::collections::HashMap;

use plenum_types::{Address, TokenAmount};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// The fungible-token collaborator the governance engine moves funds through.
///
/// There is no ambient message sender: every operation names the acting
/// account explicitly, and access control is the caller's responsibility.
pub trait TokenLedger {
    /// Move `amount` from `from` to `to`. Zero amounts move nothing.
    fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError>;

    /// Move `amount` from `owner` to `to`, spending `spender`'s allowance.
    fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError>;

    /// Let `spender` move up to `amount` of `owner`'s tokens.
    /// Replaces any previous allowance for the pair.
    fn approve(&mut self, owner: &Address, spender: &Address, amount: TokenAmount);

    /// Current balance of `account` (zero for unknown accounts).
    fn balance_of(&self, account: &Address) -> TokenAmount;
}

/// In-memory token ledger with a fixed initial supply.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StandardToken {
    balances: HashMap<Address, TokenAmount>,
    /// (owner, spender) -> remaining allowance.
    allowances: HashMap<(Address, Address), TokenAmount>,
}

impl StandardToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger with the entire supply minted to `holder`.
    pub fn with_initial_supply(holder: Address, amount: TokenAmount) -> Self {
        let mut balances = HashMap::new();
        balances.insert(holder, amount);
        Self {
            balances,
            allowances: HashMap::new(),
        }
    }

    /// Remaining allowance for the (owner, spender) pair.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> TokenAmount {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(TokenAmount::ZERO)
    }

    /// Sum of all balances. Constant once constructed: transfers conserve it.
    pub fn total_supply(&self) -> TokenAmount {
        self.balances
            .values()
            .fold(TokenAmount::ZERO, |acc, b| acc + *b)
    }
}

impl TokenLedger for StandardToken {
    fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        if amount.is_zero() {
            return Ok(());
        }
        let from_balance = self.balance_of(from);
        let from_remaining =
            from_balance
                .checked_sub(amount)
                .ok_or(TokenError::InsufficientFunds {
                    needed: amount,
                    available: from_balance,
                })?;
        if from == to {
            // Self-transfer moves nothing once funds are verified.
            return Ok(());
        }
        let to_updated = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        self.balances.insert(from.clone(), from_remaining);
        self.balances.insert(to.clone(), to_updated);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), TokenError> {
        if amount.is_zero() {
            return Ok(());
        }
        let approved = self.allowance(owner, spender);
        let remaining = approved
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientAllowance {
                needed: amount,
                approved,
            })?;
        self.transfer(owner, to, amount)?;
        self.allowances
            .insert((owner.clone(), spender.clone()), remaining);
        Ok(())
    }

    fn approve(&mut self, owner: &Address, spender: &Address, amount: TokenAmount) {
        self.allowances
            .insert((owner.clone(), spender.clone()), amount);
    }

    fn balance_of(&self, account: &Address) -> TokenAmount {
        self.balances
            .get(account)
            .copied()
            .unwrap_or(TokenAmount::ZERO)
    }
}
