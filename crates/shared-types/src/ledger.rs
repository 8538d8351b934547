//! # Token Ledger Port
//!
//! Balance bookkeeping is an external collaborator: the custody core only
//! tells it to mint or burn once a payload has passed every gate.

use crate::entities::{Address, TokenId};
use crate::errors::LedgerError;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Outbound port to the token bookkeeping layer.
pub trait TokenLedger: Send + Sync {
    /// Credit `amount` of `token` to `to`.
    fn mint(&self, token: TokenId, to: Address, amount: u64) -> Result<(), LedgerError>;

    /// Would [`Self::mint_all`] succeed right now? Changes nothing.
    fn check_mint(&self, token: TokenId, credits: &[(Address, u64)]) -> Result<(), LedgerError>;

    /// Apply every credit, or none.
    fn mint_all(&self, token: TokenId, credits: &[(Address, u64)]) -> Result<(), LedgerError>;

    /// Debit `amount` of `token` from `from`.
    fn burn(&self, token: TokenId, from: Address, amount: u64) -> Result<(), LedgerError>;

    /// Current balance.
    fn balance_of(&self, token: TokenId, account: &Address) -> u64;

    /// Outstanding supply.
    fn total_supply(&self, token: TokenId) -> u64;
}

#[derive(Debug, Default)]
struct LedgerState {
    balances: HashMap<(TokenId, Address), u64>,
    supply: HashMap<TokenId, u64>,
}

impl LedgerState {
    /// Supply and touched balances after `credits`, without writing them.
    fn credited(
        &self,
        token: TokenId,
        credits: &[(Address, u64)],
    ) -> Result<(u64, HashMap<Address, u64>), LedgerError> {
        let overflow = || LedgerError::Overflow { token };
        let mut supply = self.supply.get(&token).copied().unwrap_or(0);
        let mut balances: HashMap<Address, u64> = HashMap::new();
        for (to, amount) in credits {
            supply = supply.checked_add(*amount).ok_or_else(overflow)?;
            let balance = match balances.get(to) {
                Some(pending) => *pending,
                None => self.balances.get(&(token, *to)).copied().unwrap_or(0),
            };
            balances.insert(*to, balance.checked_add(*amount).ok_or_else(overflow)?);
        }
        Ok((supply, balances))
    }
}

/// In-memory ledger used by the runtime and by tests.
#[derive(Debug, Default)]
pub struct InMemoryTokenLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryTokenLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenLedger for InMemoryTokenLedger {
    fn mint(&self, token: TokenId, to: Address, amount: u64) -> Result<(), LedgerError> {
        self.mint_all(token, &[(to, amount)])
    }

    fn check_mint(&self, token: TokenId, credits: &[(Address, u64)]) -> Result<(), LedgerError> {
        self.state.read().credited(token, credits).map(|_| ())
    }

    fn mint_all(&self, token: TokenId, credits: &[(Address, u64)]) -> Result<(), LedgerError> {
        let mut state = self.state.write();
        let (supply, balances) = state.credited(token, credits)?;
        state.supply.insert(token, supply);
        for (to, balance) in balances {
            state.balances.insert((token, to), balance);
        }
        Ok(())
    }

    fn burn(&self, token: TokenId, from: Address, amount: u64) -> Result<(), LedgerError> {
        let mut state = self.state.write();
        let balance = state.balances.get(&(token, from)).copied().unwrap_or(0);
        if balance < amount {
            return Err(LedgerError::InsufficientBalance {
                token,
                balance,
                needed: amount,
            });
        }
        state.balances.insert((token, from), balance - amount);
        if let Some(supply) = state.supply.get_mut(&token) {
            *supply = supply.saturating_sub(amount);
        }
        Ok(())
    }

    fn balance_of(&self, token: TokenId, account: &Address) -> u64 {
        self.state
            .read()
            .balances
            .get(&(token, *account))
            .copied()
            .unwrap_or(0)
    }

    fn total_supply(&self, token: TokenId) -> u64 {
        self.state.read().supply.get(&token).copied().unwrap_or(0)
    }
}
