//! Vault share ledger.
//!
//! CEP-18 style balances and allowances for vault shares. The owning vault
//! mints on deposit and burns on withdrawal; holders can move shares freely.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::VaultError;

/// Share token state
#[odra::module]
pub struct ShareToken {
    /// Token name
    name: Var<String>,
    /// Token symbol
    symbol: Var<String>,
    /// Decimals (match the deposited asset)
    decimals: Var<u8>,
    /// Shares outstanding
    total_shares: Var<U256>,
    /// Balance mapping (owner -> shares)
    balances: Mapping<Address, U256>,
    /// Allowance mapping (owner, spender) -> amount
    allowances: Mapping<(Address, Address), U256>,
}

#[odra::module]
impl ShareToken {
    /// Get token name
    pub fn name(&self) -> String {
        self.name.get_or_default()
    }

    /// Get token symbol
    pub fn symbol(&self) -> String {
        self.symbol.get_or_default()
    }

    /// Get decimals
    pub fn decimals(&self) -> u8 {
        self.decimals.get_or_default()
    }

    /// Get total shares outstanding
    pub fn total_shares(&self) -> U256 {
        self.total_shares.get_or_default()
    }

    /// Get balance of account (in shares)
    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).unwrap_or_default()
    }

    /// Get allowance
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances.get(&(owner, spender)).unwrap_or_default()
    }
}

impl ShareToken {
    pub fn configure(&mut self, name: String, symbol: String, decimals: u8) {
        self.name.set(name);
        self.symbol.set(symbol);
        self.decimals.set(decimals);
        self.total_shares.set(U256::zero());
    }

    pub fn transfer(&mut self, sender: Address, recipient: Address, amount: U256) {
        let from_balance = self.balance_of(sender);
        if from_balance < amount {
            self.env().revert(VaultError::InsufficientShares);
        }
        self.balances.set(&sender, from_balance - amount);
        let to_balance = self.balance_of(recipient);
        self.balances.set(&recipient, to_balance + amount);
    }

    pub fn approve(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances.set(&(owner, spender), amount);
    }

    pub fn transfer_from(&mut self, spender: Address, owner: Address, recipient: Address, amount: U256) {
        let current_allowance = self.allowance(owner, spender);
        if current_allowance < amount {
            self.env().revert(VaultError::InsufficientAllowance);
        }
        self.transfer(owner, recipient, amount);
        self.allowances.set(&(owner, spender), current_allowance - amount);
    }

    pub fn mint(&mut self, to: Address, amount: U256) {
        let balance = self.balance_of(to);
        self.balances.set(&to, balance + amount);
        self.total_shares.set(self.total_shares() + amount);
    }

    pub fn burn(&mut self, from: Address, amount: U256) {
        let balance = self.balance_of(from);
        if balance < amount {
            self.env().revert(VaultError::InsufficientShares);
        }
        self.balances.set(&from, balance - amount);
        self.total_shares.set(self.total_shares() - amount);
    }
}
