//! Reference collaborators for tests and local deployments.
//!
//! - `MockStrategy`: strategy adapter holding native tokens, with simulated
//!   yield and a liquidity cap
//! - `MockBridge`: bridge and yield source tracking USD principal per vault
//! - `MockPriceOracle`: settable `(value, timestamp)` feed

use odra::prelude::*;
use odra::casper_types::U256;
use crate::access_control::{Capability, Grants};
use crate::errors::VaultError;
use crate::events::{CapabilityGranted, CapabilityRevoked};
use crate::units::{u256_to_u512, u512_to_u256};

/// Strategy adapter backed by the contract's own balance
#[odra::module(events = [CapabilityGranted, CapabilityRevoked])]
pub struct MockStrategy {
    grants: SubModule<Grants>,
    /// Display name (e.g. the lending market it stands in for)
    name: Var<String>,
    /// Principal invested by vaults
    invested: Var<U256>,
    /// Maximum paid out per divest call; unlimited when unset
    liquidity_cap: Var<Option<U256>>,
}

#[odra::module]
impl MockStrategy {
    pub fn init(&mut self, name: String) {
        self.name.set(name);
        self.invested.set(U256::zero());
        let deployer = self.env().caller();
        self.grants.bootstrap(deployer);
    }

    pub fn name(&self) -> String {
        self.name.get_or_default()
    }

    /// Everything the adapter holds, yield included
    pub fn total_assets(&self) -> U256 {
        u512_to_u256(self.env().self_balance())
    }

    pub fn invested_balance(&self) -> U256 {
        self.invested.get_or_default()
    }

    #[odra(payable)]
    pub fn invest(&mut self) {
        self.grants.require(Capability::Vault);
        let amount = u512_to_u256(self.env().attached_value());
        self.invested.set(self.invested_balance() + amount);
    }

    /// Send back up to `requested`, limited by holdings and the liquidity cap.
    pub fn divest(&mut self, requested: U256) -> U256 {
        self.grants.require(Capability::Vault);

        let mut amount = requested.min(self.total_assets());
        if let Some(cap) = self.liquidity_cap.get_or_default() {
            amount = amount.min(cap);
        }
        if amount.is_zero() {
            return amount;
        }

        self.invested.set(self.invested_balance().saturating_sub(amount));
        let caller = self.env().caller();
        self.env().transfer_tokens(&caller, &u256_to_u512(amount));
        amount
    }

    /// Simulate profit: the attached value becomes part of `total_assets`.
    #[odra(payable)]
    pub fn accrue_yield(&mut self) {
        if self.env().attached_value().is_zero() {
            self.env().revert(VaultError::InvalidAmount);
        }
    }

    pub fn set_liquidity_cap(&mut self, cap: Option<U256>) {
        self.grants.require(Capability::Admin);
        self.liquidity_cap.set(cap);
    }

    pub fn grant_capability(&mut self, capability: Capability, account: Address) {
        self.grants.grant(capability, account);
    }

    pub fn has_capability(&self, capability: Capability, account: Address) -> bool {
        self.grants.has_capability(capability, account)
    }
}

/// Bridge and yield source. Amounts are USD with 6 decimals.
#[odra::module(events = [CapabilityGranted, CapabilityRevoked])]
pub struct MockBridge {
    grants: SubModule<Grants>,
    /// Destination chain label
    destination: Var<String>,
    /// Principal bridged out per vault
    principal: Mapping<Address, U256>,
    /// Principal plus accrued yield per vault
    balances: Mapping<Address, U256>,
    /// Maximum released per `bridge_in`; unlimited when unset
    release_cap: Var<Option<U256>>,
}

#[odra::module]
impl MockBridge {
    pub fn init(&mut self, destination: String) {
        self.destination.set(destination);
        let deployer = self.env().caller();
        self.grants.bootstrap(deployer);
    }

    pub fn destination(&self) -> String {
        self.destination.get_or_default()
    }

    pub fn bridge_out(&mut self, amount: U256) {
        self.grants.require(Capability::Vault);
        if amount.is_zero() {
            self.env().revert(VaultError::InvalidAmount);
        }
        let vault = self.env().caller();
        self.principal.set(&vault, self.principal_of(vault) + amount);
        self.balances.set(&vault, self.balance_for(vault) + amount);
    }

    /// Release yield above principal back to the calling vault.
    pub fn bridge_in(&mut self) -> U256 {
        self.grants.require(Capability::Vault);
        let vault = self.env().caller();
        let balance = self.balance_for(vault);

        let mut released = balance.saturating_sub(self.principal_of(vault));
        if let Some(cap) = self.release_cap.get_or_default() {
            released = released.min(cap);
        }
        self.balances.set(&vault, balance - released);
        released
    }

    /// Value held for the calling vault
    pub fn balance_of(&self) -> U256 {
        self.balance_for(self.env().caller())
    }

    pub fn balance_for(&self, vault: Address) -> U256 {
        self.balances.get(&vault).unwrap_or_default()
    }

    pub fn principal_of(&self, vault: Address) -> U256 {
        self.principal.get(&vault).unwrap_or_default()
    }

    /// Credit `amount` of yield to `vault`.
    pub fn accrue_yield(&mut self, vault: Address, amount: U256) {
        self.grants.require(Capability::Admin);
        self.balances.set(&vault, self.balance_for(vault) + amount);
    }

    pub fn set_release_cap(&mut self, cap: Option<U256>) {
        self.grants.require(Capability::Admin);
        self.release_cap.set(cap);
    }

    pub fn grant_capability(&mut self, capability: Capability, account: Address) {
        self.grants.grant(capability, account);
    }

    pub fn has_capability(&self, capability: Capability, account: Address) -> bool {
        self.grants.has_capability(capability, account)
    }
}

/// Settable price feed
#[odra::module(events = [CapabilityGranted, CapabilityRevoked])]
pub struct MockPriceOracle {
    grants: SubModule<Grants>,
    /// asset id -> (value, timestamp)
    values: Mapping<String, (U256, u64)>,
}

#[odra::module]
impl MockPriceOracle {
    pub fn init(&mut self, feeder: Address) {
        let deployer = self.env().caller();
        self.grants.bootstrap(deployer);
        self.grants.grant(Capability::Operator, feeder);
    }

    pub fn set_value(&mut self, asset_id: String, value: U256, timestamp: u64) {
        self.grants.require(Capability::Operator);
        self.values.set(&asset_id, (value, timestamp));
    }

    /// Latest value, `(0, 0)` if never set
    pub fn latest_value(&self, asset_id: String) -> (U256, u64) {
        self.values.get(&asset_id).unwrap_or((U256::zero(), 0))
    }
}
