//! Portfolio Vault Contract
//!
//! Multi-strategy vault for the native asset. Implements:
//! - Share minting against NAV (reserve + every strategy's assets)
//! - Deposit allocation across the reserve and enabled strategies
//! - Withdrawal liquidity from the reserve first, then proportional divestment
//! - Operator-managed, versioned strategy registry
//!
//! ## Withdrawal atomicity
//!
//! A withdrawal either delivers the full amount or reverts. The revert rolls
//! back every divestment made during the call, so shares are never burned
//! without the assets being paid out.

use odra::prelude::*;
use odra::casper_types::{RuntimeArgs, U256};
use odra::{CallDef, ContractRef};
use crate::access_control::{Capability, Grants};
use crate::allocation::{plan_allocation, AllocationPlan};
use crate::divestment::{withdrawal_source, DivestmentRound, WithdrawalSource};
use crate::errors::VaultError;
use crate::events::{
    CapabilityGranted, CapabilityRevoked, Deposited, Rebalanced, ReserveBpsUpdated,
    StrategyAdded, StrategyDivested, StrategyInvested, StrategyUpdated, Withdrawn,
};
use crate::interfaces::StrategyAdapterContractRef;
use crate::ledger;
use crate::registry::{validate_allocation, StrategyRegistry};
use crate::shares::ShareToken;
use crate::types::StrategyEntry;
use crate::units::{bps_of, u256_to_u512, u512_to_u256};

/// Registry entry together with the adapter's current assets
#[derive(Debug, Clone)]
struct Holding {
    entry: StrategyEntry,
    assets: U256,
}

/// Portfolio Vault Contract
#[odra::module(events = [
    Deposited,
    Withdrawn,
    StrategyInvested,
    StrategyDivested,
    StrategyAdded,
    StrategyUpdated,
    ReserveBpsUpdated,
    Rebalanced,
    CapabilityGranted,
    CapabilityRevoked
])]
pub struct PortfolioVault {
    /// Capability table
    grants: SubModule<Grants>,
    /// Share ledger
    shares: SubModule<ShareToken>,
    /// Strategy registry
    registry: SubModule<StrategyRegistry>,
    /// Liquid buffer held by the vault
    reserve: Var<U256>,
    /// Target reserve share of each deposit, in bps
    reserve_bps: Var<u32>,
    /// Set while a mutating call is in flight
    locked: Var<bool>,
}

#[odra::module]
impl PortfolioVault {
    /// Initialize the vault. The deployer becomes admin.
    pub fn init(
        &mut self,
        name: String,
        symbol: String,
        decimals: u8,
        reserve_bps: u32,
        operator: Address,
    ) {
        if let Err(error) = validate_allocation(reserve_bps, 0) {
            self.env().revert(error);
        }

        self.shares.configure(name, symbol, decimals);
        self.reserve.set(U256::zero());
        self.reserve_bps.set(reserve_bps);
        self.locked.set(false);

        let admin = self.env().caller();
        self.grants.bootstrap(admin);
        self.grants.grant(Capability::Operator, operator);
    }

    // ========== Deposit / Withdraw ==========

    /// Deposit the attached value and mint shares to `receiver`.
    #[odra(payable)]
    pub fn deposit(&mut self, receiver: Address) -> U256 {
        self.enter();

        let assets = u512_to_u256(self.env().attached_value());
        if assets.is_zero() {
            self.env().revert(VaultError::InvalidAmount);
        }

        let total_assets = self.total_assets();
        let minted = self.ok_or_revert(ledger::shares_for_deposit(
            assets,
            total_assets,
            self.shares.total_shares(),
        ));
        if minted.is_zero() {
            self.env().revert(VaultError::InvalidAmount);
        }

        let plan = self.ok_or_revert(plan_allocation(
            assets,
            self.reserve_bps(),
            &self.registry.entries(),
        ));
        self.invest(&plan);

        self.reserve.set(self.reserve_balance() + plan.reserve);
        self.shares.mint(receiver, minted);

        self.env().emit_event(Deposited {
            caller: self.env().caller(),
            receiver,
            assets,
            shares: minted,
            reserve_portion: plan.reserve,
        });

        self.exit();
        minted
    }

    /// Burn `shares` of the caller and pay the assets to `receiver`.
    pub fn withdraw(&mut self, shares: U256, receiver: Address) -> U256 {
        self.enter();

        let owner = self.env().caller();
        if shares.is_zero() {
            self.env().revert(VaultError::InvalidAmount);
        }
        if self.shares.balance_of(owner) < shares {
            self.env().revert(VaultError::InsufficientShares);
        }

        let holdings = self.holdings();
        let reserve = self.reserve_balance();
        let nav = holdings.iter().fold(reserve, |acc, holding| acc + holding.assets);
        let assets = self.ok_or_revert(ledger::assets_for_shares(
            shares,
            nav,
            self.shares.total_shares(),
        ));
        if assets.is_zero() {
            self.env().revert(VaultError::InvalidAmount);
        }

        let eligible: Vec<Holding> = holdings
            .into_iter()
            .filter(|holding| holding.entry.enabled && !holding.assets.is_zero())
            .collect();
        let liquid_strategies = eligible
            .iter()
            .fold(U256::zero(), |acc, holding| acc + holding.assets);

        let from_strategies = match self.ok_or_revert(withdrawal_source(assets, reserve, liquid_strategies)) {
            WithdrawalSource::Reserve => U256::zero(),
            WithdrawalSource::Divest { need } => self.divest(&eligible, need, liquid_strategies),
        };

        self.reserve.set(reserve + from_strategies - assets);
        self.shares.burn(owner, shares);

        self.env().emit_event(Withdrawn {
            owner,
            receiver,
            shares,
            assets,
            from_strategies,
        });

        self.env().transfer_tokens(&receiver, &u256_to_u512(assets));
        self.exit();
        assets
    }

    // ========== Views ==========

    /// NAV: reserve plus the assets of every registered strategy
    pub fn total_assets(&self) -> U256 {
        self.holdings()
            .iter()
            .fold(self.reserve_balance(), |acc, holding| acc + holding.assets)
    }

    pub fn total_shares(&self) -> U256 {
        self.shares.total_shares()
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.shares.balance_of(account)
    }

    pub fn reserve_balance(&self) -> U256 {
        self.reserve.get_or_default()
    }

    pub fn reserve_bps(&self) -> u32 {
        self.reserve_bps.get_or_default()
    }

    /// Assets per share, scaled by 1e18
    pub fn share_price(&self) -> U256 {
        ledger::share_price(self.total_assets(), self.total_shares())
    }

    /// Shares a deposit of `assets` would mint now
    pub fn preview_deposit(&self, assets: U256) -> U256 {
        self.ok_or_revert(ledger::shares_for_deposit(
            assets,
            self.total_assets(),
            self.total_shares(),
        ))
    }

    /// Assets `shares` would redeem now
    pub fn preview_withdraw(&self, shares: U256) -> U256 {
        self.ok_or_revert(ledger::assets_for_shares(
            shares,
            self.total_assets(),
            self.total_shares(),
        ))
    }

    /// Registry ids and entries, in registry order
    pub fn get_strategies(&self) -> (Vec<u32>, Vec<StrategyEntry>) {
        let entries = self.registry.entries();
        let ids = entries.iter().map(|entry| entry.id).collect();
        (ids, entries)
    }

    pub fn get_strategy(&self, id: u32) -> Option<StrategyEntry> {
        self.registry.get(id)
    }

    pub fn registry_version(&self) -> u64 {
        self.registry.version()
    }

    // ========== Registry (operator) ==========

    /// Register a new enabled strategy
    pub fn add_strategy(&mut self, id: u32, adapter: Address, allocation_bps: u32) {
        self.grants.require(Capability::Operator);

        let reserve_bps = self.reserve_bps();
        let result = self.registry.add(id, adapter, allocation_bps, reserve_bps);
        let entry = self.ok_or_revert(result);

        self.env().emit_event(StrategyAdded {
            strategy_id: entry.id,
            adapter: entry.adapter,
            allocation_bps: entry.allocation_bps,
            version: self.registry.version(),
        });
    }

    /// Change a strategy's allocation and enabled flag
    pub fn set_strategy(&mut self, id: u32, allocation_bps: u32, enabled: bool) {
        self.grants.require(Capability::Operator);

        let reserve_bps = self.reserve_bps();
        let result = self.registry.update(id, allocation_bps, enabled, reserve_bps);
        let entry = self.ok_or_revert(result);

        self.env().emit_event(StrategyUpdated {
            strategy_id: entry.id,
            allocation_bps: entry.allocation_bps,
            enabled: entry.enabled,
            version: self.registry.version(),
        });
    }

    /// Change the reserve share of future deposits
    pub fn set_reserve_bps(&mut self, reserve_bps: u32) {
        self.grants.require(Capability::Operator);

        let check = self.registry.check_reserve(reserve_bps);
        self.ok_or_revert(check);

        self.reserve_bps.set(reserve_bps);
        let version = self.registry.bump();
        self.env().emit_event(ReserveBpsUpdated { reserve_bps, version });
    }

    /// Recall capital from disabled strategies, then invest reserve above target.
    pub fn rebalance(&mut self) {
        self.grants.require(Capability::Operator);
        self.enter();

        let mut recalled = U256::zero();
        for holding in self.holdings() {
            if holding.entry.enabled || holding.assets.is_zero() {
                continue;
            }
            recalled += self.pull(&holding.entry, holding.assets);
        }

        let reserve = self.reserve_balance() + recalled;
        let nav = self
            .holdings()
            .iter()
            .fold(reserve, |acc, holding| acc + holding.assets);
        let target = bps_of(nav, self.reserve_bps());
        let excess = reserve.saturating_sub(target);

        let invested = if excess.is_zero() {
            U256::zero()
        } else {
            let plan = self.ok_or_revert(plan_allocation(excess, 0, &self.registry.entries()));
            self.invest(&plan);
            plan.invested()
        };

        self.reserve.set(reserve - invested);
        self.env().emit_event(Rebalanced { recalled, invested });
        self.exit();
    }

    // ========== Share token ==========

    pub fn name(&self) -> String {
        self.shares.name()
    }

    pub fn symbol(&self) -> String {
        self.shares.symbol()
    }

    pub fn decimals(&self) -> u8 {
        self.shares.decimals()
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.shares.allowance(owner, spender)
    }

    pub fn transfer(&mut self, recipient: Address, amount: U256) -> bool {
        let sender = self.env().caller();
        self.shares.transfer(sender, recipient, amount);
        true
    }

    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        let owner = self.env().caller();
        self.shares.approve(owner, spender, amount);
        true
    }

    pub fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) -> bool {
        let spender = self.env().caller();
        self.shares.transfer_from(spender, owner, recipient, amount);
        true
    }

    // ========== Capabilities ==========

    pub fn grant_capability(&mut self, capability: Capability, account: Address) {
        self.grants.grant(capability, account);
    }

    pub fn revoke_capability(&mut self, capability: Capability, account: Address) {
        self.grants.revoke(capability, account);
    }

    pub fn has_capability(&self, capability: Capability, account: Address) -> bool {
        self.grants.has_capability(capability, account)
    }
}

impl PortfolioVault {
    fn holdings(&self) -> Vec<Holding> {
        self.registry
            .entries()
            .into_iter()
            .map(|entry| {
                let adapter = StrategyAdapterContractRef::new(self.env().clone(), entry.adapter);
                let assets = adapter.total_assets();
                Holding { entry, assets }
            })
            .collect()
    }

    fn invest(&mut self, plan: &AllocationPlan) {
        for slice in plan.slices.iter().filter(|slice| !slice.amount.is_zero()) {
            let call = CallDef::new("invest", true, RuntimeArgs::new())
                .with_amount(u256_to_u512(slice.amount));
            self.env().call_contract::<()>(slice.adapter, call);
            self.env().emit_event(StrategyInvested {
                strategy_id: slice.strategy_id,
                amount: slice.amount,
            });
        }
    }

    /// Pull `need` from `eligible` strategies, reverting on any shortfall.
    fn divest(&mut self, eligible: &[Holding], need: U256, liquid_strategies: U256) -> U256 {
        let mut round = self.ok_or_revert(DivestmentRound::open(need, liquid_strategies));
        let last = eligible.len().saturating_sub(1);

        for (index, holding) in eligible.iter().enumerate() {
            let requested = self.ok_or_revert(round.request_for(holding.assets, index == last));
            if requested.is_zero() {
                continue;
            }
            let returned = self.pull(&holding.entry, requested);
            round.record(returned);
        }

        self.ok_or_revert(round.settle())
    }

    /// Ask a strategy for `requested`; the amount actually received is what counts.
    fn pull(&mut self, entry: &StrategyEntry, requested: U256) -> U256 {
        let before = self.env().self_balance();
        let mut adapter = StrategyAdapterContractRef::new(self.env().clone(), entry.adapter);
        adapter.divest(requested);
        let received = u512_to_u256(self.env().self_balance().saturating_sub(before));

        self.env().emit_event(StrategyDivested {
            strategy_id: entry.id,
            requested,
            returned: received,
        });
        received
    }

    fn ok_or_revert<T>(&self, result: Result<T, VaultError>) -> T {
        result.unwrap_or_else(|error| self.env().revert(error))
    }

    fn enter(&mut self) {
        if self.locked.get_or_default() {
            self.env().revert(VaultError::ReentrantCall);
        }
        self.locked.set(true);
    }

    fn exit(&mut self) {
        self.locked.set(false);
    }
}
