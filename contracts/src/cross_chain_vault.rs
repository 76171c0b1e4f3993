//! Cross-Chain Vault Contract
//!
//! Leveraged vault for the native asset. Deposited collateral stays in
//! custody; a fraction of its value is borrowed against it and sent over the
//! bridge to an external yield source. Yield harvested back repays the debt
//! first and then compounds into collateral.
//!
//! ## Position accounting
//!
//! - `collateral_balance` in asset units, `debt_value` in USD (12 decimals)
//! - `bridged_value` is the principal at the yield source (USD, 6 decimals)
//! - collateral credited by loop steps and harvests is `unsettled` until a
//!   settler delivers the native backing
//!
//! NAV is `collateral_balance + units(bridged_value) - units(debt_value)` at
//! the current price, so deposits and loops leave the share price unchanged.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use crate::access_control::{Capability, Grants};
use crate::errors::VaultError;
use crate::events::{
    CapabilityGranted, CapabilityRevoked, CollateralSettled, CollateralWithdrawn, Harvested,
    LeveragedDeposit, LoopHalted,
};
use crate::harvest::{accrued_profit, apply_harvest};
use crate::interfaces::{BridgeContractRef, PriceOracleContractRef};
use crate::ledger;
use crate::leverage::{
    forced_step, is_healthy, leverage_ratio, plan_loops, validate_config, Exposure, MAX_LEVERAGE_LOOPS,
};
use crate::oracle::resolve_price;
use crate::shares::ShareToken;
use crate::types::{CrossChainConfig, CrossChainPosition, HarvestReport, PriceQuote};
use crate::units::{bps_of, collateral_to_usd12, u256_to_u512, u512_to_u256, usd12_to_usd6};

/// Cross-Chain Vault Contract
#[odra::module(events = [
    LeveragedDeposit,
    LoopHalted,
    Harvested,
    CollateralSettled,
    CollateralWithdrawn,
    CapabilityGranted,
    CapabilityRevoked
])]
pub struct CrossChainVault {
    /// Capability table
    grants: SubModule<Grants>,
    /// Share ledger
    shares: SubModule<ShareToken>,
    /// Loan and price parameters
    config: Var<CrossChainConfig>,
    /// Leveraged position
    position: Var<CrossChainPosition>,
    /// Bridge / yield source
    bridge: Var<Address>,
    /// Price oracle; the fallback price is used while unset
    oracle: Var<Option<Address>>,
    /// Set while a mutating call is in flight
    locked: Var<bool>,
}

#[odra::module]
impl CrossChainVault {
    /// Initialize the vault. The deployer becomes admin.
    pub fn init(
        &mut self,
        name: String,
        symbol: String,
        config: CrossChainConfig,
        bridge: Address,
        oracle: Option<Address>,
        operator: Address,
    ) {
        if let Err(error) = validate_config(&config) {
            self.env().revert(error);
        }

        self.shares.configure(name, symbol, config.asset_decimals);
        self.config.set(config);
        self.position.set(CrossChainPosition::default());
        self.bridge.set(bridge);
        self.oracle.set(oracle);
        self.locked.set(false);

        let admin = self.env().caller();
        self.grants.bootstrap(admin);
        self.grants.grant(Capability::Operator, operator);
    }

    // ========== Deposit / Withdraw ==========

    /// Deposit the attached collateral, borrow against it, bridge the
    /// borrowed value and run up to `loops` supply/borrow steps.
    #[odra(payable)]
    pub fn deposit(&mut self, loops: u8, receiver: Address) -> U256 {
        self.enter();

        let collateral = u512_to_u256(self.env().attached_value());
        if collateral.is_zero() {
            self.env().revert(VaultError::InvalidAmount);
        }
        let config = self.get_config();
        if loops > config.max_loops {
            self.env().revert(VaultError::TooManyLoops);
        }

        let quote = self.get_price_or_fallback();
        let mut position = self.get_position();
        let current = Exposure {
            collateral: position.collateral_balance,
            debt12: position.debt_value,
        };

        let minted = self.ok_or_revert(ledger::shares_for_deposit(
            collateral,
            current.net_assets(position.bridged_value, quote.value, &config),
            self.shares.total_shares(),
        ));
        if minted.is_zero() {
            self.env().revert(VaultError::InvalidAmount);
        }

        let seed_borrow = bps_of(
            collateral_to_usd12(collateral, quote.value, config.asset_decimals),
            config.ltv_bps,
        );
        let borrowed = Exposure {
            collateral: current.collateral + collateral,
            debt12: current.debt12 + seed_borrow,
        };
        if !seed_borrow.is_zero() && !is_healthy(borrowed.health_factor(quote.value, &config)) {
            self.env().revert(VaultError::HealthFactorViolation);
        }

        let bridged = usd12_to_usd6(seed_borrow);
        if !bridged.is_zero() {
            let mut bridge = BridgeContractRef::new(self.env().clone(), self.bridge_address());
            bridge.bridge_out(bridged);
        }

        let outcome = plan_loops(borrowed, seed_borrow, loops, quote.value, &config);
        let loops_executed = outcome.steps.len() as u8;
        if let Some(health_factor) = outcome.halted_at {
            self.env().emit_event(LoopHalted {
                step: loops_executed + 1,
                health_factor,
            });
        }

        let converted = outcome
            .steps
            .iter()
            .fold(U256::zero(), |acc, step| acc + step.collateral_added);
        position.collateral_balance = outcome.exposure.collateral;
        position.debt_value = outcome.exposure.debt12;
        position.bridged_value += bridged;
        position.unsettled_collateral += converted;
        self.position.set(position);

        self.shares.mint(receiver, minted);

        self.env().emit_event(LeveragedDeposit {
            receiver,
            collateral,
            shares: minted,
            borrowed: outcome.exposure.debt12 - current.debt12,
            bridged,
            loops_executed,
            price: quote.value,
            price_source: quote.source,
        });

        self.exit();
        minted
    }

    /// Burn `shares` of the caller and pay their share of NAV from custody.
    pub fn withdraw(&mut self, shares: U256, receiver: Address) -> U256 {
        self.enter();

        let owner = self.env().caller();
        if shares.is_zero() {
            self.env().revert(VaultError::InvalidAmount);
        }
        if self.shares.balance_of(owner) < shares {
            self.env().revert(VaultError::InsufficientShares);
        }

        let config = self.get_config();
        let quote = self.get_price_or_fallback();
        let mut position = self.get_position();
        let current = Exposure {
            collateral: position.collateral_balance,
            debt12: position.debt_value,
        };

        let assets = self.ok_or_revert(ledger::assets_for_shares(
            shares,
            current.net_assets(position.bridged_value, quote.value, &config),
            self.shares.total_shares(),
        ));
        if assets.is_zero() {
            self.env().revert(VaultError::InvalidAmount);
        }
        if assets > position.custody() {
            self.env().revert(VaultError::InsufficientLiquidity);
        }

        let remaining = Exposure {
            collateral: current.collateral - assets,
            debt12: current.debt12,
        };
        if !remaining.debt12.is_zero() && !is_healthy(remaining.health_factor(quote.value, &config)) {
            self.env().revert(VaultError::HealthFactorViolation);
        }

        position.collateral_balance = remaining.collateral;
        self.position.set(position);
        self.shares.burn(owner, shares);

        self.env().emit_event(CollateralWithdrawn {
            owner,
            receiver,
            shares,
            assets,
        });

        self.env().transfer_tokens(&receiver, &u256_to_u512(assets));
        self.exit();
        assets
    }

    // ========== Harvest / Settlement ==========

    /// Realize yield above the bridged principal, repay debt and compound
    /// the rest into collateral.
    pub fn harvest_cross_chain_yield(&mut self) -> HarvestReport {
        let config = self.get_config();
        if !config.permissionless_harvest {
            self.grants.require(Capability::Harvester);
        }
        self.enter();

        let position = self.get_position();
        let mut bridge = BridgeContractRef::new(self.env().clone(), self.bridge_address());
        let profit = accrued_profit(bridge.balance_of(), position.bridged_value);
        if profit.is_zero() {
            self.exit();
            return HarvestReport::default();
        }

        let realized = bridge.bridge_in().min(profit);
        if realized.is_zero() {
            self.exit();
            return HarvestReport::default();
        }

        let quote = self.get_price_or_fallback();
        let (next, report) = apply_harvest(&position, realized, quote.value, config.asset_decimals);
        let debt_after = next.debt_value;
        self.position.set(next);

        self.env().emit_event(Harvested {
            profit: report.profit,
            debt_repaid: report.debt_repaid,
            collateral_added: report.collateral_added,
            debt_after,
            price_source: quote.source,
        });

        self.exit();
        report
    }

    /// Deliver native backing for collateral credited by conversion.
    #[odra(payable)]
    pub fn settle_collateral(&mut self) {
        self.grants.require(Capability::Settler);
        self.enter();

        let amount = u512_to_u256(self.env().attached_value());
        let mut position = self.get_position();
        if amount.is_zero() || amount > position.unsettled_collateral {
            self.env().revert(VaultError::InvalidAmount);
        }

        position.unsettled_collateral -= amount;
        let unsettled_after = position.unsettled_collateral;
        self.position.set(position);

        self.env().emit_event(CollateralSettled {
            amount,
            unsettled_after,
        });
        self.exit();
    }

    // ========== Views ==========

    /// Health factor of the position, scaled by 1e18
    pub fn get_health_factor(&self) -> U256 {
        let quote = self.get_price_or_fallback();
        self.exposure().health_factor(quote.value, &self.get_config())
    }

    /// Collateral value over equity, scaled by 1e18
    pub fn get_leverage_ratio(&self) -> U256 {
        let config = self.get_config();
        let quote = self.get_price_or_fallback();
        let exposure = self.exposure();
        let value = collateral_to_usd12(exposure.collateral, quote.value, config.asset_decimals);
        leverage_ratio(value, exposure.debt12)
    }

    /// Oracle price when usable, the configured fallback otherwise
    pub fn get_price_or_fallback(&self) -> PriceQuote {
        let config = self.get_config();
        let reading = self.oracle.get_or_default().map(|address| {
            let oracle = PriceOracleContractRef::new(self.env().clone(), address);
            oracle.latest_value(config.asset_id.clone())
        });
        resolve_price(
            reading,
            self.env().get_block_time(),
            config.max_price_age,
            config.fallback_price,
        )
    }

    /// NAV in collateral units
    pub fn total_assets(&self) -> U256 {
        let quote = self.get_price_or_fallback();
        let bridged = self.get_position().bridged_value;
        self.exposure().net_assets(bridged, quote.value, &self.get_config())
    }

    pub fn total_shares(&self) -> U256 {
        self.shares.total_shares()
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.shares.balance_of(account)
    }

    /// NAV per share, scaled by 1e18
    pub fn share_price(&self) -> U256 {
        ledger::share_price(self.total_assets(), self.total_shares())
    }

    pub fn get_position(&self) -> CrossChainPosition {
        self.position.get_or_default()
    }

    pub fn total_collateral(&self) -> U256 {
        self.get_position().collateral_balance
    }

    pub fn total_debt_usd(&self) -> U256 {
        self.get_position().debt_value
    }

    pub fn initial_bridged_usd(&self) -> U256 {
        self.get_position().bridged_value
    }

    pub fn get_config(&self) -> CrossChainConfig {
        self.config.get_or_default()
    }

    // ========== Operator ==========

    /// Force one supply/borrow step of `borrow_value` (USD, 12 decimals).
    pub fn lever_up(&mut self, borrow_value: U256) -> U256 {
        self.grants.require(Capability::Operator);
        self.enter();

        let config = self.get_config();
        let quote = self.get_price_or_fallback();
        let (next, step) = self.ok_or_revert(forced_step(self.exposure(), borrow_value, quote.value, &config));

        let mut position = self.get_position();
        position.collateral_balance = next.collateral;
        position.debt_value = next.debt12;
        position.unsettled_collateral += step.collateral_added;
        self.position.set(position);

        self.env().emit_event(LeveragedDeposit {
            receiver: self.env().caller(),
            collateral: U256::zero(),
            shares: U256::zero(),
            borrowed: step.borrowed12,
            bridged: U256::zero(),
            loops_executed: 1,
            price: quote.value,
            price_source: quote.source,
        });

        self.exit();
        next.health_factor(quote.value, &config)
    }

    pub fn set_oracle(&mut self, oracle: Option<Address>) {
        self.grants.require(Capability::Operator);
        self.oracle.set(oracle);
    }

    pub fn set_max_loops(&mut self, max_loops: u8) {
        self.grants.require(Capability::Operator);
        if max_loops > MAX_LEVERAGE_LOOPS {
            self.env().revert(VaultError::InvalidConfig);
        }
        let mut config = self.get_config();
        config.max_loops = max_loops;
        self.config.set(config);
    }

    pub fn set_permissionless_harvest(&mut self, enabled: bool) {
        self.grants.require(Capability::Operator);
        let mut config = self.get_config();
        config.permissionless_harvest = enabled;
        self.config.set(config);
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

impl CrossChainVault {
    fn exposure(&self) -> Exposure {
        let position = self.get_position();
        Exposure {
            collateral: position.collateral_balance,
            debt12: position.debt_value,
        }
    }

    fn bridge_address(&self) -> Address {
        self.bridge
            .get()
            .unwrap_or_else(|| self.env().revert(VaultError::InvalidConfig))
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
