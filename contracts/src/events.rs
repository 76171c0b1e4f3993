//! Events emitted by the vaults.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::access_control::Capability;
use crate::types::PriceSource;

#[odra::event]
pub struct Deposited {
    pub caller: Address,
    pub receiver: Address,
    pub assets: U256,
    pub shares: U256,
    pub reserve_portion: U256,
}

#[odra::event]
pub struct Withdrawn {
    pub owner: Address,
    pub receiver: Address,
    pub shares: U256,
    pub assets: U256,
    pub from_strategies: U256,
}

#[odra::event]
pub struct StrategyInvested {
    pub strategy_id: u32,
    pub amount: U256,
}

#[odra::event]
pub struct StrategyDivested {
    pub strategy_id: u32,
    pub requested: U256,
    pub returned: U256,
}

#[odra::event]
pub struct StrategyAdded {
    pub strategy_id: u32,
    pub adapter: Address,
    pub allocation_bps: u32,
    pub version: u64,
}

#[odra::event]
pub struct StrategyUpdated {
    pub strategy_id: u32,
    pub allocation_bps: u32,
    pub enabled: bool,
    pub version: u64,
}

#[odra::event]
pub struct ReserveBpsUpdated {
    pub reserve_bps: u32,
    pub version: u64,
}

#[odra::event]
pub struct Rebalanced {
    pub recalled: U256,
    pub invested: U256,
}

#[odra::event]
pub struct CapabilityGranted {
    pub capability: Capability,
    pub account: Address,
}

#[odra::event]
pub struct CapabilityRevoked {
    pub capability: Capability,
    pub account: Address,
}

#[odra::event]
pub struct LeveragedDeposit {
    pub receiver: Address,
    pub collateral: U256,
    pub shares: U256,
    pub borrowed: U256,
    pub bridged: U256,
    pub loops_executed: u8,
    pub price: U256,
    pub price_source: PriceSource,
}

/// A loop step was refused because it would leave the health factor at or below 1.0
#[odra::event]
pub struct LoopHalted {
    pub step: u8,
    pub health_factor: U256,
}

#[odra::event]
pub struct Harvested {
    pub profit: U256,
    pub debt_repaid: U256,
    pub collateral_added: U256,
    pub debt_after: U256,
    pub price_source: PriceSource,
}

#[odra::event]
pub struct CollateralSettled {
    pub amount: U256,
    pub unsettled_after: U256,
}

#[odra::event]
pub struct CollateralWithdrawn {
    pub owner: Address,
    pub receiver: Address,
    pub shares: U256,
    pub assets: U256,
}
