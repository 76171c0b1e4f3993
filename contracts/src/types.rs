//! Common types used across the vaults.

use odra::prelude::*;
use odra::casper_types::U256;

/// Strategy registry row
#[odra::odra_type]
pub struct StrategyEntry {
    /// Operator-chosen strategy id
    pub id: u32,
    /// Strategy adapter contract
    pub adapter: Address,
    /// Target share of non-reserve capital, in bps
    pub allocation_bps: u32,
    /// Whether the routers use this strategy
    pub enabled: bool,
}

/// Where a price came from
#[odra::odra_type]
#[derive(Copy)]
pub enum PriceSource {
    /// Fresh value from the configured oracle
    Oracle,
    /// Configured fixed price used while the oracle is unavailable
    Fallback,
}

/// Price resolved for the collateral asset
#[odra::odra_type]
pub struct PriceQuote {
    /// USD price with 8 decimals
    pub value: U256,
    /// Oracle timestamp, or the block time when the fallback was used
    pub timestamp: u64,
    /// Price source
    pub source: PriceSource,
    /// True when the oracle could not be used
    pub degraded: bool,
}

/// Leveraged position of the cross-chain vault
#[odra::odra_type]
#[derive(Default)]
pub struct CrossChainPosition {
    /// Collateral registered with the position (asset decimals)
    pub collateral_balance: U256,
    /// Outstanding debt (USD, 12 decimals)
    pub debt_value: U256,
    /// Principal sent over the bridge (USD, 6 decimals)
    pub bridged_value: U256,
    /// Collateral credited by conversion but not yet delivered to custody
    pub unsettled_collateral: U256,
}

impl CrossChainPosition {
    /// Collateral actually held by the vault
    pub fn custody(&self) -> U256 {
        self.collateral_balance.saturating_sub(self.unsettled_collateral)
    }
}

/// Cross-chain vault configuration
#[odra::odra_type]
pub struct CrossChainConfig {
    /// Oracle asset id for the collateral price
    pub asset_id: String,
    /// Decimals of the collateral asset
    pub asset_decimals: u8,
    /// Loan-to-value used for borrowing, in bps
    pub ltv_bps: u32,
    /// Liquidation threshold used by the health factor, in bps
    pub liquidation_threshold_bps: u32,
    /// Upper bound on loops per deposit
    pub max_loops: u8,
    /// Price used while the oracle is unavailable (8 decimals)
    pub fallback_price: U256,
    /// Oracle values older than this (block time units) are unavailable
    pub max_price_age: u64,
    /// Whether anyone may trigger a harvest
    pub permissionless_harvest: bool,
}

impl Default for CrossChainConfig {
    fn default() -> Self {
        Self {
            asset_id: String::from("BTCUSD"),
            asset_decimals: 9,
            ltv_bps: 2000,
            liquidation_threshold_bps: 8000,
            max_loops: 3,
            fallback_price: U256::from(119_670u64) * U256::from(100_000_000u64),
            max_price_age: 3_600_000,
            permissionless_harvest: true,
        }
    }
}

/// Outcome of a harvest
#[odra::odra_type]
#[derive(Default)]
pub struct HarvestReport {
    /// Profit realized from the yield source (USD, 6 decimals)
    pub profit: U256,
    /// Debt repaid (USD, 12 decimals)
    pub debt_repaid: U256,
    /// Collateral credited from the remainder (asset decimals)
    pub collateral_added: U256,
}
