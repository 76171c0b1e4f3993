//! Leverage math for the cross-chain vault.
//!
//! Health factor and leverage ratio are scaled by 1e18. A position with no
//! debt has a health factor of `U256::MAX`.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::VaultError;
use crate::types::CrossChainConfig;
use crate::units::{
    bps_of, collateral_to_usd12, mul_div, price_to_usd12, usd12_to_collateral, usd6_to_usd12, WAD,
};

/// Hard upper bound on loops per deposit
pub const MAX_LEVERAGE_LOOPS: u8 = 10;

/// Health factor = risk-adjusted collateral value / debt
pub fn health_factor(collateral_value12: U256, debt12: U256, liquidation_threshold_bps: u32) -> U256 {
    if debt12.is_zero() {
        return U256::MAX;
    }
    let adjusted = bps_of(collateral_value12, liquidation_threshold_bps);
    mul_div(adjusted, U256::from(WAD), debt12).unwrap_or(U256::MAX)
}

/// Whether a health factor is strictly above 1.0
pub fn is_healthy(health_factor: U256) -> bool {
    health_factor > U256::from(WAD)
}

/// Leverage ratio = collateral value / equity
pub fn leverage_ratio(collateral_value12: U256, debt12: U256) -> U256 {
    if collateral_value12.is_zero() {
        return U256::from(WAD);
    }
    if collateral_value12 <= debt12 {
        return U256::MAX;
    }
    mul_div(collateral_value12, U256::from(WAD), collateral_value12 - debt12).unwrap_or(U256::MAX)
}

/// Check the configured loan parameters.
pub fn validate_config(config: &CrossChainConfig) -> Result<(), VaultError> {
    if config.ltv_bps == 0
        || config.ltv_bps >= config.liquidation_threshold_bps
        || config.liquidation_threshold_bps > 10_000
        || config.max_loops > MAX_LEVERAGE_LOOPS
        || config.fallback_price.is_zero()
        || price_to_usd12(config.fallback_price).is_none()
    {
        return Err(VaultError::InvalidConfig);
    }
    Ok(())
}

/// Collateral and debt being priced together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exposure {
    pub collateral: U256,
    pub debt12: U256,
}

impl Exposure {
    pub fn health_factor(&self, price8: U256, config: &CrossChainConfig) -> U256 {
        let value = collateral_to_usd12(self.collateral, price8, config.asset_decimals);
        health_factor(value, self.debt12, config.liquidation_threshold_bps)
    }

    /// Net asset value in collateral units: collateral plus the principal
    /// held at the yield source, less the debt, saturating at zero.
    ///
    /// Borrowing and bridging add the same value on both sides, so only
    /// harvested yield and price moves change it.
    pub fn net_assets(&self, bridged6: U256, price8: U256, config: &CrossChainConfig) -> U256 {
        let bridged_units = usd12_to_collateral(usd6_to_usd12(bridged6), price8, config.asset_decimals);
        let debt_units = usd12_to_collateral(self.debt12, price8, config.asset_decimals);
        (self.collateral + bridged_units).saturating_sub(debt_units)
    }
}

/// One supply/borrow step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopStep {
    /// Value borrowed (USD, 12 decimals)
    pub borrowed12: U256,
    /// Collateral supplied with the borrowed value
    pub collateral_added: U256,
}

/// Result of planning the loops of a deposit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopOutcome {
    pub steps: Vec<LoopStep>,
    /// Health factor of the step that was refused, if the guard stopped the loop
    pub halted_at: Option<U256>,
    pub exposure: Exposure,
}

/// Apply one forced step, rejecting it if it would leave the health factor
/// at or below 1.0.
pub fn forced_step(
    exposure: Exposure,
    borrow12: U256,
    price8: U256,
    config: &CrossChainConfig,
) -> Result<(Exposure, LoopStep), VaultError> {
    let collateral_added = usd12_to_collateral(borrow12, price8, config.asset_decimals);
    if borrow12.is_zero() || collateral_added.is_zero() {
        return Err(VaultError::InvalidAmount);
    }
    let next = Exposure {
        collateral: exposure.collateral + collateral_added,
        debt12: exposure.debt12 + borrow12,
    };
    if !is_healthy(next.health_factor(price8, config)) {
        return Err(VaultError::HealthFactorViolation);
    }
    Ok((
        next,
        LoopStep {
            borrowed12: borrow12,
            collateral_added,
        },
    ))
}

/// Plan up to `loops` steps after the seed borrow.
///
/// Step k borrows `ltv` of the previous borrow and supplies its collateral
/// equivalent. The guard is evaluated before each step; a step that would
/// leave the health factor at or below 1.0 is skipped and ends the loop.
pub fn plan_loops(
    start: Exposure,
    seed_borrow12: U256,
    loops: u8,
    price8: U256,
    config: &CrossChainConfig,
) -> LoopOutcome {
    let mut exposure = start;
    let mut steps = Vec::new();
    let mut halted_at = None;
    let mut previous = seed_borrow12;

    for _ in 0..loops {
        let borrow12 = bps_of(previous, config.ltv_bps);
        let collateral_added = usd12_to_collateral(borrow12, price8, config.asset_decimals);
        if borrow12.is_zero() || collateral_added.is_zero() {
            break;
        }
        let next = Exposure {
            collateral: exposure.collateral + collateral_added,
            debt12: exposure.debt12 + borrow12,
        };
        let hf = next.health_factor(price8, config);
        if !is_healthy(hf) {
            halted_at = Some(hf);
            break;
        }
        exposure = next;
        steps.push(LoopStep {
            borrowed12: borrow12,
            collateral_added,
        });
        previous = borrow12;
    }

    LoopOutcome {
        steps,
        halted_at,
        exposure,
    }
}
