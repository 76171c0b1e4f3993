//! Deposit allocation planning.
//!
//! Splits an incoming deposit into a reserve portion and per-strategy
//! portions. Non-reserve capital is divided over the enabled strategies in
//! proportion to their bps relative to the enabled total, so any bps left
//! unassigned below 10000 is absorbed pro rata. The last enabled strategy
//! takes the true remainder, leaving no rounding dust in the vault.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::VaultError;
use crate::types::StrategyEntry;
use crate::units::{bps_of, mul_div};

/// Amount routed to a single strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationSlice {
    pub strategy_id: u32,
    pub adapter: Address,
    pub amount: U256,
}

/// Full split of a deposit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationPlan {
    pub reserve: U256,
    pub slices: Vec<AllocationSlice>,
}

impl AllocationPlan {
    /// Sum of strategy portions
    pub fn invested(&self) -> U256 {
        self.slices
            .iter()
            .fold(U256::zero(), |acc, slice| acc + slice.amount)
    }
}

/// Plan how `deposit` is split between the reserve and `strategies`.
///
/// `strategies` is the registry in order; disabled entries are ignored.
pub fn plan_allocation(
    deposit: U256,
    reserve_bps: u32,
    strategies: &[StrategyEntry],
) -> Result<AllocationPlan, VaultError> {
    if deposit.is_zero() {
        return Err(VaultError::InvalidAmount);
    }

    let enabled: Vec<&StrategyEntry> = strategies.iter().filter(|s| s.enabled).collect();
    let total_enabled_bps: u64 = enabled.iter().map(|s| s.allocation_bps as u64).sum();

    if enabled.is_empty() || total_enabled_bps == 0 {
        return Ok(AllocationPlan {
            reserve: deposit,
            slices: Vec::new(),
        });
    }

    let reserve = bps_of(deposit, reserve_bps);
    let remaining = deposit - reserve;

    let mut slices = Vec::with_capacity(enabled.len());
    let mut assigned = U256::zero();
    let last = enabled.len() - 1;

    for (index, strategy) in enabled.iter().enumerate() {
        let amount = if index == last {
            remaining - assigned
        } else {
            mul_div(
                remaining,
                U256::from(strategy.allocation_bps),
                U256::from(total_enabled_bps),
            )
            .ok_or(VaultError::ArithmeticOverflow)?
        };
        assigned += amount;
        slices.push(AllocationSlice {
            strategy_id: strategy.id,
            adapter: strategy.adapter,
            amount,
        });
    }

    Ok(AllocationPlan { reserve, slices })
}
