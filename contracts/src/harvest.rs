//! Harvest planning.
//!
//! Realized profit repays debt first; whatever is left is converted into
//! collateral, which raises NAV while the share count stays the same.

use odra::casper_types::U256;
use crate::types::{CrossChainPosition, HarvestReport};
use crate::units::{usd12_to_collateral, usd6_to_usd12};

/// Profit attributable to the bridged principal (USD, 6 decimals)
pub fn accrued_profit(yield_balance6: U256, bridged_value6: U256) -> U256 {
    yield_balance6.saturating_sub(bridged_value6)
}

/// Apply `realized6` of profit to `position` at `price8`.
///
/// Returns the updated position and what was done. A zero profit leaves the
/// position untouched.
pub fn apply_harvest(
    position: &CrossChainPosition,
    realized6: U256,
    price8: U256,
    asset_decimals: u8,
) -> (CrossChainPosition, HarvestReport) {
    if realized6.is_zero() {
        return (position.clone(), HarvestReport::default());
    }

    let profit12 = usd6_to_usd12(realized6);
    let debt_repaid = profit12.min(position.debt_value);
    let remainder12 = profit12 - debt_repaid;
    let collateral_added = usd12_to_collateral(remainder12, price8, asset_decimals);

    let mut next = position.clone();
    next.debt_value -= debt_repaid;
    next.collateral_balance += collateral_added;
    next.unsettled_collateral += collateral_added;

    (
        next,
        HarvestReport {
            profit: realized6,
            debt_repaid,
            collateral_added,
        },
    )
}
