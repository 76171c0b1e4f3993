//! Interfaces of the external collaborators the vaults call.

use odra::prelude::*;
use odra::casper_types::U256;

/// Strategy adapter owned by a portfolio vault.
///
/// `invest` receives the amount as attached native value. `divest` sends
/// back at most `requested` and returns what it actually sent.
#[odra::external_contract]
pub trait StrategyAdapter {
    fn total_assets(&self) -> U256;
    fn invest(&mut self);
    fn divest(&mut self, requested: U256) -> U256;
}

/// Bridge to the external yield source. Amounts are USD with 6 decimals.
#[odra::external_contract]
pub trait Bridge {
    fn bridge_out(&mut self, amount: U256);
    /// Release accrued yield above principal back to the caller
    fn bridge_in(&mut self) -> U256;
    /// Value held at the yield source for the caller
    fn balance_of(&self) -> U256;
}

/// Price oracle returning `(value, timestamp)` with 8-decimal values.
#[odra::external_contract]
pub trait PriceOracle {
    fn latest_value(&self, asset_id: String) -> (U256, u64);
}
