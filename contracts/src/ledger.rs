//! Share/asset accounting.
//!
//! Both directions round down, so rounding can only move value from the
//! redeemer to the vault and a deposit followed by an immediate redemption
//! never returns more than was deposited.

use odra::casper_types::U256;
use crate::errors::VaultError;
use crate::units::{mul_div, WAD};

/// Shares minted for `assets` deposited into a vault holding `total_assets`
/// against `total_shares`.
///
/// The first deposit is minted 1:1. Shares outstanding against zero assets
/// is an inconsistent state and is rejected with `DivisionDegenerate`.
pub fn shares_for_deposit(
    assets: U256,
    total_assets: U256,
    total_shares: U256,
) -> Result<U256, VaultError> {
    if total_shares.is_zero() {
        return Ok(assets);
    }
    if total_assets.is_zero() {
        return Err(VaultError::DivisionDegenerate);
    }
    mul_div(assets, total_shares, total_assets).ok_or(VaultError::ArithmeticOverflow)
}

/// Assets redeemable for `shares`.
pub fn assets_for_shares(
    shares: U256,
    total_assets: U256,
    total_shares: U256,
) -> Result<U256, VaultError> {
    if total_shares.is_zero() {
        return Ok(U256::zero());
    }
    mul_div(shares, total_assets, total_shares).ok_or(VaultError::ArithmeticOverflow)
}

/// Assets per share scaled by 1e18. 1.0 before the first deposit.
pub fn share_price(total_assets: U256, total_shares: U256) -> U256 {
    if total_shares.is_zero() {
        return U256::from(WAD);
    }
    mul_div(total_assets, U256::from(WAD), total_shares).unwrap_or(U256::MAX)
}
