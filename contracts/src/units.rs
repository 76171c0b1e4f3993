//! Fixed-point unit conversions shared by the vaults.
//!
//! Three precisions meet here:
//! - collateral amounts in asset-native decimals (motes, 9 decimals by default)
//! - oracle prices in USD with 8 decimals
//! - debt in USD with 12 decimals, bridged value in USD with 6 decimals

use odra::casper_types::{U256, U512};

/// Basis points scale (100% = 10000 bps)
pub const BPS_SCALE: u32 = 10_000;

/// Ratio scale (1e18 = 1.0)
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Decimals of oracle prices
pub const PRICE_DECIMALS: u32 = 8;

/// Decimals of the debt ledger
pub const DEBT_DECIMALS: u32 = 12;

/// Decimals of value sent over the bridge
pub const BRIDGE_DECIMALS: u32 = 6;

/// 10^exp as U256
pub fn pow10(exp: u32) -> U256 {
    U256::exp10(exp as usize)
}

/// floor(amount * bps / 10000)
pub fn bps_of(amount: U256, bps: u32) -> U256 {
    mul_div(amount, U256::from(bps), U256::from(BPS_SCALE)).unwrap_or(U256::MAX)
}

/// floor(a * b / denominator) with a 512-bit intermediate.
///
/// Returns `None` on a zero denominator or when the quotient does not fit 256 bits.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Option<U256> {
    if denominator.is_zero() {
        return None;
    }
    let quotient = u256_to_u512(a) * u256_to_u512(b) / u256_to_u512(denominator);
    if quotient > u256_to_u512(U256::MAX) {
        return None;
    }
    Some(u512_to_u256(quotient))
}

/// Collateral amount to USD with 12 decimals.
///
/// `value12 = amount * price8 * 10^(12 - 8) / 10^asset_decimals`
pub fn collateral_to_usd12(amount: U256, price8: U256, asset_decimals: u8) -> U256 {
    match price_to_usd12(price8) {
        Some(scaled_price) => {
            mul_div(amount, scaled_price, pow10(asset_decimals as u32)).unwrap_or(U256::MAX)
        }
        None if amount.is_zero() => U256::zero(),
        None => U256::MAX,
    }
}

/// USD with 12 decimals to collateral amount, rounded down.
pub fn usd12_to_collateral(value12: U256, price8: U256, asset_decimals: u8) -> U256 {
    if price8.is_zero() {
        return U256::zero();
    }
    match price_to_usd12(price8) {
        Some(scaled_price) => {
            mul_div(value12, pow10(asset_decimals as u32), scaled_price).unwrap_or(U256::MAX)
        }
        None => U256::zero(),
    }
}

/// 8-decimal price rescaled to debt precision, `None` if it does not fit 256 bits.
pub fn price_to_usd12(price8: U256) -> Option<U256> {
    price8.checked_mul(pow10(DEBT_DECIMALS - PRICE_DECIMALS))
}

/// Debt precision to bridge precision, rounded down.
pub fn usd12_to_usd6(value12: U256) -> U256 {
    value12 / pow10(DEBT_DECIMALS - BRIDGE_DECIMALS)
}

/// Bridge precision to debt precision.
pub fn usd6_to_usd12(value6: U256) -> U256 {
    value6 * pow10(DEBT_DECIMALS - BRIDGE_DECIMALS)
}

/// Convert U512 to U256 (lower 256 bits)
pub fn u512_to_u256(value: U512) -> U256 {
    let mut bytes = [0u8; 64];
    value.to_little_endian(&mut bytes);
    U256::from_little_endian(&bytes[..32])
}

/// Convert U256 to U512
pub fn u256_to_u512(value: U256) -> U512 {
    let mut bytes = [0u8; 32];
    value.to_little_endian(&mut bytes);
    U512::from_little_endian(&bytes)
}
