//! Collateral price resolution with a fixed fallback.
//!
//! A reading is usable when it is nonzero, small enough to rescale to debt
//! precision, and no older than the configured maximum age. Anything else
//! degrades to the configured fallback price instead of failing the caller.

use odra::casper_types::U256;
use crate::errors::VaultError;
use crate::types::{PriceQuote, PriceSource};
use crate::units::price_to_usd12;

/// Raw `(value, timestamp)` reading from the oracle, if one was obtained
pub type OracleReading = Option<(U256, u64)>;

/// Validate a raw reading.
pub fn check_reading(reading: OracleReading, now: u64, max_age: u64) -> Result<(U256, u64), VaultError> {
    match reading {
        Some((value, timestamp))
            if !value.is_zero()
                && price_to_usd12(value).is_some()
                && now.saturating_sub(timestamp) <= max_age =>
        {
            Ok((value, timestamp))
        }
        _ => Err(VaultError::OraclePriceUnavailable),
    }
}

/// Resolve a reading into a quote, falling back to `fallback_price` when it is unusable.
pub fn resolve_price(reading: OracleReading, now: u64, max_age: u64, fallback_price: U256) -> PriceQuote {
    match check_reading(reading, now, max_age) {
        Ok((value, timestamp)) => PriceQuote {
            value,
            timestamp,
            source: PriceSource::Oracle,
            degraded: false,
        },
        Err(_) => PriceQuote {
            value: fallback_price,
            timestamp: now,
            source: PriceSource::Fallback,
            degraded: true,
        },
    }
}
