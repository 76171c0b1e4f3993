//! Vault error definitions.

use odra::prelude::*;

/// Vault errors
#[repr(u16)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum VaultError {
    // Amount errors (1xx)
    InvalidAmount = 100,
    InsufficientShares = 101,
    InsufficientAllowance = 102,

    // Registry errors (2xx)
    InvalidAllocation = 200,
    StrategyNotFound = 201,
    StrategyAlreadyExists = 202,
    TooManyStrategies = 203,

    // Liquidity errors (3xx)
    InsufficientLiquidity = 300,

    // Access control errors (4xx)
    Unauthorized = 400,
    ReentrantCall = 401,

    // Oracle errors (5xx)
    OraclePriceUnavailable = 500,

    // Leverage errors (6xx)
    HealthFactorViolation = 600,
    TooManyLoops = 601,

    // Arithmetic errors (7xx)
    DivisionDegenerate = 700,
    ArithmeticOverflow = 701,

    // Configuration errors (9xx)
    InvalidConfig = 900,
}

impl VaultError {
    pub const fn message(&self) -> &'static str {
        match self {
            VaultError::InvalidAmount => "Invalid amount",
            VaultError::InsufficientShares => "Insufficient share balance",
            VaultError::InsufficientAllowance => "Insufficient share allowance",

            VaultError::InvalidAllocation => "Allocation exceeds available basis points",
            VaultError::StrategyNotFound => "Strategy not found",
            VaultError::StrategyAlreadyExists => "Strategy id already registered",
            VaultError::TooManyStrategies => "Strategy registry is full",

            VaultError::InsufficientLiquidity => "Insufficient liquidity to serve withdrawal",

            VaultError::Unauthorized => "Unauthorized: caller lacks capability",
            VaultError::ReentrantCall => "Reentrant call rejected",

            VaultError::OraclePriceUnavailable => "Oracle price unavailable",

            VaultError::HealthFactorViolation => "Health factor would fall to or below 1.0",
            VaultError::TooManyLoops => "Requested loops exceed configured maximum",

            VaultError::DivisionDegenerate => "Shares outstanding against zero assets",
            VaultError::ArithmeticOverflow => "Arithmetic overflow",

            VaultError::InvalidConfig => "Invalid configuration parameter",
        }
    }
}

impl core::fmt::Display for VaultError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

impl From<VaultError> for OdraError {
    fn from(error: VaultError) -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            OdraError::user(error as u16)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            OdraError::user(error as u16, error.message())
        }
    }
}
