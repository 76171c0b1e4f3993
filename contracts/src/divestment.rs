//! Withdrawal liquidity planning.
//!
//! A withdrawal is served from the reserve when it can be. Otherwise the
//! shortfall is pulled from the enabled strategies in proportion to their
//! balances, with the last eligible strategy asked for whatever is still
//! missing. The round only tracks requests and results; the caller executes
//! the adapter calls and reverts when `settle` reports a shortfall.

use odra::casper_types::U256;
use crate::errors::VaultError;
use crate::units::mul_div;

/// How a withdrawal of `requested` assets is funded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawalSource {
    /// The reserve covers it in full
    Reserve,
    /// Strategies must supply `need` on top of the whole reserve
    Divest { need: U256 },
}

/// Decide whether a withdrawal needs strategy liquidity.
///
/// Fails early with `InsufficientLiquidity` when reserve and strategies
/// together cannot cover the request.
pub fn withdrawal_source(
    requested: U256,
    reserve: U256,
    strategy_assets: U256,
) -> Result<WithdrawalSource, VaultError> {
    if requested <= reserve {
        return Ok(WithdrawalSource::Reserve);
    }
    let need = requested - reserve;
    if strategy_assets.is_zero() || need > strategy_assets {
        return Err(VaultError::InsufficientLiquidity);
    }
    Ok(WithdrawalSource::Divest { need })
}

/// Progress of a proportional divestment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivestmentRound {
    need: U256,
    total_strategy_assets: U256,
    returned: U256,
}

impl DivestmentRound {
    /// Start a round for `need` over strategies holding `total_strategy_assets`.
    pub fn open(need: U256, total_strategy_assets: U256) -> Result<Self, VaultError> {
        if total_strategy_assets.is_zero() {
            return Err(VaultError::InsufficientLiquidity);
        }
        Ok(Self {
            need,
            total_strategy_assets,
            returned: U256::zero(),
        })
    }

    /// Amount to request from a strategy holding `strategy_assets`.
    ///
    /// Proportional share of the need, rounded down, except for the last
    /// eligible strategy which is asked for the exact remaining shortfall.
    pub fn request_for(&self, strategy_assets: U256, is_last: bool) -> Result<U256, VaultError> {
        if is_last {
            return Ok(self.shortfall());
        }
        mul_div(self.need, strategy_assets, self.total_strategy_assets)
            .ok_or(VaultError::ArithmeticOverflow)
    }

    /// Record what a strategy actually returned.
    pub fn record(&mut self, actual_returned: U256) {
        self.returned += actual_returned;
    }

    /// Still missing after the returns recorded so far
    pub fn shortfall(&self) -> U256 {
        self.need.saturating_sub(self.returned)
    }

    /// Total returned by strategies so far
    pub fn returned(&self) -> U256 {
        self.returned
    }

    /// Close the round, failing when the need was not met.
    pub fn settle(&self) -> Result<U256, VaultError> {
        if self.returned < self.need {
            return Err(VaultError::InsufficientLiquidity);
        }
        Ok(self.returned)
    }
}
