//! CrossChainVault scenarios.
//!
//! At the fallback price of $119,670 one native unit (1e9) is worth
//! 119_670e12 in debt precision, and the default 20% LTV borrows 23_934e12.

use crate::fixtures::{cross_chain, cross_chain_with, motes, u, CrossChainSetup, ONE};
use lava_vault_contracts::access_control::Capability;
use lava_vault_contracts::errors::VaultError;
use lava_vault_contracts::types::{CrossChainConfig, CrossChainPosition, HarvestReport, PriceSource};
use lava_vault_contracts::units::{pow10, WAD};
use odra::casper_types::U256;
use odra::host::HostRef;
use odra::prelude::*;
use pretty_assertions::assert_eq;

fn usd12(dollars: u64) -> U256 {
    U256::from(dollars) * pow10(12)
}

fn usd6(dollars: u64) -> U256 {
    U256::from(dollars) * pow10(6)
}

fn deposit(setup: &mut CrossChainSetup, amount: u64, loops: u8) -> U256 {
    let user = setup.user;
    setup.env.set_caller(user);
    setup.vault.with_tokens(motes(amount)).deposit(loops, user)
}

/// Deposit 1 unit with 3 loops
fn looped(setup: &mut CrossChainSetup) {
    deposit(setup, ONE, 3);
}

#[test]
fn test_deposit_without_loops_bridges_borrow() {
    let mut setup = cross_chain();
    let minted = deposit(&mut setup, ONE, 0);

    assert_eq!(minted, u(ONE));
    assert_eq!(
        setup.vault.get_position(),
        CrossChainPosition {
            collateral_balance: u(ONE),
            debt_value: usd12(23_934),
            bridged_value: usd6(23_934),
            unsettled_collateral: U256::zero(),
        }
    );
    let vault = setup.vault.address().clone();
    assert_eq!(setup.bridge.principal_of(vault), usd6(23_934));
    // 0.8 * 119,670 / 23,934 = 4.0
    assert_eq!(setup.vault.get_health_factor(), U256::from(4u64) * U256::from(WAD));
    // The bridged $23,934 offsets the debt: NAV equals the deposit
    assert_eq!(setup.vault.total_assets(), u(ONE));
    assert_eq!(setup.vault.share_price(), U256::from(WAD));
}

#[test]
fn test_loops_compound_position() {
    let mut setup = cross_chain();
    looped(&mut setup);

    // Loop borrows 4,786.8 + 957.36 + 191.472 on top of the 23,934 seed
    let position = setup.vault.get_position();
    assert_eq!(position.collateral_balance, u(1_049_600_000));
    assert_eq!(position.unsettled_collateral, u(49_600_000));
    assert_eq!(position.debt_value, U256::from(29_869_632u64) * pow10(9));
    assert_eq!(position.bridged_value, usd6(23_934));

    // Loop steps add collateral and debt of equal value, NAV is unchanged
    assert_eq!(setup.vault.total_assets(), u(ONE));
    assert_eq!(setup.vault.share_price(), U256::from(WAD));
    assert!(!setup.env.emitted(&setup.vault, "LoopHalted"));
}

#[test]
fn test_loop_stops_before_unhealthy_step() {
    let config = CrossChainConfig {
        ltv_bps: 7000,
        max_loops: 10,
        ..CrossChainConfig::default()
    };
    let mut setup = cross_chain_with(config);
    deposit(&mut setup, ONE, 5);

    // Seed 70%, one loop of 49%; the second loop would take HF below 1.0
    let position = setup.vault.get_position();
    assert_eq!(position.debt_value, usd12(83_769) + U256::from(58_638_300u64) * pow10(9));
    assert_eq!(position.collateral_balance, u(1_490_000_000));
    assert!(setup.env.emitted(&setup.vault, "LoopHalted"));
    assert!(setup.vault.get_health_factor() > U256::from(WAD));
}

#[test]
fn test_deposits_leave_share_price_unchanged() {
    let mut setup = cross_chain();
    assert_eq!(setup.vault.share_price(), U256::from(WAD));

    deposit(&mut setup, ONE, 0);
    assert_eq!(setup.vault.share_price(), U256::from(WAD));

    let second = setup.env.get_account(3);
    setup.env.set_caller(second);
    let minted = setup.vault.with_tokens(motes(ONE)).deposit(3, second);

    assert_eq!(minted, u(ONE));
    assert_eq!(setup.vault.share_price(), U256::from(WAD));
    assert_eq!(setup.vault.total_assets(), u(2 * ONE));
    assert_eq!(setup.vault.balance_of(setup.user), u(ONE));
}

#[test]
fn test_deposit_then_withdraw_never_gains() {
    let mut setup = cross_chain();
    looped(&mut setup);

    let depositor = setup.env.get_account(3);
    let receiver = setup.env.get_account(5);
    let before = setup.env.balance_of(&receiver);
    let deposited = ONE / 2;

    setup.env.set_caller(depositor);
    let minted = setup.vault.with_tokens(motes(deposited)).deposit(0, depositor);
    let paid = setup.vault.withdraw(minted, receiver);

    assert!(paid <= u(deposited));
    assert_eq!(paid, u(deposited));
    assert_eq!(setup.env.balance_of(&receiver), before + motes(deposited));
    assert_eq!(setup.vault.balance_of(depositor), U256::zero());
    assert_eq!(setup.vault.share_price(), U256::from(WAD));
}

#[test]
fn test_deposit_argument_checks() {
    let mut setup = cross_chain();
    let user = setup.user;

    assert_eq!(
        setup.vault.with_tokens(motes(ONE)).try_deposit(4, user),
        Err(VaultError::TooManyLoops.into())
    );
    assert_eq!(
        setup.vault.with_tokens(motes(0)).try_deposit(1, user),
        Err(VaultError::InvalidAmount.into())
    );
    assert_eq!(setup.vault.total_shares(), U256::zero());
}

#[test]
fn test_harvest_without_profit_is_noop() {
    let mut setup = cross_chain();
    looped(&mut setup);
    let before = setup.vault.get_position();

    let report = setup.vault.harvest_cross_chain_yield();

    assert_eq!(report, HarvestReport::default());
    assert_eq!(setup.vault.get_position(), before);
    assert!(!setup.env.emitted(&setup.vault, "Harvested"));
}

#[test]
fn test_harvest_profit_above_debt_compounds() {
    let mut setup = cross_chain();
    looped(&mut setup);
    let shares_before = setup.vault.total_shares();

    // Debt 29,869.632 plus 11,967 of surplus = 0.1 unit at $119,670
    let profit = U256::from(41_836_632_000u64);
    setup.env.set_caller(setup.admin);
    let vault = setup.vault.address().clone();
    setup.bridge.accrue_yield(vault, profit);

    setup.env.set_caller(setup.user);
    let report = setup.vault.harvest_cross_chain_yield();

    assert_eq!(report.profit, profit);
    assert_eq!(report.debt_repaid, U256::from(29_869_632u64) * pow10(9));
    assert_eq!(report.collateral_added, u(100_000_000));

    let position = setup.vault.get_position();
    assert_eq!(position.debt_value, U256::zero());
    assert_eq!(position.collateral_balance, u(1_149_600_000));
    assert_eq!(position.unsettled_collateral, u(149_600_000));
    assert_eq!(position.bridged_value, usd6(23_934));
    assert_eq!(setup.vault.total_shares(), shares_before);
    // 1.1496e9 of collateral plus 0.2e9 of bridged principal
    assert_eq!(setup.vault.total_assets(), u(1_349_600_000));
    assert!(setup.vault.share_price() > U256::from(WAD));
    assert_eq!(setup.vault.get_health_factor(), U256::MAX);
    assert_eq!(setup.bridge.balance_for(vault), usd6(23_934));
}

#[test]
fn test_harvest_profit_below_debt_only_repays() {
    let mut setup = cross_chain();
    deposit(&mut setup, ONE, 0);

    setup.env.set_caller(setup.admin);
    let vault = setup.vault.address().clone();
    setup.bridge.accrue_yield(vault, usd6(1_000));

    setup.env.set_caller(setup.user);
    let report = setup.vault.harvest_cross_chain_yield();

    assert_eq!(report.debt_repaid, usd12(1_000));
    assert_eq!(report.collateral_added, U256::zero());
    assert_eq!(setup.vault.total_debt_usd(), usd12(22_934));
    assert_eq!(setup.vault.total_collateral(), u(ONE));
}

#[test]
fn test_permissioned_harvest_needs_harvester() {
    let mut setup = cross_chain();
    deposit(&mut setup, ONE, 0);

    setup.env.set_caller(setup.operator);
    setup.vault.set_permissionless_harvest(false);

    setup.env.set_caller(setup.user);
    assert_eq!(
        setup.vault.try_harvest_cross_chain_yield(),
        Err(VaultError::Unauthorized.into())
    );

    setup.env.set_caller(setup.admin);
    let user = setup.user;
    setup.vault.grant_capability(Capability::Harvester, user);

    setup.env.set_caller(user);
    assert_eq!(setup.vault.harvest_cross_chain_yield(), HarvestReport::default());
}

#[test]
fn test_withdraw_pays_share_of_nav() {
    let mut setup = cross_chain();
    deposit(&mut setup, ONE, 0);
    let receiver = setup.env.get_account(5);
    let before = setup.env.balance_of(&receiver);

    // Half the shares of a 1e9 NAV
    let paid = setup.vault.withdraw(u(ONE / 2), receiver);

    assert_eq!(paid, u(500_000_000));
    assert_eq!(setup.env.balance_of(&receiver), before + motes(500_000_000));
    assert_eq!(setup.vault.total_collateral(), u(500_000_000));
    assert_eq!(setup.vault.total_debt_usd(), usd12(23_934));
    assert_eq!(setup.vault.total_assets(), u(500_000_000));
    assert_eq!(setup.vault.share_price(), U256::from(WAD));
}

#[test]
fn test_withdraw_rejected_while_debt_needs_collateral() {
    let mut setup = cross_chain();
    deposit(&mut setup, ONE, 0);
    let receiver = setup.user;

    // Pays out all custody and leaves nothing against $23,934 of debt
    assert_eq!(
        setup.vault.try_withdraw(u(ONE), receiver),
        Err(VaultError::HealthFactorViolation.into())
    );
    assert_eq!(setup.vault.total_collateral(), u(ONE));
}

#[test]
fn test_unsettled_collateral_gates_withdrawal() {
    let mut setup = cross_chain();
    looped(&mut setup);

    setup.env.set_caller(setup.admin);
    let vault = setup.vault.address().clone();
    setup.bridge.accrue_yield(vault, U256::from(41_836_632_000u64));
    setup.env.set_caller(setup.user);
    setup.vault.harvest_cross_chain_yield();

    // 80% of a 1.3496e9 NAV is 1.07968e9, but only 1e9 is in custody
    let receiver = setup.env.get_account(5);
    let shares = u(800_000_000);
    assert_eq!(
        setup.vault.try_withdraw(shares, receiver),
        Err(VaultError::InsufficientLiquidity.into())
    );

    let settler = setup.env.get_account(3);
    setup.env.set_caller(setup.admin);
    setup.vault.grant_capability(Capability::Settler, settler);

    setup.env.set_caller(settler);
    assert_eq!(
        setup.vault.with_tokens(motes(149_600_001)).try_settle_collateral(),
        Err(VaultError::InvalidAmount.into())
    );
    setup.vault.with_tokens(motes(149_600_000)).settle_collateral();
    assert_eq!(setup.vault.get_position().unsettled_collateral, U256::zero());

    setup.env.set_caller(setup.user);
    let before = setup.env.balance_of(&receiver);
    let paid = setup.vault.withdraw(shares, receiver);
    assert_eq!(paid, u(1_079_680_000));
    assert_eq!(setup.env.balance_of(&receiver), before + motes(1_079_680_000));
    assert_eq!(setup.vault.total_shares(), u(200_000_000));
}

#[test]
fn test_settle_requires_settler() {
    let mut setup = cross_chain();
    looped(&mut setup);
    assert_eq!(
        setup.vault.with_tokens(motes(1_000)).try_settle_collateral(),
        Err(VaultError::Unauthorized.into())
    );
}

#[test]
fn test_price_falls_back_without_oracle() {
    let setup = cross_chain();
    let quote = setup.vault.get_price_or_fallback();

    assert_eq!(quote.value, U256::from(119_670u64) * pow10(8));
    assert_eq!(quote.source, PriceSource::Fallback);
    assert!(quote.degraded);
}

#[test]
fn test_fresh_oracle_price_used_until_stale() {
    let mut setup = cross_chain();
    let price = U256::from(100_000u64) * pow10(8);

    setup.env.set_caller(setup.admin);
    let now = setup.env.block_time();
    setup.oracle.set_value(String::from("BTCUSD"), price, now);

    setup.env.set_caller(setup.operator);
    setup.vault.set_oracle(Some(setup.oracle.address().clone()));

    let quote = setup.vault.get_price_or_fallback();
    assert_eq!(quote.value, price);
    assert_eq!(quote.source, PriceSource::Oracle);
    assert!(!quote.degraded);

    // At $100,000 one unit borrows $20,000
    deposit(&mut setup, ONE, 0);
    assert_eq!(setup.vault.total_debt_usd(), usd12(20_000));

    setup.env.advance_block_time(3_600_001);
    let quote = setup.vault.get_price_or_fallback();
    assert_eq!(quote.source, PriceSource::Fallback);
    assert_eq!(quote.value, U256::from(119_670u64) * pow10(8));
}

#[test]
fn test_zero_oracle_value_falls_back() {
    let mut setup = cross_chain();
    setup.env.set_caller(setup.operator);
    setup.vault.set_oracle(Some(setup.oracle.address().clone()));

    // Never fed: the oracle reports (0, 0)
    assert_eq!(setup.vault.get_price_or_fallback().source, PriceSource::Fallback);
}

#[test]
fn test_oversized_oracle_value_falls_back() {
    let mut setup = cross_chain();
    deposit(&mut setup, ONE, 0);

    setup.env.set_caller(setup.admin);
    let now = setup.env.block_time();
    setup.oracle.set_value(String::from("BTCUSD"), U256::MAX / u(10), now);
    setup.env.set_caller(setup.operator);
    setup.vault.set_oracle(Some(setup.oracle.address().clone()));

    let quote = setup.vault.get_price_or_fallback();
    assert_eq!(quote.source, PriceSource::Fallback);
    assert_eq!(quote.value, U256::from(119_670u64) * pow10(8));
    assert_eq!(setup.vault.get_health_factor(), U256::from(4u64) * U256::from(WAD));
    assert_eq!(setup.vault.total_assets(), u(ONE));
}

#[test]
fn test_lever_up_guard() {
    let mut setup = cross_chain();
    deposit(&mut setup, ONE, 0);
    let before = setup.vault.get_position();

    setup.env.set_caller(setup.operator);
    assert_eq!(
        setup.vault.try_lever_up(usd12(500_000)),
        Err(VaultError::HealthFactorViolation.into())
    );
    assert_eq!(setup.vault.get_position(), before);

    // +$11,967 on both sides = +0.1 unit of collateral
    let health_factor = setup.vault.lever_up(usd12(11_967));
    let position = setup.vault.get_position();
    assert_eq!(position.collateral_balance, u(1_100_000_000));
    assert_eq!(position.unsettled_collateral, u(100_000_000));
    assert_eq!(position.debt_value, usd12(35_901));
    assert_eq!(health_factor, setup.vault.get_health_factor());
}

#[test]
fn test_operator_settings() {
    let mut setup = cross_chain();

    setup.env.set_caller(setup.user);
    assert_eq!(setup.vault.try_set_max_loops(5), Err(VaultError::Unauthorized.into()));
    assert_eq!(setup.vault.try_lever_up(usd12(1)), Err(VaultError::Unauthorized.into()));

    setup.env.set_caller(setup.operator);
    assert_eq!(setup.vault.try_set_max_loops(11), Err(VaultError::InvalidConfig.into()));
    setup.vault.set_max_loops(5);
    assert_eq!(setup.vault.get_config().max_loops, 5);
}

#[test]
fn test_leverage_ratio() {
    let mut setup = cross_chain();
    assert_eq!(setup.vault.get_leverage_ratio(), U256::from(WAD));

    deposit(&mut setup, ONE, 0);
    // 119,670 / (119,670 - 23,934) = 1.25
    assert_eq!(
        setup.vault.get_leverage_ratio(),
        U256::from(WAD) * u(5) / u(4)
    );
}
