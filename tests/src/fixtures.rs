//! Deployment helpers shared by the scenario tests.

use lava_vault_contracts::access_control::Capability;
use lava_vault_contracts::cross_chain_vault::{CrossChainVault, CrossChainVaultHostRef, CrossChainVaultInitArgs};
use lava_vault_contracts::mocks::{
    MockBridge, MockBridgeHostRef, MockBridgeInitArgs, MockPriceOracle, MockPriceOracleHostRef,
    MockPriceOracleInitArgs, MockStrategy, MockStrategyHostRef, MockStrategyInitArgs,
};
use lava_vault_contracts::portfolio_vault::{PortfolioVault, PortfolioVaultHostRef, PortfolioVaultInitArgs};
use lava_vault_contracts::types::CrossChainConfig;
use odra::casper_types::{U256, U512};
use odra::host::{Deployer, HostEnv, HostRef};
use odra::prelude::*;

/// One native unit with 9 decimals
pub const ONE: u64 = 1_000_000_000;

pub fn u(value: u64) -> U256 {
    U256::from(value)
}

pub fn motes(value: u64) -> U512 {
    U512::from(value)
}

/// Portfolio vault with the three reference strategies registered at 30/25/25
/// and a 20% reserve.
pub struct PortfolioSetup {
    pub env: HostEnv,
    pub vault: PortfolioVaultHostRef,
    pub strategies: Vec<MockStrategyHostRef>,
    pub admin: Address,
    pub operator: Address,
    pub user: Address,
}

pub fn portfolio() -> PortfolioSetup {
    let env = odra_test::env();
    let admin = env.get_account(0);
    let operator = env.get_account(1);
    let user = env.get_account(2);

    env.set_caller(admin);
    let vault = PortfolioVault::deploy(
        &env,
        PortfolioVaultInitArgs {
            name: String::from("Lava Portfolio Share"),
            symbol: String::from("lvPORT"),
            decimals: 9,
            reserve_bps: 2000,
            operator,
        },
    );
    let vault_address = vault.address().clone();

    let mut strategies = Vec::new();
    for name in ["Zentra", "Satsuma", "CrossChain"] {
        let mut strategy = MockStrategy::deploy(
            &env,
            MockStrategyInitArgs {
                name: String::from(name),
            },
        );
        strategy.grant_capability(Capability::Vault, vault_address);
        strategies.push(strategy);
    }

    let mut setup = PortfolioSetup {
        env,
        vault,
        strategies,
        admin,
        operator,
        user,
    };

    setup.env.set_caller(operator);
    for (id, bps) in [(1u32, 3000u32), (2, 2500), (3, 2500)] {
        let adapter = setup.strategies[id as usize - 1].address().clone();
        setup.vault.add_strategy(id, adapter, bps);
    }
    setup.env.set_caller(user);
    setup
}

impl PortfolioSetup {
    pub fn strategy_assets(&self) -> Vec<U256> {
        self.strategies
            .iter()
            .map(|strategy| strategy.total_assets())
            .collect()
    }
}

/// Cross-chain vault wired to a mock bridge and oracle. The oracle is
/// deployed but not configured on the vault.
pub struct CrossChainSetup {
    pub env: HostEnv,
    pub vault: CrossChainVaultHostRef,
    pub bridge: MockBridgeHostRef,
    pub oracle: MockPriceOracleHostRef,
    pub admin: Address,
    pub operator: Address,
    pub user: Address,
}

pub fn cross_chain() -> CrossChainSetup {
    cross_chain_with(CrossChainConfig::default())
}

pub fn cross_chain_with(config: CrossChainConfig) -> CrossChainSetup {
    let env = odra_test::env();
    let admin = env.get_account(0);
    let operator = env.get_account(1);
    let user = env.get_account(2);

    env.set_caller(admin);
    let mut bridge = MockBridge::deploy(
        &env,
        MockBridgeInitArgs {
            destination: String::from("Ethereum"),
        },
    );
    let oracle = MockPriceOracle::deploy(&env, MockPriceOracleInitArgs { feeder: admin });
    let vault = CrossChainVault::deploy(
        &env,
        CrossChainVaultInitArgs {
            name: String::from("Lava Cross-Chain Share"),
            symbol: String::from("lvXC"),
            config,
            bridge: bridge.address().clone(),
            oracle: None,
            operator,
        },
    );
    bridge.grant_capability(Capability::Vault, vault.address().clone());

    env.set_caller(user);
    CrossChainSetup {
        env,
        vault,
        bridge,
        oracle,
        admin,
        operator,
        user,
    }
}
