//! Lava Vault Contracts
//!
//! Multi-strategy and cross-chain leveraged vaults for the native asset.
//!
//! ## Architecture
//!
//! - **PortfolioVault**: Splits deposits between a liquid reserve and a
//!   registry of strategy adapters; withdrawals draw on the reserve first
//! - **CrossChainVault**: Borrows against deposited collateral, bridges the
//!   borrowed value to a yield source and loops the position
//! - **Mocks**: Reference strategy adapter, bridge and price oracle
//!
//! ## Accounting
//!
//! Both vaults mint shares against NAV taken before the deposit. Pure math
//! lives in `ledger`, `allocation`, `divestment`, `leverage`, `harvest` and
//! `oracle`; contract modules turn their errors into reverts.

#![cfg_attr(target_arch = "wasm32", no_std)]

#[cfg(target_arch = "wasm32")]
extern crate alloc;

// Re-export odra for downstream usage
pub use odra;

// Core module declarations
pub mod types;
pub mod errors;
pub mod events;
pub mod units;
pub mod interfaces;

// Pure math
pub mod ledger;
pub mod allocation;
pub mod divestment;
pub mod leverage;
pub mod harvest;
pub mod oracle;

// Submodules
pub mod access_control;
pub mod shares;
pub mod registry;

// Contract modules
pub mod portfolio_vault;
pub mod cross_chain_vault;
pub mod mocks;
