//! Strategy registry.
//!
//! Ordered, versioned table of strategy entries owned by a vault. Rows are
//! added or disabled but never removed, so disabled strategies keep their
//! history and their id. Every mutation bumps the version.

use odra::prelude::*;
use crate::errors::VaultError;
use crate::types::StrategyEntry;
use crate::units::BPS_SCALE;

/// Maximum number of registry rows
pub const MAX_STRATEGIES: u32 = 16;

/// Check that the reserve plus the enabled allocations fit in 100%.
pub fn validate_allocation(reserve_bps: u32, enabled_bps: u32) -> Result<(), VaultError> {
    if reserve_bps > BPS_SCALE || enabled_bps > BPS_SCALE - reserve_bps {
        return Err(VaultError::InvalidAllocation);
    }
    Ok(())
}

/// Sum of allocations over enabled entries
pub fn enabled_bps(entries: &[StrategyEntry]) -> u32 {
    entries
        .iter()
        .filter(|entry| entry.enabled)
        .map(|entry| entry.allocation_bps)
        .fold(0u32, |acc, bps| acc.saturating_add(bps))
}

/// Registry storage
#[odra::module]
pub struct StrategyRegistry {
    /// Entries by strategy id
    entries: Mapping<u32, StrategyEntry>,
    /// Registry order: position -> strategy id
    order: Mapping<u32, u32>,
    /// Number of rows
    count: Var<u32>,
    /// Incremented on every mutation
    version: Var<u64>,
}

#[odra::module]
impl StrategyRegistry {
    /// Get the registry version
    pub fn version(&self) -> u64 {
        self.version.get_or_default()
    }

    /// Get the number of registered strategies
    pub fn count(&self) -> u32 {
        self.count.get_or_default()
    }

    /// Get a strategy by id
    pub fn get(&self, id: u32) -> Option<StrategyEntry> {
        self.entries.get(&id)
    }
}

impl StrategyRegistry {
    /// All entries in registry order
    pub fn entries(&self) -> Vec<StrategyEntry> {
        (0..self.count())
            .filter_map(|position| self.order.get(&position))
            .filter_map(|id| self.entries.get(&id))
            .collect()
    }

    /// Append a new enabled strategy.
    pub fn add(
        &mut self,
        id: u32,
        adapter: Address,
        allocation_bps: u32,
        reserve_bps: u32,
    ) -> Result<StrategyEntry, VaultError> {
        if self.entries.get(&id).is_some() {
            return Err(VaultError::StrategyAlreadyExists);
        }
        let count = self.count();
        if count >= MAX_STRATEGIES {
            return Err(VaultError::TooManyStrategies);
        }

        let entry = StrategyEntry {
            id,
            adapter,
            allocation_bps,
            enabled: true,
        };
        let mut candidate = self.entries();
        candidate.push(entry.clone());
        validate_allocation(reserve_bps, enabled_bps(&candidate))?;

        self.entries.set(&id, entry.clone());
        self.order.set(&count, id);
        self.count.set(count + 1);
        self.bump();
        Ok(entry)
    }

    /// Change allocation and enabled flag of an existing strategy.
    pub fn update(
        &mut self,
        id: u32,
        allocation_bps: u32,
        enabled: bool,
        reserve_bps: u32,
    ) -> Result<StrategyEntry, VaultError> {
        let mut entry = self.entries.get(&id).ok_or(VaultError::StrategyNotFound)?;
        entry.allocation_bps = allocation_bps;
        entry.enabled = enabled;

        let candidate: Vec<StrategyEntry> = self
            .entries()
            .into_iter()
            .map(|existing| if existing.id == id { entry.clone() } else { existing })
            .collect();
        validate_allocation(reserve_bps, enabled_bps(&candidate))?;

        self.entries.set(&id, entry.clone());
        self.bump();
        Ok(entry)
    }

    /// Check a new reserve against the current allocations.
    pub fn check_reserve(&self, reserve_bps: u32) -> Result<(), VaultError> {
        validate_allocation(reserve_bps, enabled_bps(&self.entries()))
    }

    /// Record a mutation that lives outside the table (e.g. the reserve).
    pub fn bump(&mut self) -> u64 {
        let next = self.version() + 1;
        self.version.set(next);
        next
    }
}
