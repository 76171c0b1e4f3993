//! Capability-based access control.
//!
//! Every vault and reference collaborator owns a `Grants` table keyed by
//! `(capability, account)`. Ownership chains between contracts (vault →
//! strategy adapter, vault → bridge) are expressed by granting the `Vault`
//! capability on the downstream contract to the upstream one.
//!
//! Capability hierarchy:
//! - ADMIN can grant/revoke everything and satisfies every check except `Vault`
//! - OPERATOR manages strategies and leverage parameters
//! - HARVESTER triggers harvests when harvesting is permissioned
//! - SETTLER delivers native backing for converted collateral
//! - VAULT moves funds through an adapter or bridge

use odra::prelude::*;
use crate::errors::VaultError;
use crate::events::{CapabilityGranted, CapabilityRevoked};

/// Named right in the authorization table
#[odra::odra_type]
#[derive(Copy)]
pub enum Capability {
    Admin,
    Operator,
    Harvester,
    Settler,
    Vault,
}

/// Authorization table
#[odra::module]
pub struct Grants {
    /// Assignments: (capability, account) -> granted
    grants: Mapping<(Capability, Address), bool>,
    /// Number of accounts holding each capability
    holders: Mapping<Capability, u32>,
}

#[odra::module]
impl Grants {
    /// Check if account holds a capability
    pub fn has_capability(&self, capability: Capability, account: Address) -> bool {
        self.grants.get(&(capability, account)).unwrap_or(false)
    }

    /// Get the number of accounts holding a capability
    pub fn holder_count(&self, capability: Capability) -> u32 {
        self.holders.get(&capability).unwrap_or(0)
    }
}

impl Grants {
    /// Install the first admin. Only meaningful from a constructor.
    pub fn bootstrap(&mut self, admin: Address) {
        if self.holder_count(Capability::Admin) > 0 {
            self.env().revert(VaultError::InvalidConfig);
        }
        self.assign(Capability::Admin, admin, true);
    }

    /// Grant a capability (admin only)
    pub fn grant(&mut self, capability: Capability, account: Address) {
        self.require(Capability::Admin);
        if self.has_capability(capability, account) {
            return;
        }
        self.assign(capability, account, true);
    }

    /// Revoke a capability (admin only). The last admin cannot be removed.
    pub fn revoke(&mut self, capability: Capability, account: Address) {
        self.require(Capability::Admin);
        if !self.has_capability(capability, account) {
            return;
        }
        if capability == Capability::Admin && self.holder_count(Capability::Admin) <= 1 {
            self.env().revert(VaultError::InvalidConfig);
        }
        self.assign(capability, account, false);
    }

    /// Revert unless the caller holds `capability`.
    ///
    /// Admins pass every check except `Vault`, which is reserved for contracts.
    pub fn require(&self, capability: Capability) {
        let caller = self.env().caller();
        if self.has_capability(capability, caller) {
            return;
        }
        if capability != Capability::Vault && self.has_capability(Capability::Admin, caller) {
            return;
        }
        self.env().revert(VaultError::Unauthorized);
    }

    fn assign(&mut self, capability: Capability, account: Address, value: bool) {
        self.grants.set(&(capability, account), value);

        let count = self.holder_count(capability);
        if value {
            self.holders.set(&capability, count + 1);
            self.env().emit_event(CapabilityGranted { capability, account });
        } else {
            self.holders.set(&capability, count.saturating_sub(1));
            self.env().emit_event(CapabilityRevoked { capability, account });
        }
    }
}
