//! Per-combatant action point accounts.
//!
//! Reads on unknown ids return `0`/`false` so callers never need an
//! existence check first.

use std::collections::BTreeMap;

use tracing::trace;

use super::CombatantId;

/// Action point ledger with a configurable per-turn maximum.
#[derive(Clone, Debug, Default)]
pub struct ApLedger {
    accounts: BTreeMap<CombatantId, u32>,
    max: u32,
}

impl ApLedger {
    pub fn new(max: u32) -> Self {
        Self {
            accounts: BTreeMap::new(),
            max,
        }
    }

    /// Maximum restored by [`reset_all`](Self::reset_all).
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Changes the default for future registrations and resets.
    /// Existing balances are left alone.
    pub fn set_max(&mut self, max: u32) {
        self.max = max;
    }

    /// Opens (or overwrites) an account with `initial` points.
    pub fn register(&mut self, id: CombatantId, initial: u32) {
        self.accounts.insert(id, initial);
    }

    /// Opens an account at the configured maximum.
    pub fn register_default(&mut self, id: CombatantId) {
        let max = self.max;
        self.register(id, max);
    }

    pub fn contains(&self, id: &CombatantId) -> bool {
        self.accounts.contains_key(id)
    }

    /// Remaining points, 0 for unknown ids.
    pub fn get(&self, id: &CombatantId) -> u32 {
        self.accounts.get(id).copied().unwrap_or(0)
    }

    pub fn can_spend(&self, id: &CombatantId, cost: u32) -> bool {
        self.accounts.get(id).is_some_and(|&ap| ap >= cost)
    }

    /// Deducts `cost`; the balance is untouched when it would go negative.
    pub fn spend(&mut self, id: &CombatantId, cost: u32) -> bool {
        match self.accounts.get_mut(id) {
            Some(ap) if *ap >= cost => {
                *ap -= cost;
                trace!(id = %id, cost, remaining = *ap, "spent ap");
                true
            }
            _ => false,
        }
    }

    /// Refills every tracked account to the maximum.
    pub fn reset_all(&mut self) {
        let max = self.max;
        self.accounts.values_mut().for_each(|ap| *ap = max);
    }

    /// Closes an account. Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: &CombatantId) {
        self.accounts.remove(id);
    }

    /// Balances in id order.
    pub fn snapshot(&self) -> Vec<(CombatantId, u32)> {
        self.accounts
            .iter()
            .map(|(id, &ap)| (id.clone(), ap))
            .collect()
    }
}
