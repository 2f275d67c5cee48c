//! Combatant state: identifiers, records, the unit registry and AP ledger.

mod combatant;
mod common;
pub mod ledger;
pub mod registry;

pub use combatant::{Combatant, CombatantSpec, Controller};
pub use common::{CombatantId, Position, TeamId};
pub use ledger::ApLedger;
pub use registry::UnitRegistry;
