//! Error types for combat-core.
//!
//! Only setup can fail loudly. Everything that happens once a battle is
//! running degrades to "no effect" instead: lookups on unknown combatants
//! return sentinels, AI capability errors resolve to a failed node, and
//! scheduler callback errors are logged and skipped.

use crate::state::CombatantId;

/// Registration was rejected by the unit registry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidUnit {
    #[error("combatant id must not be empty")]
    EmptyId,

    #[error("combatant {0} has an empty team tag")]
    EmptyTeam(CombatantId),

    #[error("combatant {id} must start with positive hp (got {hp})")]
    NonPositiveHp { id: CombatantId, hp: i64 },

    #[error("combatant {0} is already registered")]
    Duplicate(CombatantId),
}

impl InvalidUnit {
    /// Returns a static string identifier for this error variant.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyId => "empty_id",
            Self::EmptyTeam(_) => "empty_team",
            Self::NonPositiveHp { .. } => "non_positive_hp",
            Self::Duplicate(_) => "duplicate",
        }
    }
}

/// Errors surfaced by the simulation's setup API.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("invalid combatant: {0}")]
    InvalidUnit(#[from] InvalidUnit),

    #[error("battle setup is closed once the battle has started")]
    SetupClosed,
}
