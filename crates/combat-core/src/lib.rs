//! Deterministic turn-based combat core for a tactics game.
//!
//! `combat-core` decides whose turn it is, how many action points each
//! combatant has left, which tactical sub-state the active combatant is in,
//! how autonomous combatants choose their actions, and when the battle ends.
//! Rendering, assets, scenario parsing and input collection live elsewhere;
//! they feed [`CombatantSpec`]s and a player hook in and read snapshots and
//! the [`BattleLog`] out.
//!
//! Modules are organized by responsibility:
//! - [`state`] holds combatant records, the [`UnitRegistry`] and [`ApLedger`]
//! - [`turn`] hosts the [`TurnSequencer`] and [`TacticalStateMachine`]
//! - [`ai`] provides capabilities, behavior trees and the [`AiScheduler`]
//! - [`outcome`] detects victory, defeat and draws
//! - [`engine`] composes everything into the [`Simulation`]
pub mod actions;
pub mod ai;
pub mod config;
pub mod engine;
pub mod error;
pub mod outcome;
pub mod state;
pub mod turn;

pub use actions::{ActionRejected, PerformedAction};
pub use ai::{
    AiContext, AiScheduler, Capability, CapabilityError, CapabilityResult, TacticalCapabilities,
    TacticalTree, reference_tree,
};
pub use config::{BattleConfig, CombatRules};
pub use engine::{
    BattleLog, BattleSnapshot, CombatantSnapshot, EventKind, LogEntry, Phase, PlayerHook,
    PlayerTurn, Simulation, StepOutcome,
};
pub use error::{BattleError, InvalidUnit};
pub use outcome::{Outcome, OutcomeTracker};
pub use state::{
    ApLedger, Combatant, CombatantId, CombatantSpec, Controller, Position, TeamId, UnitRegistry,
};
pub use turn::{TacticalState, TacticalStateMachine, TurnSequencer};

pub use behavior_tree::Status;
