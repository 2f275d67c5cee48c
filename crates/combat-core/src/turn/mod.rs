//! Turn order and the per-turn tactical micro-state.

pub mod sequencer;
pub mod tactical;

pub use sequencer::TurnSequencer;
pub use tactical::{TacticalState, TacticalStateMachine};
