//! Tactical micro-state of the active combatant's turn.

use tracing::trace;

/// Sub-phase of one combatant's turn.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TacticalState {
    #[default]
    Idle,
    SelectingUnit,
    PlanningMove,
    ConfirmingMove,
    PlanningAttack,
    ConfirmingAttack,
    TurnEnd,
}

/// Micro-state machine with a single undo slot.
///
/// Transitions are unconditional. [`cancel`](Self::cancel) swaps the current
/// and previous states, so cancelling twice toggles back to where the first
/// cancel started rather than unwinding further.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TacticalStateMachine {
    current: TacticalState,
    previous: Option<TacticalState>,
}

impl TacticalStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> TacticalState {
        self.current
    }

    pub fn previous(&self) -> Option<TacticalState> {
        self.previous
    }

    pub fn transition_to(&mut self, next: TacticalState) {
        trace!(from = %self.current, to = %next, "tactical transition");
        self.previous = Some(self.current);
        self.current = next;
    }

    /// Swaps current and previous. Returns false when there is nothing to undo.
    pub fn cancel(&mut self) -> bool {
        let Some(previous) = self.previous else {
            return false;
        };
        trace!(from = %self.current, to = %previous, "tactical cancel");
        self.previous = Some(self.current);
        self.current = previous;
        true
    }

    /// True while the turn is being planned or confirmed.
    pub fn is_player_turn_active(&self) -> bool {
        !matches!(self.current, TacticalState::Idle | TacticalState::TurnEnd)
    }

    /// Forces `Idle` and forgets the undo slot.
    pub fn reset(&mut self) {
        self.current = TacticalState::Idle;
        self.previous = None;
    }
}
