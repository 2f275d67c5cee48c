use super::{CombatantId, Position, TeamId};

/// Who decides a combatant's actions.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Controller {
    /// Driven by the player-input hook.
    Player,
    /// Driven by the behavior tree.
    #[default]
    Autonomous,
}

/// Registration data for one combatant, as produced by scenario loading.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSpec {
    pub id: CombatantId,
    pub team: TeamId,
    /// Signed so that invalid scenario data can be rejected, not wrapped.
    pub hp: i64,
    /// Starting AP; `None` uses the configured maximum.
    pub ap: Option<u32>,
    pub position: Position,
    pub attack_range: u32,
    /// `None` derives the controller from the team (player team → player).
    pub controller: Option<Controller>,
}

impl CombatantSpec {
    pub const DEFAULT_ATTACK_RANGE: u32 = 1;

    pub fn new(id: impl Into<CombatantId>, team: impl Into<TeamId>, hp: i64) -> Self {
        Self {
            id: id.into(),
            team: team.into(),
            hp,
            ap: None,
            position: Position::ORIGIN,
            attack_range: Self::DEFAULT_ATTACK_RANGE,
            controller: None,
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn with_ap(mut self, ap: u32) -> Self {
        self.ap = Some(ap);
        self
    }

    pub fn with_attack_range(mut self, range: u32) -> Self {
        self.attack_range = range;
        self
    }

    pub fn with_controller(mut self, controller: Controller) -> Self {
        self.controller = Some(controller);
        self
    }
}

/// Authoritative per-combatant battle record.
///
/// Dead combatants stay in the registry for logs and UI. `feigned_dead` is
/// tracked independently of hp: a combatant can be alive and feigning, or
/// dead and still flagged.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub team: TeamId,
    pub hp: u32,
    pub position: Position,
    pub attack_range: u32,
    pub feigned_dead: bool,
    pub controller: Controller,
}

impl Combatant {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Alive, or flagged as feigning death.
    #[inline]
    pub fn is_effectively_alive(&self) -> bool {
        self.is_alive() || self.feigned_dead
    }

    /// Alive and not feigning death; the only state enemies will attack.
    #[inline]
    pub fn is_targetable(&self) -> bool {
        self.is_alive() && !self.feigned_dead
    }

    #[inline]
    pub fn in_range_of(&self, target: Position) -> bool {
        self.position.distance(target) <= self.attack_range
    }
}
