//! Battle configuration: tunable rules plus environment overrides.
use std::env;
use std::str::FromStr;

use crate::state::TeamId;

/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleConfig {
    /// Team driven by the player-input hook. Every other team is an enemy.
    pub player_team: TeamId,
    /// Per-turn AP maximum used for registrations and round refreshes.
    pub default_ap: u32,
    /// Healing never raises hp above this cap.
    pub hp_cap: u32,
    /// Action costs and damage handed to AI contexts and player turns.
    pub rules: CombatRules,
    /// How many behavior-tree ticks an autonomous combatant gets per turn.
    pub ai_actions_per_turn: u32,
    /// Rounds after which an undecided battle ends in a draw.
    pub max_rounds: Option<u32>,
}

impl BattleConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_PLAYER_TEAM: &'static str = "player";
    pub const DEFAULT_AP: u32 = 6;
    pub const DEFAULT_HP_CAP: u32 = 100;
    pub const DEFAULT_AI_ACTIONS_PER_TURN: u32 = 1;

    pub fn new() -> Self {
        Self {
            player_team: TeamId::new(Self::DEFAULT_PLAYER_TEAM),
            default_ap: Self::DEFAULT_AP,
            hp_cap: Self::DEFAULT_HP_CAP,
            rules: CombatRules::default(),
            ai_actions_per_turn: Self::DEFAULT_AI_ACTIONS_PER_TURN,
            max_rounds: None,
        }
    }

    pub fn with_player_team(mut self, team: impl Into<TeamId>) -> Self {
        self.player_team = team.into();
        self
    }

    pub fn with_default_ap(mut self, ap: u32) -> Self {
        self.default_ap = ap;
        self
    }

    pub fn with_rules(mut self, rules: CombatRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = Some(rounds);
        self
    }

    pub fn with_ai_actions_per_turn(mut self, actions: u32) -> Self {
        self.ai_actions_per_turn = actions.max(1);
        self
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables (unset or unparsable values keep the default):
    /// - `COMBAT_PLAYER_TEAM` - Player-controlled team tag (default: player)
    /// - `COMBAT_DEFAULT_AP` - Per-turn AP maximum (default: 6)
    /// - `COMBAT_HP_CAP` - Healing cap (default: 100)
    /// - `COMBAT_MOVE_COST` - AP per tile moved (default: 1)
    /// - `COMBAT_ATTACK_COST` - AP per attack (default: 2)
    /// - `COMBAT_ATTACK_DAMAGE` - Damage per attack (default: 10)
    /// - `COMBAT_AI_ACTIONS_PER_TURN` - AI ticks per turn (default: 1)
    /// - `COMBAT_MAX_ROUNDS` - Round limit before a draw (default: none)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(team) = env::var("COMBAT_PLAYER_TEAM")
            && !team.is_empty()
        {
            config.player_team = TeamId::new(team);
        }
        if let Some(ap) = read_env::<u32>("COMBAT_DEFAULT_AP") {
            config.default_ap = ap;
        }
        if let Some(cap) = read_env::<u32>("COMBAT_HP_CAP") {
            config.hp_cap = cap.max(1);
        }
        if let Some(cost) = read_env::<u32>("COMBAT_MOVE_COST") {
            config.rules.move_cost = cost;
        }
        if let Some(cost) = read_env::<u32>("COMBAT_ATTACK_COST") {
            config.rules.attack_cost = cost;
        }
        if let Some(damage) = read_env::<u32>("COMBAT_ATTACK_DAMAGE") {
            config.rules.attack_damage = damage;
        }
        if let Some(actions) = read_env::<u32>("COMBAT_AI_ACTIONS_PER_TURN") {
            config.ai_actions_per_turn = actions.max(1);
        }
        config.max_rounds = read_env::<u32>("COMBAT_MAX_ROUNDS");

        config
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Action costs and effects shared by AI and player turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatRules {
    /// AP spent per tile moved.
    pub move_cost: u32,
    /// AP spent per attack.
    pub attack_cost: u32,
    /// Fixed damage dealt by one attack.
    pub attack_damage: u32,
}

impl CombatRules {
    pub const DEFAULT_MOVE_COST: u32 = 1;
    pub const DEFAULT_ATTACK_COST: u32 = 2;
    pub const DEFAULT_ATTACK_DAMAGE: u32 = 10;
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            move_cost: Self::DEFAULT_MOVE_COST,
            attack_cost: Self::DEFAULT_ATTACK_COST,
            attack_damage: Self::DEFAULT_ATTACK_DAMAGE,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    env::var(key).ok().and_then(|value| value.parse().ok())
}
