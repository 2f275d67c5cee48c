//! Battle orchestration.
//!
//! [`Simulation`] owns every combat component and composes them into a
//! single per-turn [`step`](Simulation::step):
//!
//! 1. read the current combatant (none → game over)
//! 2. autonomous: tick the behavior tree against an [`AiContext`]
//! 3. player-controlled: hand a [`PlayerTurn`] to the input hook, never block
//! 4. advance the turn order, refreshing AP on a new round
//! 5. relay deaths and revivals to the outcome tracker
//! 6. append structured log entries
//!
//! Steps run to completion one at a time. Hosts that want to run the battle
//! off their render thread move the whole `Simulation` behind one lock.

mod log;
mod player;
mod snapshot;

pub use log::{BattleLog, EventKind, LogEntry};
pub use player::{PlayerHook, PlayerTurn};
pub use snapshot::{BattleSnapshot, CombatantSnapshot};

use std::collections::BTreeSet;
use std::time::Duration;

use behavior_tree::Status;
use tracing::{debug, info};

use crate::actions::PerformedAction;
use crate::ai::{AiContext, AiScheduler, TacticalTree, evaluate, reference_tree};
use crate::config::BattleConfig;
use crate::error::BattleError;
use crate::outcome::{Outcome, OutcomeSubscriber, OutcomeTracker};
use crate::state::{ApLedger, CombatantId, CombatantSpec, Controller, TeamId, UnitRegistry};
use crate::turn::{TacticalState, TacticalStateMachine, TurnSequencer};

/// Lifecycle of a battle.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// Combatants are being registered.
    #[default]
    Init,
    Running,
    GameOver,
}

/// What a call to [`Simulation::step`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// `actor` took its turn.
    Acted {
        actor: CombatantId,
        controller: Controller,
    },
    /// The battle is over; no turn was taken.
    GameOver(Outcome),
}

/// Deterministic turn-based battle.
pub struct Simulation {
    config: BattleConfig,
    phase: Phase,
    registry: UnitRegistry,
    ledger: ApLedger,
    sequencer: TurnSequencer,
    tactics: TacticalStateMachine,
    tracker: Option<OutcomeTracker>,
    pending_subscribers: Vec<OutcomeSubscriber>,
    tree: TacticalTree,
    player_hook: Option<PlayerHook>,
    scheduler: AiScheduler<Simulation>,
    log: BattleLog,
}

impl Simulation {
    pub fn new(config: BattleConfig) -> Self {
        Self {
            registry: UnitRegistry::new(config.hp_cap),
            ledger: ApLedger::new(config.default_ap),
            config,
            phase: Phase::Init,
            sequencer: TurnSequencer::new(),
            tactics: TacticalStateMachine::new(),
            tracker: None,
            pending_subscribers: Vec::new(),
            tree: reference_tree(),
            player_hook: None,
            scheduler: AiScheduler::new(),
            log: BattleLog::new(),
        }
    }

    // ========================================================================
    // Setup
    // ========================================================================

    /// Registers a combatant and appends it to the turn order.
    ///
    /// Without an explicit controller, members of the configured player team
    /// are player-controlled and everyone else is autonomous.
    pub fn add_combatant(&mut self, spec: CombatantSpec) -> Result<(), BattleError> {
        self.ensure_setup()?;

        let controller = spec.controller.unwrap_or(if spec.team == self.config.player_team {
            Controller::Player
        } else {
            Controller::Autonomous
        });
        let spec = spec.with_controller(controller);
        self.registry.register_spec(&spec)?;
        self.ledger
            .register(spec.id.clone(), spec.ap.unwrap_or(self.config.default_ap));
        self.sequencer.add(spec.id);
        Ok(())
    }

    /// Replaces the behavior tree shared by every autonomous combatant.
    pub fn set_tree(&mut self, tree: TacticalTree) -> Result<(), BattleError> {
        self.ensure_setup()?;
        self.tree = tree;
        Ok(())
    }

    /// Installs the hook invoked once per player-controlled turn.
    pub fn set_player_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&mut PlayerTurn<'_>) + Send + 'static,
    {
        self.player_hook = Some(Box::new(hook));
    }

    /// Notifies `subscriber` once with the terminal verdict.
    pub fn subscribe_outcome<F>(&mut self, subscriber: F)
    where
        F: FnMut(Outcome) + Send + 'static,
    {
        match self.tracker.as_mut() {
            Some(tracker) => tracker.subscribe(subscriber),
            None => self.pending_subscribers.push(Box::new(subscriber)),
        }
    }

    fn ensure_setup(&self) -> Result<(), BattleError> {
        match self.phase {
            Phase::Init => Ok(()),
            _ => Err(BattleError::SetupClosed),
        }
    }

    /// Closes setup and starts the battle.
    ///
    /// A roster that is already decided (no living players, no enemies)
    /// ends immediately.
    pub fn start(&mut self) -> Result<(), BattleError> {
        self.ensure_setup()?;
        self.begin();
        Ok(())
    }

    fn begin(&mut self) {
        // Anyone killed during setup never gets a turn.
        for id in self.sequencer.order().to_vec() {
            if !self.registry.is_alive(&id) {
                self.sequencer.remove(&id);
                self.ledger.remove(&id);
            }
        }

        let player_team = self.config.player_team.clone();
        let teams = self.registry.teams();
        let counts: Vec<(TeamId, u32)> = teams
            .iter()
            .map(|team| (team.clone(), self.registry.alive_count(team)))
            .collect();
        let enemies: Vec<TeamId> = teams.into_iter().filter(|team| *team != player_team).collect();

        let mut tracker = OutcomeTracker::new(player_team, enemies, counts);
        for subscriber in self.pending_subscribers.drain(..) {
            tracker.subscribe(subscriber);
        }

        self.phase = Phase::Running;
        info!(
            combatants = self.registry.len(),
            enemy_teams = tracker.enemy_teams().len(),
            "battle started"
        );
        self.record(
            None,
            EventKind::BattleStarted,
            format!(
                "{} combatants, order {}",
                self.registry.len(),
                join_ids(self.sequencer.order())
            ),
        );

        let verdict = tracker.refresh();
        self.tracker = Some(tracker);
        if verdict.is_terminal() || self.sequencer.is_empty() {
            self.finish();
        }
    }

    // ========================================================================
    // Turn loop
    // ========================================================================

    /// Runs one combatant's turn.
    ///
    /// The first step of a battle that was never started starts it.
    pub fn step(&mut self) -> StepOutcome {
        match self.phase {
            Phase::GameOver => return StepOutcome::GameOver(self.outcome()),
            Phase::Init => {
                self.begin();
                if self.phase == Phase::GameOver {
                    return StepOutcome::GameOver(self.outcome());
                }
            }
            Phase::Running => {}
        }

        let Some(actor) = self.sequencer.get_current().cloned() else {
            self.finish();
            return StepOutcome::GameOver(self.outcome());
        };

        let turn = self.sequencer.turn();
        let round = self.sequencer.round();
        let alive_before = self.alive_set();
        let controller = self.registry.controller(&actor).unwrap_or_default();
        debug!(actor = %actor, %controller, turn = self.turn(), "turn begins");

        self.tactics.reset();
        match controller {
            Controller::Autonomous => self.run_ai_turn(&actor),
            Controller::Player => self.run_player_turn(&actor),
        }

        self.sequencer.advance();
        self.relay_casualties(&alive_before, turn, round);
        self.settle_round(round);

        StepOutcome::Acted { actor, controller }
    }

    /// Steps until the battle ends or `max_steps` turns have run.
    pub fn run(&mut self, max_steps: usize) -> Outcome {
        for _ in 0..max_steps {
            if let StepOutcome::GameOver(_) = self.step() {
                break;
            }
        }
        self.outcome()
    }

    fn run_ai_turn(&mut self, actor: &CombatantId) {
        let mut ctx = AiContext::new(
            actor.clone(),
            &mut self.registry,
            &mut self.ledger,
            self.config.rules,
        );
        let mut last = Status::Failure;
        for _ in 0..self.config.ai_actions_per_turn.max(1) {
            last = evaluate(&self.tree, &mut ctx);
            if !last.is_success() {
                break;
            }
        }
        let performed = ctx.take_performed();

        if performed.is_empty() {
            let (kind, detail) = if last.is_running() {
                (EventKind::Blocked, "action blocked")
            } else {
                (EventKind::Wait, "nothing to do")
            };
            self.record(Some(actor.clone()), kind, detail.to_string());
        }
        self.record_performed(actor, performed);
    }

    fn run_player_turn(&mut self, actor: &CombatantId) {
        self.tactics.transition_to(TacticalState::SelectingUnit);
        self.record(
            Some(actor.clone()),
            EventKind::PlayerTurn,
            format!("{} AP", self.ledger.get(actor)),
        );

        let performed = match self.player_hook.as_mut() {
            Some(hook) => {
                let mut turn = PlayerTurn::new(
                    actor.clone(),
                    &mut self.registry,
                    &mut self.ledger,
                    &mut self.tactics,
                    self.config.rules,
                );
                hook(&mut turn);
                turn.into_performed()
            }
            None => Vec::new(),
        };

        if performed.is_empty() {
            self.record(Some(actor.clone()), EventKind::Wait, "turn passed".to_string());
        }
        self.record_performed(actor, performed);
        self.tactics.transition_to(TacticalState::TurnEnd);
    }

    fn record_performed(&mut self, actor: &CombatantId, performed: Vec<PerformedAction>) {
        for action in performed {
            let (kind, detail) = match action {
                PerformedAction::Moved { from, to } => (EventKind::Move, format!("{from} -> {to}")),
                PerformedAction::Attacked {
                    target,
                    damage,
                    remaining_hp,
                } => (
                    EventKind::Attack,
                    format!("{target} takes {damage} ({remaining_hp} hp left)"),
                ),
            };
            self.record(Some(actor.clone()), kind, detail);
        }
    }

    // ========================================================================
    // Death bookkeeping
    // ========================================================================

    fn alive_set(&self) -> BTreeSet<CombatantId> {
        self.registry.alive_ids().into_iter().collect()
    }

    /// Diffs alive sets and propagates the difference to the turn order,
    /// the AP ledger and the outcome tracker. Log entries are stamped with
    /// the turn and round in which the change happened.
    fn relay_casualties(&mut self, before: &BTreeSet<CombatantId>, turn: u64, round: u32) {
        let after = self.alive_set();

        for fallen in before.difference(&after) {
            let Some(team) = self.registry.get(fallen).map(|unit| unit.team.clone()) else {
                continue;
            };
            self.sequencer.remove(fallen);
            self.ledger.remove(fallen);
            if let Some(tracker) = self.tracker.as_mut() {
                tracker.on_unit_defeated(&team);
            }
            info!(id = %fallen, team = %team, "combatant defeated");
            self.record_at(
                turn,
                round,
                Some(fallen.clone()),
                EventKind::Defeated,
                format!("team {team}"),
            );
        }

        for revived in after.difference(before) {
            let Some(team) = self.registry.get(revived).map(|unit| unit.team.clone()) else {
                continue;
            };
            self.sequencer.add(revived.clone());
            self.ledger.register_default(revived.clone());
            if let Some(tracker) = self.tracker.as_mut() {
                tracker.on_unit_revived(&team);
            }
            info!(id = %revived, team = %team, "combatant revived");
            self.record_at(
                turn,
                round,
                Some(revived.clone()),
                EventKind::Revived,
                format!("team {team}"),
            );
        }
    }

    /// Runs once the turn order may have moved past `round`, by advancing
    /// or by removing the last combatant of a round. AP refreshes on every
    /// new round of an undecided battle.
    fn settle_round(&mut self, round: u32) {
        if self.sequencer.round() != round && !self.outcome().is_terminal() {
            self.ledger.reset_all();
            self.record(
                None,
                EventKind::RoundStarted,
                format!("round {}", self.sequencer.round()),
            );
        }
        self.check_round_limit();
        self.check_game_over();
    }

    fn check_round_limit(&mut self) {
        let Some(limit) = self.config.max_rounds else {
            return;
        };
        if self.sequencer.round() > limit
            && let Some(tracker) = self.tracker.as_mut()
        {
            tracker.declare_draw();
        }
    }

    fn check_game_over(&mut self) {
        let decided = self.tracker.as_ref().is_some_and(OutcomeTracker::is_terminal);
        if decided || self.sequencer.is_empty() {
            self.finish();
        }
    }

    fn finish(&mut self) {
        if self.phase == Phase::GameOver {
            return;
        }
        self.phase = Phase::GameOver;
        let outcome = self.outcome();
        info!(%outcome, turn = self.turn(), round = self.round(), "battle over");
        self.record(None, EventKind::GameOver, outcome.to_string());
    }

    fn record(&mut self, actor: Option<CombatantId>, kind: EventKind, detail: String) {
        self.record_at(self.sequencer.turn(), self.sequencer.round(), actor, kind, detail);
    }

    fn record_at(
        &mut self,
        turn: u64,
        round: u32,
        actor: Option<CombatantId>,
        kind: EventKind,
        detail: String,
    ) {
        self.log.push(LogEntry {
            turn,
            round,
            actor,
            kind,
            detail,
        });
    }

    // ========================================================================
    // Effects from outside the turn loop (scripts, hazards, items)
    // ========================================================================

    /// Damages a combatant outside of any turn and relays a resulting death.
    pub fn apply_damage(&mut self, id: &CombatantId, amount: u32) -> bool {
        self.apply_effect(|registry| registry.damage(id, amount))
    }

    /// Heals a combatant outside of any turn; healing from 0 hp revives it.
    pub fn apply_heal(&mut self, id: &CombatantId, amount: u32) -> bool {
        self.apply_effect(|registry| registry.heal(id, amount))
    }

    pub fn mark_feigned_dead(&mut self, id: &CombatantId) -> bool {
        self.registry.mark_feigned_dead(id)
    }

    pub fn unmark_feigned_dead(&mut self, id: &CombatantId) -> bool {
        self.registry.unmark_feigned_dead(id)
    }

    fn apply_effect(&mut self, effect: impl FnOnce(&mut UnitRegistry) -> bool) -> bool {
        let turn = self.sequencer.turn();
        let round = self.sequencer.round();
        let before = self.alive_set();
        let applied = effect(&mut self.registry);
        if self.phase == Phase::Running {
            self.relay_casualties(&before, turn, round);
            self.settle_round(round);
        }
        applied
    }

    // ========================================================================
    // Real-time pacing
    // ========================================================================

    /// Paces `id`'s turns: when due and `id` is the current combatant, the
    /// scheduler steps the battle.
    pub fn schedule_ai(&mut self, id: CombatantId, period: Duration, offset: Duration) {
        let owner = id.clone();
        self.scheduler.register(
            id,
            move |sim: &mut Simulation| {
                if sim.phase != Phase::GameOver && sim.current() == Some(&owner) {
                    sim.step();
                }
                Ok(())
            },
            period,
            offset,
        );
    }

    /// Schedules every autonomous combatant with the same period, spreading
    /// their first invocations `stagger` apart in turn order.
    pub fn schedule_all_ai(&mut self, period: Duration, stagger: Duration) {
        let autonomous: Vec<CombatantId> = self
            .sequencer
            .order()
            .iter()
            .filter(|id| self.registry.controller(id) == Some(Controller::Autonomous))
            .cloned()
            .collect();
        for (slot, id) in (0u32..).zip(autonomous) {
            self.schedule_ai(id, period, stagger * slot);
        }
    }

    pub fn unschedule_ai(&mut self, id: &CombatantId) -> bool {
        self.scheduler.unregister(id)
    }

    /// Advances the pacing clock by `dt`, running due AI tasks.
    ///
    /// The scheduler is detached while its tasks run, so tasks cannot
    /// schedule or unschedule other tasks.
    pub fn update(&mut self, dt: Duration) -> usize {
        let mut scheduler = std::mem::take(&mut self.scheduler);
        let invoked = scheduler.update(dt, self);
        self.scheduler = scheduler;
        invoked
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn turn(&self) -> u64 {
        self.sequencer.turn()
    }

    pub fn round(&self) -> u32 {
        self.sequencer.round()
    }

    /// Combatant whose turn is next.
    pub fn current(&self) -> Option<&CombatantId> {
        self.sequencer.get_current()
    }

    pub fn outcome(&self) -> Outcome {
        self.tracker
            .as_ref()
            .map_or(Outcome::Ongoing, OutcomeTracker::outcome)
    }

    pub fn tactical_state(&self) -> TacticalState {
        self.tactics.current()
    }

    pub fn hp(&self, id: &CombatantId) -> u32 {
        self.registry.hp(id)
    }

    pub fn ap(&self, id: &CombatantId) -> u32 {
        self.ledger.get(id)
    }

    pub fn registry(&self) -> &UnitRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &ApLedger {
        &self.ledger
    }

    pub fn turn_order(&self) -> &[CombatantId] {
        self.sequencer.order()
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            phase: self.phase,
            turn: self.turn(),
            round: self.round(),
            current: self.current().cloned(),
            tactical_state: self.tactical_state(),
            outcome: self.outcome(),
            combatants: self
                .registry
                .iter()
                .map(|unit| CombatantSnapshot {
                    id: unit.id.clone(),
                    team: unit.team.clone(),
                    controller: unit.controller,
                    hp: unit.hp,
                    ap: self.ledger.get(&unit.id),
                    alive: unit.is_alive(),
                    feigned_dead: unit.feigned_dead,
                    position: unit.position,
                })
                .collect(),
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(BattleConfig::default())
    }
}

fn join_ids(ids: &[CombatantId]) -> String {
    ids.iter()
        .map(CombatantId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
