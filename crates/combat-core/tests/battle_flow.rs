use std::sync::{Arc, Mutex};

use combat_core::{
    BattleConfig, BattleError, CombatantId, CombatantSpec, Controller, EventKind, InvalidUnit,
    Outcome, Phase, Position, Simulation, StepOutcome, TacticalState,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn id(value: &str) -> CombatantId {
    CombatantId::new(value)
}

fn kinds(sim: &Simulation) -> Vec<EventKind> {
    sim.log().entries().iter().map(|entry| entry.kind).collect()
}

/// Attacks the first targetable enemy the registry yields, then ends the turn.
fn attack_first_enemy(sim: &mut Simulation) {
    sim.set_player_hook(|turn| {
        let target = turn
            .registry()
            .iter()
            .find(|unit| unit.team.as_str() != "player" && unit.is_targetable())
            .map(|unit| unit.id.clone());
        if let Some(target) = target {
            turn.plan_attack();
            let _ = turn.attack(&target);
        }
        turn.end_turn();
    });
}

// ================================================================
// Single step
// ================================================================

#[test]
fn test_ai_in_range_attacks_on_first_step() {
    init_tracing();
    let mut sim = Simulation::default();
    sim.add_combatant(CombatantSpec::new("orc", "enemy", 30).at(0, 0))
        .expect("orc registers");
    sim.add_combatant(CombatantSpec::new("hero", "player", 50).at(1, 0))
        .expect("hero registers");

    let step = sim.step();

    assert_eq!(
        step,
        StepOutcome::Acted {
            actor: id("orc"),
            controller: Controller::Autonomous,
        }
    );
    assert_eq!(sim.hp(&id("hero")), 40);
    let attack = sim.log().last().expect("attack was logged");
    assert_eq!(attack.kind, EventKind::Attack);
    assert_eq!(attack.kind.to_string(), "attack");
    assert_eq!(attack.actor, Some(id("orc")));
    assert_eq!(sim.current(), Some(&id("hero")));
}

#[test]
fn test_ai_closes_distance_across_turns() {
    init_tracing();
    let mut sim = Simulation::default();
    sim.add_combatant(CombatantSpec::new("orc", "enemy", 30).at(0, 0))
        .expect("orc registers");
    sim.add_combatant(CombatantSpec::new("hero", "player", 50).at(3, 0))
        .expect("hero registers");

    for _ in 0..5 {
        sim.step();
    }

    let orc_actions: Vec<EventKind> = sim
        .log()
        .entries()
        .iter()
        .filter(|entry| entry.actor == Some(id("orc")))
        .map(|entry| entry.kind)
        .collect();
    assert_eq!(orc_actions, [EventKind::Move, EventKind::Move, EventKind::Attack]);
    assert_eq!(
        sim.registry().get(&id("orc")).map(|unit| unit.position),
        Some(Position::new(2, 0))
    );
    assert_eq!(sim.hp(&id("hero")), 40);
}

// ================================================================
// Full battles
// ================================================================

#[test]
fn test_player_hook_wins_the_battle() {
    init_tracing();
    let mut sim = Simulation::default();
    sim.add_combatant(CombatantSpec::new("hero", "player", 50).at(0, 0))
        .expect("hero registers");
    sim.add_combatant(CombatantSpec::new("goblin", "enemy", 20).at(1, 0))
        .expect("goblin registers");
    attack_first_enemy(&mut sim);

    let verdicts = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&verdicts);
    sim.subscribe_outcome(move |outcome| sink.lock().unwrap().push(outcome));

    assert_eq!(sim.run(10), Outcome::Victory);
    assert_eq!(sim.phase(), Phase::GameOver);
    assert_eq!(sim.hp(&id("goblin")), 0);
    assert_eq!(sim.hp(&id("hero")), 40);
    assert_eq!(sim.turn_order(), [id("hero")]);
    assert_eq!(
        kinds(&sim),
        [
            EventKind::BattleStarted,
            EventKind::PlayerTurn,
            EventKind::Attack,
            EventKind::Attack,
            EventKind::RoundStarted,
            EventKind::PlayerTurn,
            EventKind::Attack,
            EventKind::Defeated,
            EventKind::GameOver,
        ]
    );

    // Stepping a finished battle is a no-op.
    let logged = sim.log().len();
    assert_eq!(sim.step(), StepOutcome::GameOver(Outcome::Victory));
    assert_eq!(sim.log().len(), logged);
    assert_eq!(*verdicts.lock().unwrap(), [Outcome::Victory]);
}

#[test]
fn test_idle_player_is_defeated() {
    init_tracing();
    let mut sim = Simulation::default();
    sim.add_combatant(CombatantSpec::new("orc", "enemy", 30).at(0, 0))
        .expect("orc registers");
    sim.add_combatant(CombatantSpec::new("hero", "player", 10).at(1, 0))
        .expect("hero registers");

    assert_eq!(sim.run(10), Outcome::Defeat);
    assert_eq!(
        kinds(&sim),
        [
            EventKind::BattleStarted,
            EventKind::Attack,
            EventKind::Defeated,
            EventKind::GameOver,
        ]
    );

    // The death is stamped with the turn that caused it, not the next one.
    let defeated = sim
        .log()
        .of_kind(EventKind::Defeated)
        .next()
        .expect("death was logged");
    assert_eq!(defeated.actor, Some(id("hero")));
    assert_eq!((defeated.turn, defeated.round), (1, 1));
}

#[test]
fn test_round_limit_ends_in_draw() {
    init_tracing();
    let mut sim = Simulation::new(BattleConfig::default().with_max_rounds(2));
    sim.add_combatant(CombatantSpec::new("orc", "enemy", 30).at(0, 0))
        .expect("orc registers");
    sim.add_combatant(CombatantSpec::new("hero", "player", 50).at(10, 0))
        .expect("hero registers");

    assert_eq!(sim.run(100), Outcome::Draw);
    assert_eq!(sim.round(), 3);
    assert_eq!(sim.hp(&id("hero")), 50);
    assert_eq!(sim.log().last().map(|entry| entry.kind), Some(EventKind::GameOver));
}

#[test]
fn test_empty_roster_ends_immediately() {
    init_tracing();
    let mut sim = Simulation::default();
    assert!(matches!(sim.step(), StepOutcome::GameOver(_)));
    assert!(sim.is_over());
}

#[test]
fn test_roster_without_enemies_is_an_instant_victory() {
    init_tracing();
    let mut sim = Simulation::default();
    sim.add_combatant(CombatantSpec::new("hero", "player", 50))
        .expect("hero registers");
    sim.start().expect("battle starts");
    assert_eq!(sim.outcome(), Outcome::Victory);
    assert!(sim.is_over());
}

// ================================================================
// Action points
// ================================================================

#[test]
fn test_ap_refreshes_when_a_new_round_starts() {
    init_tracing();
    let mut sim = Simulation::default();
    sim.add_combatant(CombatantSpec::new("orc", "enemy", 100).at(0, 0))
        .expect("orc registers");
    sim.add_combatant(CombatantSpec::new("hero", "player", 100).at(1, 0))
        .expect("hero registers");

    sim.step();
    assert_eq!(sim.ap(&id("orc")), 4);

    sim.step();
    assert_eq!(sim.round(), 2);
    assert_eq!(sim.ap(&id("orc")), 6);
    assert_eq!(
        sim.log().of_kind(EventKind::RoundStarted).count(),
        1,
        "one round boundary crossed"
    );
}

#[test]
fn test_rejected_player_action_reverts_micro_state() {
    init_tracing();
    let mut sim = Simulation::new(BattleConfig::default().with_default_ap(1));
    sim.add_combatant(CombatantSpec::new("hero", "player", 50).at(0, 0))
        .expect("hero registers");
    sim.add_combatant(CombatantSpec::new("orc", "enemy", 30).at(1, 0))
        .expect("orc registers");

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    sim.set_player_hook(move |turn| {
        turn.plan_attack();
        let rejected = turn.attack(&CombatantId::new("orc")).is_err();
        sink.lock().unwrap().push((rejected, turn.tactical_state()));
        turn.plan_move();
        let moved = turn.move_to(Position::new(0, 1)).is_ok();
        sink.lock().unwrap().push((moved, turn.tactical_state()));
    });

    sim.step();

    assert_eq!(
        *seen.lock().unwrap(),
        [
            (true, TacticalState::PlanningAttack),
            (true, TacticalState::SelectingUnit),
        ]
    );
    assert_eq!(sim.tactical_state(), TacticalState::TurnEnd);
    assert_eq!(sim.hp(&id("orc")), 30);
    assert_eq!(sim.ap(&id("hero")), 0);
    assert_eq!(sim.log().of_kind(EventKind::Move).count(), 1);
}

// ================================================================
// Setup validation
// ================================================================

#[test]
fn test_setup_closes_once_the_battle_starts() {
    init_tracing();
    let mut sim = Simulation::default();
    sim.add_combatant(CombatantSpec::new("hero", "player", 50))
        .expect("hero registers");
    sim.add_combatant(CombatantSpec::new("orc", "enemy", 30).at(5, 5))
        .expect("orc registers");
    sim.start().expect("battle starts");

    assert_eq!(
        sim.add_combatant(CombatantSpec::new("late", "enemy", 30)),
        Err(BattleError::SetupClosed)
    );
    assert_eq!(sim.set_tree(combat_core::reference_tree()), Err(BattleError::SetupClosed));
    assert_eq!(sim.start(), Err(BattleError::SetupClosed));
}

#[test]
fn test_invalid_combatants_are_rejected() {
    init_tracing();
    let mut sim = Simulation::default();
    sim.add_combatant(CombatantSpec::new("orc", "enemy", 30))
        .expect("orc registers");

    assert_eq!(
        sim.add_combatant(CombatantSpec::new("orc", "enemy", 30)),
        Err(BattleError::InvalidUnit(InvalidUnit::Duplicate(id("orc"))))
    );
    assert_eq!(
        sim.add_combatant(CombatantSpec::new("ghost", "enemy", 0)),
        Err(BattleError::InvalidUnit(InvalidUnit::NonPositiveHp {
            id: id("ghost"),
            hp: 0,
        }))
    );
    assert_eq!(
        sim.add_combatant(CombatantSpec::new("", "enemy", 10)),
        Err(BattleError::InvalidUnit(InvalidUnit::EmptyId))
    );
    assert_eq!(sim.turn_order(), [id("orc")]);
}

#[test]
fn test_controller_defaults_follow_player_team() {
    init_tracing();
    let mut sim = Simulation::new(BattleConfig::default().with_player_team("heroes"));
    sim.add_combatant(CombatantSpec::new("knight", "heroes", 50))
        .expect("knight registers");
    sim.add_combatant(
        CombatantSpec::new("golem", "heroes", 50).with_controller(Controller::Autonomous),
    )
    .expect("golem registers");
    sim.add_combatant(CombatantSpec::new("orc", "enemy", 30))
        .expect("orc registers");

    let registry = sim.registry();
    assert_eq!(registry.controller(&id("knight")), Some(Controller::Player));
    assert_eq!(registry.controller(&id("golem")), Some(Controller::Autonomous));
    assert_eq!(registry.controller(&id("orc")), Some(Controller::Autonomous));
}

// ================================================================
// Feigned death and outside effects
// ================================================================

#[test]
fn test_feigned_dead_blocker_is_not_attacked() {
    init_tracing();
    let mut sim = Simulation::default();
    sim.add_combatant(CombatantSpec::new("orc", "enemy", 30).at(0, 0))
        .expect("orc registers");
    sim.add_combatant(CombatantSpec::new("rogue", "player", 20).at(1, 0))
        .expect("rogue registers");
    sim.add_combatant(CombatantSpec::new("hero", "player", 50).at(3, 0))
        .expect("hero registers");
    assert!(sim.mark_feigned_dead(&id("rogue")));

    sim.step();

    assert_eq!(sim.hp(&id("rogue")), 20);
    assert_eq!(sim.log().last().map(|entry| entry.kind), Some(EventKind::Blocked));
    // Feigning death does not count as a loss.
    assert_eq!(sim.outcome(), Outcome::Ongoing);
}

#[test]
fn test_outside_damage_and_heal_relay_death_and_revival() {
    init_tracing();
    let mut sim = Simulation::default();
    sim.add_combatant(CombatantSpec::new("hero", "player", 50).at(0, 0))
        .expect("hero registers");
    sim.add_combatant(CombatantSpec::new("orc", "enemy", 30).at(5, 0))
        .expect("orc registers");
    sim.add_combatant(CombatantSpec::new("shaman", "enemy", 20).at(6, 0))
        .expect("shaman registers");
    sim.start().expect("battle starts");

    assert!(sim.apply_damage(&id("orc"), 50));
    assert_eq!(sim.turn_order(), [id("hero"), id("shaman")]);
    assert_eq!(sim.outcome(), Outcome::Ongoing);

    assert!(sim.apply_heal(&id("orc"), 15));
    assert_eq!(sim.hp(&id("orc")), 15);
    assert_eq!(sim.turn_order(), [id("hero"), id("shaman"), id("orc")]);
    assert_eq!(sim.ap(&id("orc")), 6);
    assert_eq!(sim.log().of_kind(EventKind::Defeated).count(), 1);
    assert_eq!(sim.log().of_kind(EventKind::Revived).count(), 1);

    assert!(sim.apply_damage(&id("orc"), 100));
    assert!(sim.apply_damage(&id("shaman"), 100));
    assert_eq!(sim.outcome(), Outcome::Victory);
    assert!(sim.is_over());
    assert!(!sim.apply_damage(&id("nobody"), 1));
}

#[test]
fn test_outside_kill_of_last_in_round_starts_a_fresh_round() {
    init_tracing();
    let mut sim = Simulation::default();
    sim.add_combatant(CombatantSpec::new("orc", "enemy", 100).at(0, 0))
        .expect("orc registers");
    sim.add_combatant(CombatantSpec::new("hero", "player", 100).at(1, 0))
        .expect("hero registers");
    sim.add_combatant(CombatantSpec::new("goblin", "enemy", 30).at(9, 9))
        .expect("goblin registers");

    sim.step();
    sim.step();
    assert_eq!(sim.current(), Some(&id("goblin")));
    assert_eq!(sim.ap(&id("orc")), 4);

    assert!(sim.apply_damage(&id("goblin"), 100));

    assert_eq!(sim.round(), 2);
    assert_eq!(sim.current(), Some(&id("orc")));
    assert_eq!(sim.ap(&id("orc")), 6);
    assert_eq!(sim.log().of_kind(EventKind::RoundStarted).count(), 1);
    let defeated = sim
        .log()
        .of_kind(EventKind::Defeated)
        .next()
        .expect("goblin death was logged");
    assert_eq!((defeated.turn, defeated.round), (3, 1));

    // The new round's AP is spent normally and not refreshed again.
    sim.step();
    assert_eq!(sim.round(), 2);
    assert_eq!(sim.ap(&id("orc")), 4);
    assert_eq!(sim.log().of_kind(EventKind::RoundStarted).count(), 1);
}

// ================================================================
// Snapshots
// ================================================================

#[test]
fn test_snapshot_reflects_battle_state() {
    init_tracing();
    let mut sim = Simulation::default();
    sim.add_combatant(CombatantSpec::new("orc", "enemy", 30).at(0, 0))
        .expect("orc registers");
    sim.add_combatant(CombatantSpec::new("hero", "player", 50).at(1, 0).with_ap(3))
        .expect("hero registers");
    sim.step();

    let snapshot = sim.snapshot();
    assert_eq!(snapshot.phase, Phase::Running);
    assert_eq!(snapshot.turn, 2);
    assert_eq!(snapshot.round, 1);
    assert_eq!(snapshot.current, Some(id("hero")));
    assert_eq!(snapshot.outcome, Outcome::Ongoing);

    let hero = snapshot.combatant(&id("hero")).expect("hero in snapshot");
    assert_eq!(hero.hp, 40);
    assert_eq!(hero.ap, 3);
    assert!(hero.alive);
    assert_eq!(hero.controller, Controller::Player);
    let orc = snapshot.combatant(&id("orc")).expect("orc in snapshot");
    assert_eq!(orc.ap, 4);
}

#[cfg(feature = "serde")]
#[test]
fn test_snapshot_serializes_to_json() {
    let mut sim = Simulation::default();
    sim.add_combatant(CombatantSpec::new("orc", "enemy", 30).at(0, 0))
        .expect("orc registers");
    sim.add_combatant(CombatantSpec::new("hero", "player", 50).at(1, 0))
        .expect("hero registers");
    sim.step();

    let json = serde_json::to_value(sim.snapshot()).expect("snapshot serializes");
    assert_eq!(json["phase"], "Running");
    assert_eq!(json["combatants"][0]["id"], "hero");
    assert_eq!(json["combatants"][0]["hp"], 40);
}
