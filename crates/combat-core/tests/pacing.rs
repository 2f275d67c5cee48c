use std::time::Duration;

use combat_core::{CombatantId, CombatantSpec, EventKind, Simulation};

fn id(value: &str) -> CombatantId {
    CombatantId::new(value)
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn orc_actions(sim: &Simulation) -> usize {
    sim.log()
        .entries()
        .iter()
        .filter(|entry| {
            entry.actor == Some(id("orc"))
                && matches!(entry.kind, EventKind::Move | EventKind::Attack)
        })
        .count()
}

fn duel() -> Simulation {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let mut sim = Simulation::default();
    sim.add_combatant(CombatantSpec::new("orc", "enemy", 100).at(0, 0))
        .expect("orc registers");
    sim.add_combatant(CombatantSpec::new("hero", "player", 100).at(1, 0))
        .expect("hero registers");
    sim.start().expect("battle starts");
    sim
}

#[test]
fn test_scheduled_ai_only_steps_on_its_own_turn() {
    let mut sim = duel();
    sim.schedule_ai(id("orc"), ms(1000), Duration::ZERO);

    // First invocation is due at the offset.
    assert_eq!(sim.update(ms(500)), 1);
    assert_eq!(orc_actions(&sim), 1);
    assert_eq!(sim.current(), Some(&id("hero")));

    // Next one is due a full period after the last, at 1.5s.
    assert_eq!(sim.update(ms(500)), 0);
    assert_eq!(sim.update(ms(500)), 1);
    // Not the orc's turn: the task runs but the battle does not move.
    assert_eq!(orc_actions(&sim), 1);
    assert_eq!(sim.current(), Some(&id("hero")));

    // The host drives the player's turn.
    sim.step();
    assert_eq!(sim.update(ms(1000)), 1);
    assert_eq!(orc_actions(&sim), 2);
}

#[test]
fn test_schedule_all_ai_staggers_first_invocations() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let mut sim = Simulation::default();
    for (name, x) in [("a", 0), ("b", 2), ("c", 4)] {
        sim.add_combatant(CombatantSpec::new(name, "enemy", 30).at(x, 5))
            .expect("enemy registers");
    }
    sim.add_combatant(CombatantSpec::new("hero", "player", 50).at(2, 0))
        .expect("hero registers");
    sim.start().expect("battle starts");

    sim.schedule_all_ai(ms(1000), ms(250));

    assert_eq!(sim.update(Duration::ZERO), 1);
    assert_eq!(sim.current(), Some(&id("b")));
    assert_eq!(sim.update(ms(250)), 1);
    assert_eq!(sim.current(), Some(&id("c")));
    assert_eq!(sim.update(ms(250)), 1);
    assert_eq!(sim.current(), Some(&id("hero")));
}

#[test]
fn test_unscheduled_ai_never_runs() {
    let mut sim = duel();
    sim.schedule_ai(id("orc"), ms(100), Duration::ZERO);
    assert!(sim.unschedule_ai(&id("orc")));
    assert!(!sim.unschedule_ai(&id("orc")));

    assert_eq!(sim.update(ms(1000)), 0);
    assert_eq!(orc_actions(&sim), 0);
    assert_eq!(sim.current(), Some(&id("orc")));
}
