//! Possession integration tests
//!
//! Drives `PossessionMod` frame by frame against the in-memory mission.

use post_mortem_possession::core::{AgentId, AgentSnapshot, PossessionConfig, TeamId};
use post_mortem_possession::possession::*;

const PLAYER: TeamId = TeamId(0);
const ALLY: TeamId = TeamId(1);
const ENEMY: TeamId = TeamId(2);

fn battle() -> SimMission {
    let mut mission = SimMission::new();
    mission
        .roster_mut()
        .add_team(PLAYER, Some(BattleSide::Attacker))
        .add_team(ALLY, Some(BattleSide::Attacker))
        .add_team(ENEMY, Some(BattleSide::Defender))
        .set_player_ally_team(Some(ALLY))
        .add_agent(
            AgentSnapshot::new(AgentId(1), "Player", PLAYER, 100.0)
                .hero()
                .in_formation(FormationClass::HeavyCavalry),
        )
        .add_agent(
            AgentSnapshot::new(AgentId(2), "Infantry 1", PLAYER, 80.0)
                .in_formation(FormationClass::Infantry),
        )
        .add_agent(
            AgentSnapshot::new(AgentId(3), "Allied Archer", ALLY, 80.0)
                .in_formation(FormationClass::Ranged),
        )
        .add_agent(
            AgentSnapshot::new(AgentId(4), "Enemy Spearman", ENEMY, 80.0)
                .in_formation(FormationClass::Infantry),
        );
    mission.set_main_agent(AgentId(1));
    mission
}

fn config(weights: [i32; 9], allow_allies: bool) -> PossessionConfig {
    PossessionConfig {
        allow_control_allies: allow_allies,
        priorities: PriorityTable::from_weights(&weights).unwrap(),
        ..PossessionConfig::default()
    }
}

fn start(config: PossessionConfig, mission: &mut SimMission) -> (PossessionMod, Vec<Notice>) {
    let mut possession = PossessionMod::new(config).with_seed(11);
    let mut sink = Vec::new();
    possession.on_mission_init();
    assert_eq!(
        possession.tick(mission, None, &mut sink),
        TickOutcome::Adopted(AgentId(1))
    );
    (possession, sink)
}

#[test]
fn test_companion_priority_falls_to_infantry() {
    let mut mission = battle();
    let (mut possession, mut sink) = start(config([10, 1, 1, 1, 1, 1, 1, 1, 1], false), &mut mission);
    mission.kill(AgentId(1));

    let outcome = possession.tick(
        &mut mission,
        Some(PossessionCommand::PossessByPriority),
        &mut sink,
    );
    assert_eq!(
        outcome,
        TickOutcome::Transferred {
            agent: AgentId(2),
            source: TransferSource::Priority(SelectionSource::Category(UnitCategory::Infantry)),
        }
    );
    assert_eq!(mission.main_agent(), Some(AgentId(2)));
    assert!(!mission.main_character_dead());
}

#[test]
fn test_chain_until_nobody_left() {
    let mut mission = battle();
    let (mut possession, mut sink) = start(config([1; 9], false), &mut mission);

    mission.kill(AgentId(1));
    let outcome = possession.tick_keys(&mut mission, &[Key::U], &mut sink);
    assert!(matches!(outcome, TickOutcome::Transferred { agent: AgentId(2), .. }));

    // Same frame structure again: engine reports the new main agent, nothing adopted
    assert_eq!(possession.tick(&mut mission, None, &mut sink), TickOutcome::Idle);

    mission.kill(AgentId(2));
    let outcome = possession.tick_keys(&mut mission, &[Key::U], &mut sink);
    assert_eq!(outcome, TickOutcome::NoSuccessor);
    assert!(sink
        .last()
        .unwrap()
        .text
        .ends_with("No friendly eligible soldiers left"));
}

#[test]
fn test_allied_fallback_when_allowed() {
    let mut mission = battle();
    let (mut possession, mut sink) =
        start(config([0, 0, 9, 0, 0, 0, 0, 0, 0], true), &mut mission);
    mission.kill(AgentId(1));

    let outcome = possession.tick(
        &mut mission,
        Some(PossessionCommand::PossessByPriority),
        &mut sink,
    );
    assert_eq!(
        outcome,
        TickOutcome::Transferred {
            agent: AgentId(3),
            source: TransferSource::Priority(SelectionSource::AlliedCategory(
                UnitCategory::Ranged
            )),
        }
    );
    // Player's team is still the one commanded
    assert_eq!(possession.control_state().team(), Some(PLAYER));
}

#[test]
fn test_manual_ally_denied_then_allowed() {
    let mut mission = battle();
    mission.spectate(Some(AgentId(3)));

    let (mut denied, mut sink) = start(config([1; 9], false), &mut mission);
    mission.kill(AgentId(1));
    assert_eq!(
        denied.tick_keys(&mut mission, &[Key::O], &mut sink),
        TickOutcome::Refused(AgentId(3))
    );
    assert!(sink[0].text.ends_with("You can't take control of ally 'Allied Archer'"));

    let mut mission = battle();
    mission.spectate(Some(AgentId(3)));
    let (mut allowed, mut sink) = start(config([1; 9], true), &mut mission);
    mission.kill(AgentId(1));
    assert_eq!(
        allowed.tick_keys(&mut mission, &[Key::O], &mut sink),
        TickOutcome::Transferred {
            agent: AgentId(3),
            source: TransferSource::Spectated,
        }
    );
    assert!(mission.is_player_controlled(AgentId(3)));
}

#[test]
fn test_both_hotkeys_same_frame_runs_manual_only() {
    let mut mission = battle();
    mission.spectate(Some(AgentId(4)));
    let (mut possession, mut sink) = start(config([1; 9], false), &mut mission);
    mission.kill(AgentId(1));

    let outcome = possession.tick_keys(&mut mission, &[Key::O, Key::U], &mut sink);
    assert_eq!(outcome, TickOutcome::Refused(AgentId(4)));
    assert_eq!(possession.control_state().current(), Some(AgentId(1)));
}

#[test]
fn test_formations_follow_the_new_unit() {
    let mut mission = battle();
    mission
        .set_formation_owner(PLAYER, FormationClass::HeavyCavalry, AgentId(1))
        .unwrap();
    mission
        .set_formation_owner(PLAYER, FormationClass::Infantry, AgentId(1))
        .unwrap();
    mission.set_order_controller_owner(PLAYER, AgentId(1)).unwrap();

    let (mut possession, mut sink) = start(config([1; 9], false), &mut mission);
    mission.kill(AgentId(1));
    possession.tick_keys(&mut mission, &[Key::U], &mut sink);

    assert_eq!(mission.order_controller_owner(PLAYER), Some(AgentId(2)));
    assert!(mission
        .formation_owners(PLAYER)
        .iter()
        .all(|(_, owner)| *owner == Some(AgentId(2))));
}

#[test]
fn test_no_formations_mission_takes_healthiest() {
    let mut mission = SimMission::new();
    mission
        .roster_mut()
        .add_team(PLAYER, Some(BattleSide::Attacker))
        .add_agent(AgentSnapshot::new(AgentId(1), "Player", PLAYER, 100.0).hero())
        .add_agent(AgentSnapshot::new(AgentId(2), "Bandit", PLAYER, 20.0))
        .add_agent(AgentSnapshot::new(AgentId(3), "Guard", PLAYER, 75.0))
        .add_agent(AgentSnapshot::new(AgentId(4), "Friend", PLAYER, 10.0).hero());
    mission.set_main_agent(AgentId(1));

    let (mut possession, mut sink) = start(config([10, 1, 1, 1, 1, 1, 1, 1, 1], false), &mut mission);
    mission.kill(AgentId(1));

    assert_eq!(
        possession.tick_keys(&mut mission, &[Key::U], &mut sink),
        TickOutcome::Transferred {
            agent: AgentId(3),
            source: TransferSource::Priority(SelectionSource::HealthiestFallback),
        }
    );
}

#[test]
fn test_emptied_formations_take_healthiest_straggler() {
    let mut mission = battle();
    mission
        .roster_mut()
        .add_agent(AgentSnapshot::new(AgentId(5), "Straggler", PLAYER, 30.0));
    let (mut possession, mut sink) = start(config([1; 9], true), &mut mission);
    mission.kill(AgentId(2));
    mission.kill(AgentId(1));

    assert_eq!(
        possession.tick_keys(&mut mission, &[Key::U], &mut sink),
        TickOutcome::Transferred {
            agent: AgentId(5),
            source: TransferSource::Priority(SelectionSource::HealthiestFallback),
        }
    );
}

#[test]
fn test_silent_when_not_verbose() {
    let mut mission = battle();
    let quiet = PossessionConfig {
        verbose: false,
        ..config([1; 9], false)
    };
    let (mut possession, mut sink) = start(quiet, &mut mission);
    mission.kill(AgentId(1));
    possession.tick_keys(&mut mission, &[Key::U], &mut sink);
    assert!(sink.is_empty());
}
