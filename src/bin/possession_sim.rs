//! Headless Possession Runner
//!
//! Plays out a scripted battle against the in-memory mission host: the
//! player falls, the automatic hotkey picks a successor, that successor
//! falls, and so on until nobody eligible is left. Prints the chain of
//! possessed units.

use std::path::PathBuf;

use clap::Parser;
use post_mortem_possession::core::{AgentId, AgentSnapshot, PossessionConfig, TeamId};
use post_mortem_possession::possession::{
    BattleSide, FormationClass, Notice, PossessionCommand, PossessionMod, SimMission, TickOutcome,
    TransferSource,
};
use serde::Serialize;

const PLAYER: TeamId = TeamId(0);
const ALLY: TeamId = TeamId(1);
const ENEMY: TeamId = TeamId(2);

/// Headless Possession Runner - follow the chain of possessed units
#[derive(Parser, Debug)]
#[command(name = "possession_sim")]
#[command(about = "Simulate successive possessions in a scripted battle")]
struct Args {
    /// Options file (JSON or TOML); defaults are used when omitted
    #[arg(long)]
    options: Option<PathBuf>,

    /// Soldiers per player formation
    #[arg(long, default_value_t = 2)]
    per_formation: u32,

    /// Companions in the player's party
    #[arg(long, default_value_t = 1)]
    companions: u32,

    /// Give the player an allied team
    #[arg(long)]
    with_allies: bool,

    /// Random seed for tie shuffling
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

#[derive(Serialize)]
struct Possession {
    round: usize,
    agent: AgentId,
    name: String,
    source: String,
}

#[derive(Serialize)]
struct RunReport {
    possessions: Vec<Possession>,
    notices: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "post_mortem_possession=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut possession = match &args.options {
        Some(path) => PossessionMod::on_module_load(path),
        None => PossessionMod::new(PossessionConfig::default()),
    }
    .with_seed(args.seed);

    let mut notices: Vec<Notice> = Vec::new();
    possession.on_before_ui_ready(&mut notices);

    let mut mission = build_mission(&args);
    possession.on_mission_init();

    let mut possessions = Vec::new();
    // Every agent can be possessed at most once, plus the adopt frame
    let max_rounds = mission.roster().agents().len() + 1;

    for round in 0..max_rounds {
        possession.tick(&mut mission, None, &mut notices);
        let Some(current) = possession.control_state().current() else {
            tracing::error!("No main agent to start from");
            break;
        };
        mission.kill(current);

        match possession.tick(
            &mut mission,
            Some(PossessionCommand::PossessByPriority),
            &mut notices,
        ) {
            TickOutcome::Transferred { agent, source } => {
                let name = mission
                    .roster()
                    .agents()
                    .iter()
                    .find(|a| a.id == agent)
                    .map(|a| a.name.clone())
                    .unwrap_or_default();
                possessions.push(Possession {
                    round,
                    agent,
                    name,
                    source: describe(source),
                });
            }
            TickOutcome::NoSuccessor => break,
            other => {
                tracing::warn!("Unexpected outcome in round {}: {:?}", round, other);
                break;
            }
        }
    }

    let report = RunReport {
        possessions,
        notices: notices.into_iter().map(|n| n.text).collect(),
    };

    if args.format == "json" {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::error!("Failed to serialize report: {}", e),
        }
    } else {
        println!("=== POSSESSION CHAIN ===");
        for p in &report.possessions {
            println!("{:>3}. {} {:<24} via {}", p.round + 1, p.agent, p.name, p.source);
        }
        println!();
        for notice in &report.notices {
            println!("{}", notice);
        }
    }
}

fn describe(source: TransferSource) -> String {
    match source {
        TransferSource::Spectated => "spectator camera".to_string(),
        TransferSource::Priority(selection) => format!("{:?}", selection),
    }
}

fn build_mission(args: &Args) -> SimMission {
    let mut mission = SimMission::new();
    let mut next_id = 0u32;
    let mut id = || {
        next_id += 1;
        AgentId(next_id)
    };

    let roster = mission.roster_mut();
    roster
        .add_team(PLAYER, Some(BattleSide::Defender))
        .add_team(ENEMY, Some(BattleSide::Attacker));

    let player = id();
    roster.add_agent(
        AgentSnapshot::new(player, "Player", PLAYER, 100.0)
            .hero()
            .in_formation(FormationClass::Cavalry),
    );

    for n in 0..args.companions {
        roster.add_agent(
            AgentSnapshot::new(id(), format!("Companion {}", n + 1), PLAYER, 90.0)
                .hero()
                .in_formation(FormationClass::Infantry),
        );
    }

    for class in FormationClass::ALL {
        for n in 0..args.per_formation {
            roster.add_agent(
                AgentSnapshot::new(id(), format!("{:?} {}", class, n + 1), PLAYER, 60.0)
                    .in_formation(class),
            );
        }
    }

    if args.with_allies {
        roster
            .add_team(ALLY, Some(BattleSide::Defender))
            .set_player_ally_team(Some(ALLY));
        for class in [FormationClass::Infantry, FormationClass::Ranged] {
            roster.add_agent(
                AgentSnapshot::new(id(), format!("Allied {:?}", class), ALLY, 70.0)
                    .in_formation(class),
            );
        }
    }

    for n in 0..5 {
        roster.add_agent(
            AgentSnapshot::new(id(), format!("Raider {}", n + 1), ENEMY, 80.0)
                .in_formation(FormationClass::Infantry),
        );
    }

    mission.set_main_agent(player);
    mission
}
