//! Mod lifecycle and per-frame driver
//!
//! `PossessionMod` is the single owner of the options, the priority
//! orderer and the control state. The host calls its entry points:
//!
//! - `on_module_load` once when the module is loaded
//! - `on_before_ui_ready` once the message feed can display text
//! - `on_mission_init` whenever a mission starts
//! - `tick` every frame
//!
//! Runtime faults never escape `tick`; they become a single fault notice.

use std::path::Path;

use crate::core::config::{LoadedConfig, PossessionConfig};
use crate::core::error::{PossessionError, Result};
use crate::core::types::{AgentId, AgentSnapshot, TeamId};
use crate::possession::control::{transfer_control, ControlHost, ControlState, TransferOptions};
use crate::possession::input::{Key, PossessionCommand};
use crate::possession::manual::{resolve_manual_target, ManualDecision};
use crate::possession::notice::{NoticeGate, NoticeKind, NoticeSink};
use crate::possession::priority::PriorityOrderer;
use crate::possession::roster::RosterView;
use crate::possession::selector::{select_successor, SelectionSource};

/// Everything the driver needs from the running mission
pub trait MissionHost: RosterView + ControlHost {
    /// A mission scene exists and the game is not paused in a menu
    fn is_running(&self) -> bool;

    /// The agent the engine currently treats as the player's
    fn main_agent_snapshot(&self) -> Option<AgentSnapshot>;

    /// The agent the spectator camera follows after death
    fn spectated_snapshot(&self) -> Option<AgentSnapshot>;
}

/// What a frame did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Nothing to do this frame
    Idle,
    /// Started tracking a new main agent reported by the engine
    Adopted(AgentId),
    /// Control moved to another agent
    Transferred {
        agent: AgentId,
        source: TransferSource,
    },
    /// Spectated unit may not be possessed
    Refused(AgentId),
    /// Automatic search found nobody
    NoSuccessor,
    /// A runtime fault was caught and reported
    Fault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferSource {
    Spectated,
    Priority(SelectionSource),
}

#[derive(Debug)]
pub struct PossessionMod {
    config: PossessionConfig,
    pending_warnings: Option<String>,
    orderer: Option<PriorityOrderer>,
    state: ControlState,
    seed: Option<u64>,
    missions_started: u64,
}

impl PossessionMod {
    pub fn new(config: PossessionConfig) -> Self {
        Self {
            config,
            pending_warnings: None,
            orderer: None,
            state: ControlState::new(),
            seed: None,
            missions_started: 0,
        }
    }

    /// Load options from disk, keeping warnings until the UI is ready
    pub fn on_module_load(path: &Path) -> Self {
        Self::from_loaded(PossessionConfig::load(path))
    }

    pub fn from_loaded(loaded: LoadedConfig) -> Self {
        let pending_warnings = loaded.batched_warnings();
        let mut possession = Self::new(loaded.config);
        possession.pending_warnings = pending_warnings;
        possession
    }

    /// Seed tie shuffling for reproducible runs
    ///
    /// Each mission offsets the seed by how many missions came before it,
    /// so consecutive missions draw different tie orders.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &PossessionConfig {
        &self.config
    }

    pub fn control_state(&self) -> &ControlState {
        &self.state
    }

    pub fn has_pending_warnings(&self) -> bool {
        self.pending_warnings.is_some()
    }

    fn gate(&self) -> NoticeGate {
        NoticeGate {
            verbose: self.config.verbose,
            mute_exceptions: self.config.mute_exceptions,
            message_color: self.config.message_color,
            error_color: self.config.error_color,
        }
    }

    fn inform<S: NoticeSink + ?Sized>(&self, sink: &mut S, text: &str) {
        self.gate().emit(sink, NoticeKind::Information, text);
    }

    /// Flush startup warnings as one notice; later calls do nothing
    pub fn on_before_ui_ready<S: NoticeSink + ?Sized>(&mut self, sink: &mut S) {
        if let Some(batched) = self.pending_warnings.take() {
            self.gate().emit(sink, NoticeKind::StartupError, &batched);
        }
    }

    /// Forget the previous mission's player and rebuild the priority order
    pub fn on_mission_init(&mut self) {
        self.state.reset();
        let table = self.config.priorities;
        let randomize = self.config.randomize_within_priority;
        let mission_seed = self.seed.map(|seed| seed.wrapping_add(self.missions_started));
        self.missions_started += 1;
        self.orderer = Some(match mission_seed {
            Some(seed) => PriorityOrderer::with_seed(table, randomize, seed),
            None => PriorityOrderer::new(table, randomize),
        });
        tracing::debug!("Mission initialized, priorities {:?}", table.weights());
    }

    /// Per-frame entry point with raw key presses
    pub fn tick_keys<H, S>(&mut self, host: &mut H, pressed: &[Key], sink: &mut S) -> TickOutcome
    where
        H: MissionHost + ?Sized,
        S: NoticeSink + ?Sized,
    {
        let command = self.config.keymap.command(pressed);
        self.tick(host, command, sink)
    }

    /// Per-frame entry point
    ///
    /// Evaluates at most one command, and only once the tracked unit has
    /// died.
    pub fn tick<H, S>(
        &mut self,
        host: &mut H,
        command: Option<PossessionCommand>,
        sink: &mut S,
    ) -> TickOutcome
    where
        H: MissionHost + ?Sized,
        S: NoticeSink + ?Sized,
    {
        match self.try_tick(host, command, sink) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Possession tick failed: {}", e);
                self.gate().emit(
                    sink,
                    NoticeKind::Fault,
                    &format!("An exception was thrown: '{}'", e),
                );
                TickOutcome::Fault
            }
        }
    }

    fn try_tick<H, S>(
        &mut self,
        host: &mut H,
        command: Option<PossessionCommand>,
        sink: &mut S,
    ) -> Result<TickOutcome>
    where
        H: MissionHost + ?Sized,
        S: NoticeSink + ?Sized,
    {
        if !host.is_running() {
            return Ok(TickOutcome::Idle);
        }

        if let Some(main) = host.main_agent_snapshot() {
            if self.state.current() != Some(main.id) {
                tracing::debug!("Tracking main agent {} ({})", main.name, main.id);
                self.state.adopt(&main);
                return Ok(TickOutcome::Adopted(main.id));
            }
        }

        let Some(command) = command else {
            return Ok(TickOutcome::Idle);
        };
        let (Some(current), Some(team)) = (self.state.current(), self.state.team()) else {
            return Ok(TickOutcome::Idle);
        };
        let player = host
            .agent(current)
            .ok_or(PossessionError::UnknownAgent(current))?;
        if player.is_alive() {
            return Ok(TickOutcome::Idle);
        }

        match command {
            PossessionCommand::PossessSpectated => self.manual_control(host, team, sink),
            PossessionCommand::PossessByPriority => self.automatic_control(host, team, sink),
        }
    }

    fn manual_control<H, S>(&mut self, host: &mut H, team: TeamId, sink: &mut S) -> Result<TickOutcome>
    where
        H: MissionHost + ?Sized,
        S: NoticeSink + ?Sized,
    {
        let spectated = host.spectated_snapshot();
        let decision = resolve_manual_target(
            spectated.as_ref(),
            team,
            &*host,
            self.config.allow_control_allies,
        );

        match decision {
            ManualDecision::TakeControl(agent) => {
                self.take_control(&agent, host, sink)?;
                Ok(TickOutcome::Transferred {
                    agent: agent.id,
                    source: TransferSource::Spectated,
                })
            }
            ManualDecision::DenyAlly(agent) => {
                self.inform(sink, &format!("You can't take control of ally '{}'", agent.name));
                Ok(TickOutcome::Refused(agent.id))
            }
            ManualDecision::DenyEnemy(agent) => {
                self.inform(sink, &format!("You can't take control of enemy '{}'", agent.name));
                Ok(TickOutcome::Refused(agent.id))
            }
            ManualDecision::NoTarget => Ok(TickOutcome::Idle),
        }
    }

    fn automatic_control<H, S>(&mut self, host: &mut H, team: TeamId, sink: &mut S) -> Result<TickOutcome>
    where
        H: MissionHost + ?Sized,
        S: NoticeSink + ?Sized,
    {
        let Some(orderer) = self.orderer.as_mut() else {
            return Ok(TickOutcome::Idle);
        };
        let order = orderer.current_order().to_vec();

        let Some(successor) =
            select_successor(&order, &*host, team, self.config.allow_control_allies)
        else {
            self.inform(sink, "No friendly eligible soldiers left");
            return Ok(TickOutcome::NoSuccessor);
        };

        self.take_control(&successor.agent, host, sink)?;
        match successor.source.category() {
            Some(category) => self.inform(sink, &format!("Soldier found in group {}", category)),
            None => self.inform(sink, "Healthiest soldier selected"),
        }
        Ok(TickOutcome::Transferred {
            agent: successor.agent.id,
            source: TransferSource::Priority(successor.source),
        })
    }

    fn take_control<H, S>(&mut self, agent: &AgentSnapshot, host: &mut H, sink: &mut S) -> Result<()>
    where
        H: MissionHost + ?Sized,
        S: NoticeSink + ?Sized,
    {
        self.inform(sink, &format!("You are now controlling '{}'", agent.name));
        let options = TransferOptions {
            reassign_formations: self.config.allow_control_formations,
        };
        transfer_control(&mut self.state, agent, host, options)
    }
}
