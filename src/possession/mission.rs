//! In-memory mission host
//!
//! Implements every host trait over a `Roster` so the possession logic
//! can run headless: in tests and in the `possession_sim` runner.

use ahash::{AHashMap, AHashSet};

use crate::core::error::{PossessionError, Result};
use crate::core::types::{AgentId, AgentSnapshot, TeamId, TeamRelation};
use crate::possession::category::FormationClass;
use crate::possession::control::ControlHost;
use crate::possession::driver::MissionHost;
use crate::possession::roster::{Roster, RosterView};

/// Who drives an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Controller {
    Ai,
    Player,
}

#[derive(Debug, Clone, Default)]
pub struct SimMission {
    roster: Roster,
    running: bool,
    main_agent: Option<AgentId>,
    spectated: Option<AgentId>,
    controllers: AHashMap<AgentId, Controller>,
    order_controllers: AHashMap<TeamId, AgentId>,
    speed_limit_lifted: AHashSet<AgentId>,
    main_character_dead: bool,
    fast_forward: bool,
}

impl SimMission {
    pub fn new() -> Self {
        Self {
            running: true,
            ..Self::default()
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn main_agent(&self) -> Option<AgentId> {
        self.main_agent
    }

    /// Make an agent the engine's main agent, as at mission start
    pub fn set_main_agent(&mut self, agent: AgentId) {
        self.main_agent = Some(agent);
        self.controllers.insert(agent, Controller::Player);
    }

    /// Point the spectator camera at an agent
    pub fn spectate(&mut self, agent: Option<AgentId>) {
        self.spectated = agent;
    }

    /// Drop an agent's health to zero; killing the main agent raises the death banner
    pub fn kill(&mut self, agent: AgentId) {
        self.roster.set_health(agent, 0.0);
        if self.main_agent == Some(agent) {
            self.main_character_dead = true;
        }
    }

    pub fn is_player_controlled(&self, agent: AgentId) -> bool {
        self.controllers.get(&agent) == Some(&Controller::Player)
    }

    pub fn speed_limit_lifted(&self, agent: AgentId) -> bool {
        self.speed_limit_lifted.contains(&agent)
    }

    pub fn main_character_dead(&self) -> bool {
        self.main_character_dead
    }

    pub fn fast_forward(&self) -> bool {
        self.fast_forward
    }

    fn require_agent(&self, agent: AgentId) -> Result<()> {
        match self.roster.agent(agent) {
            Some(_) => Ok(()),
            None => Err(PossessionError::UnknownAgent(agent)),
        }
    }
}

impl RosterView for SimMission {
    fn formation_count(&self, team: TeamId) -> usize {
        self.roster.formation_count(team)
    }

    fn active_agents(&self, team: TeamId) -> Vec<AgentSnapshot> {
        self.roster.active_agents(team)
    }

    fn first_unit(&self, team: TeamId, class: FormationClass) -> Option<AgentSnapshot> {
        self.roster.first_unit(team, class)
    }

    fn player_ally_team(&self) -> Option<TeamId> {
        self.roster.player_ally_team()
    }

    fn relation(&self, team: TeamId, player_team: TeamId) -> TeamRelation {
        self.roster.relation(team, player_team)
    }

    fn agent(&self, id: AgentId) -> Option<AgentSnapshot> {
        self.roster.agent(id)
    }
}

impl MissionHost for SimMission {
    fn is_running(&self) -> bool {
        self.running
    }

    fn main_agent_snapshot(&self) -> Option<AgentSnapshot> {
        self.main_agent.and_then(|id| self.roster.agent(id))
    }

    fn spectated_snapshot(&self) -> Option<AgentSnapshot> {
        self.spectated.and_then(|id| self.roster.agent(id))
    }
}

impl ControlHost for SimMission {
    fn order_controller_owner(&self, team: TeamId) -> Option<AgentId> {
        self.order_controllers.get(&team).copied()
    }

    fn set_order_controller_owner(&mut self, team: TeamId, owner: AgentId) -> Result<()> {
        self.require_agent(owner)?;
        self.order_controllers.insert(team, owner);
        Ok(())
    }

    fn formation_owners(&self, team: TeamId) -> Vec<(FormationClass, Option<AgentId>)> {
        self.roster
            .formations(team)
            .iter()
            .map(|f| (f.class, f.player_owner))
            .collect()
    }

    fn set_formation_owner(
        &mut self,
        team: TeamId,
        class: FormationClass,
        owner: AgentId,
    ) -> Result<()> {
        self.require_agent(owner)?;
        let formation = self
            .roster
            .formations_mut(team)
            .iter_mut()
            .find(|f| f.class == class)
            .ok_or_else(|| {
                PossessionError::Host(format!("team {:?} has no {:?} formation", team, class))
            })?;
        formation.player_owner = Some(owner);
        Ok(())
    }

    fn set_player_controlled(&mut self, agent: AgentId) -> Result<()> {
        self.require_agent(agent)?;
        if let Some(previous) = self.main_agent.filter(|id| *id != agent) {
            self.controllers.insert(previous, Controller::Ai);
        }
        self.controllers.insert(agent, Controller::Player);
        self.main_agent = Some(agent);
        Ok(())
    }

    fn lift_speed_limit(&mut self, agent: AgentId) -> Result<()> {
        self.require_agent(agent)?;
        self.speed_limit_lifted.insert(agent);
        Ok(())
    }

    fn set_main_character_dead(&mut self, dead: bool) {
        self.main_character_dead = dead;
    }

    fn set_fast_forward(&mut self, enabled: bool) {
        self.fast_forward = enabled;
    }
}
