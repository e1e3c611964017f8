//! Read-only view of the mission roster
//!
//! `RosterView` is the boundary between the selection logic and the host
//! engine. Every query returns owned snapshots; callers never hold onto
//! engine objects and must tolerate answers that disagree between two calls
//! in the same frame.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{AgentId, AgentSnapshot, TeamId, TeamRelation};
use crate::possession::category::FormationClass;

/// Queries the selection logic needs from the host
pub trait RosterView {
    /// Number of the team's formations with at least one living member
    ///
    /// Formations that exist but have emptied out are not counted; they
    /// still show up in `ControlHost::formation_owners`.
    fn formation_count(&self, team: TeamId) -> usize;

    /// Living agents of a team, in roster enumeration order
    fn active_agents(&self, team: TeamId) -> Vec<AgentSnapshot>;

    /// First living unit of a team's formation, if that formation exists
    fn first_unit(&self, team: TeamId, class: FormationClass) -> Option<AgentSnapshot>;

    /// The allied team fighting alongside the player, if any
    fn player_ally_team(&self) -> Option<TeamId>;

    /// How `team` stands relative to `player_team`
    fn relation(&self, team: TeamId, player_team: TeamId) -> TeamRelation;

    fn agent(&self, id: AgentId) -> Option<AgentSnapshot>;
}

/// Which side of the battle a team fights on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleSide {
    Attacker,
    Defender,
}

/// A team's formation together with its commanding player, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    pub class: FormationClass,
    pub player_owner: Option<AgentId>,
}

impl Formation {
    pub fn new(class: FormationClass) -> Self {
        Self {
            class,
            player_owner: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct TeamEntry {
    side: Option<BattleSide>,
    formations: Vec<Formation>,
}

/// In-memory roster snapshot
#[derive(Debug, Clone, Default)]
pub struct Roster {
    agents: Vec<AgentSnapshot>,
    index: AHashMap<AgentId, usize>,
    teams: AHashMap<TeamId, TeamEntry>,
    player_ally_team: Option<TeamId>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a team on a side of the battle
    pub fn add_team(&mut self, team: TeamId, side: Option<BattleSide>) -> &mut Self {
        self.teams.entry(team).or_default().side = side;
        self
    }

    pub fn set_player_ally_team(&mut self, team: Option<TeamId>) -> &mut Self {
        self.player_ally_team = team;
        self
    }

    /// Create an empty formation on a team
    pub fn add_formation(&mut self, team: TeamId, class: FormationClass) -> &mut Self {
        let entry = self.teams.entry(team).or_default();
        if !entry.formations.iter().any(|f| f.class == class) {
            entry.formations.push(Formation::new(class));
        }
        self
    }

    /// Add an agent, creating its team and formation on first use
    ///
    /// Re-adding a known id replaces the previous snapshot in place.
    pub fn add_agent(&mut self, agent: AgentSnapshot) -> &mut Self {
        if let (Some(team), Some(class)) = (agent.team, agent.formation) {
            self.add_formation(team, class);
        } else if let Some(team) = agent.team {
            self.teams.entry(team).or_default();
        }

        match self.index.get(&agent.id) {
            Some(&slot) => self.agents[slot] = agent,
            None => {
                self.index.insert(agent.id, self.agents.len());
                self.agents.push(agent);
            }
        }
        self
    }

    pub fn set_health(&mut self, id: AgentId, health: f32) -> bool {
        match self.index.get(&id) {
            Some(&slot) => {
                self.agents[slot].health = health;
                true
            }
            None => false,
        }
    }

    pub fn formations(&self, team: TeamId) -> &[Formation] {
        self.teams
            .get(&team)
            .map(|t| t.formations.as_slice())
            .unwrap_or(&[])
    }

    pub fn formations_mut(&mut self, team: TeamId) -> &mut [Formation] {
        self.teams
            .get_mut(&team)
            .map(|t| t.formations.as_mut_slice())
            .unwrap_or(&mut [])
    }

    pub fn agents(&self) -> &[AgentSnapshot] {
        &self.agents
    }
}

impl RosterView for Roster {
    fn formation_count(&self, team: TeamId) -> usize {
        self.formations(team)
            .iter()
            .filter(|f| self.first_unit(team, f.class).is_some())
            .count()
    }

    fn active_agents(&self, team: TeamId) -> Vec<AgentSnapshot> {
        self.agents
            .iter()
            .filter(|a| a.team == Some(team) && a.is_alive())
            .cloned()
            .collect()
    }

    fn first_unit(&self, team: TeamId, class: FormationClass) -> Option<AgentSnapshot> {
        if !self.formations(team).iter().any(|f| f.class == class) {
            return None;
        }
        self.agents
            .iter()
            .find(|a| a.team == Some(team) && a.formation == Some(class) && a.is_alive())
            .cloned()
    }

    fn player_ally_team(&self) -> Option<TeamId> {
        self.player_ally_team
    }

    fn relation(&self, team: TeamId, player_team: TeamId) -> TeamRelation {
        if team == player_team {
            return TeamRelation::Own;
        }
        let side_of = |t: TeamId| self.teams.get(&t).and_then(|e| e.side);
        match (side_of(team), side_of(player_team)) {
            (Some(a), Some(b)) if a == b => TeamRelation::Ally,
            (Some(_), Some(_)) => TeamRelation::Enemy,
            _ => TeamRelation::Neutral,
        }
    }

    fn agent(&self, id: AgentId) -> Option<AgentSnapshot> {
        self.index.get(&id).map(|&slot| self.agents[slot].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER: TeamId = TeamId(0);
    const ALLY: TeamId = TeamId(1);
    const ENEMY: TeamId = TeamId(2);

    fn roster() -> Roster {
        let mut roster = Roster::new();
        roster
            .add_team(PLAYER, Some(BattleSide::Attacker))
            .add_team(ALLY, Some(BattleSide::Attacker))
            .add_team(ENEMY, Some(BattleSide::Defender))
            .add_team(TeamId(3), None);
        roster
    }

    #[test]
    fn test_relations() {
        let roster = roster();
        assert_eq!(roster.relation(PLAYER, PLAYER), TeamRelation::Own);
        assert_eq!(roster.relation(ALLY, PLAYER), TeamRelation::Ally);
        assert_eq!(roster.relation(ENEMY, PLAYER), TeamRelation::Enemy);
        assert_eq!(roster.relation(TeamId(3), PLAYER), TeamRelation::Neutral);
        assert_eq!(roster.relation(TeamId(99), PLAYER), TeamRelation::Neutral);
    }

    #[test]
    fn test_first_unit_skips_dead() {
        let mut roster = roster();
        roster
            .add_agent(
                AgentSnapshot::new(AgentId(1), "a", PLAYER, 0.0)
                    .in_formation(FormationClass::Ranged),
            )
            .add_agent(
                AgentSnapshot::new(AgentId(2), "b", PLAYER, 40.0)
                    .in_formation(FormationClass::Ranged),
            );
        assert_eq!(
            roster.first_unit(PLAYER, FormationClass::Ranged).map(|a| a.id),
            Some(AgentId(2))
        );
        assert!(roster.first_unit(PLAYER, FormationClass::Cavalry).is_none());
        assert_eq!(roster.formation_count(PLAYER), 1);
    }

    #[test]
    fn test_active_agents_in_enumeration_order() {
        let mut roster = roster();
        roster
            .add_agent(AgentSnapshot::new(AgentId(5), "e", PLAYER, 10.0))
            .add_agent(AgentSnapshot::new(AgentId(3), "c", PLAYER, 0.0))
            .add_agent(AgentSnapshot::new(AgentId(4), "d", ENEMY, 10.0))
            .add_agent(AgentSnapshot::new(AgentId(1), "a", PLAYER, 10.0));
        let ids: Vec<AgentId> = roster.active_agents(PLAYER).iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![AgentId(5), AgentId(1)]);
        assert_eq!(roster.formation_count(PLAYER), 0);
    }

    #[test]
    fn test_readding_agent_replaces_snapshot() {
        let mut roster = roster();
        roster.add_agent(AgentSnapshot::new(AgentId(1), "a", PLAYER, 10.0));
        roster.add_agent(AgentSnapshot::new(AgentId(1), "a", PLAYER, 0.0));
        assert_eq!(roster.agents().len(), 1);
        assert!(roster.active_agents(PLAYER).is_empty());
        assert!(roster.set_health(AgentId(1), 3.0));
        assert!(!roster.set_health(AgentId(9), 3.0));
    }

    #[test]
    fn test_formation_count_ignores_emptied_formations() {
        let mut roster = roster();
        roster
            .add_formation(PLAYER, FormationClass::Cavalry)
            .add_agent(
                AgentSnapshot::new(AgentId(1), "a", PLAYER, 0.0)
                    .in_formation(FormationClass::Infantry),
            )
            .add_agent(
                AgentSnapshot::new(AgentId(2), "b", PLAYER, 10.0)
                    .in_formation(FormationClass::Ranged),
            );
        assert_eq!(roster.formations(PLAYER).len(), 3);
        assert_eq!(roster.formation_count(PLAYER), 1);

        roster.set_health(AgentId(2), 0.0);
        assert_eq!(roster.formation_count(PLAYER), 0);
        assert_eq!(roster.formations(PLAYER).len(), 3);
    }
}
