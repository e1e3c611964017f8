//! Manual possession of the spectated unit

use crate::core::types::{AgentSnapshot, TeamId, TeamRelation};
use crate::possession::roster::RosterView;

/// Outcome of asking to possess the unit the camera follows
#[derive(Debug, Clone, PartialEq)]
pub enum ManualDecision {
    TakeControl(AgentSnapshot),
    /// Allied unit while allied possession is disabled
    DenyAlly(AgentSnapshot),
    DenyEnemy(AgentSnapshot),
    /// Nothing to do and nothing to report
    NoTarget,
}

/// Decide what to do with the spectated agent
pub fn resolve_manual_target<R: RosterView + ?Sized>(
    spectated: Option<&AgentSnapshot>,
    player_team: TeamId,
    roster: &R,
    allow_control_allies: bool,
) -> ManualDecision {
    let Some(agent) = spectated.filter(|a| a.is_alive()) else {
        return ManualDecision::NoTarget;
    };
    let Some(team) = agent.team else {
        return ManualDecision::NoTarget;
    };

    match roster.relation(team, player_team) {
        TeamRelation::Own => ManualDecision::TakeControl(agent.clone()),
        TeamRelation::Ally if allow_control_allies => ManualDecision::TakeControl(agent.clone()),
        TeamRelation::Ally => ManualDecision::DenyAlly(agent.clone()),
        TeamRelation::Enemy => ManualDecision::DenyEnemy(agent.clone()),
        TeamRelation::Neutral => ManualDecision::NoTarget,
    }
}
