//! Control transfer
//!
//! Moves player control onto another agent and cleans up the engine state
//! left behind by the death screen.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{AgentId, AgentSnapshot, TeamId};
use crate::possession::category::FormationClass;

/// Engine-side effects a control transfer needs
pub trait ControlHost {
    /// Agent currently issuing orders for a team
    fn order_controller_owner(&self, team: TeamId) -> Option<AgentId>;
    fn set_order_controller_owner(&mut self, team: TeamId, owner: AgentId) -> Result<()>;

    /// Every formation of a team, empty ones included, with its player owner
    fn formation_owners(&self, team: TeamId) -> Vec<(FormationClass, Option<AgentId>)>;
    fn set_formation_owner(&mut self, team: TeamId, class: FormationClass, owner: AgentId)
        -> Result<()>;

    /// Hand human input to this agent
    fn set_player_controlled(&mut self, agent: AgentId) -> Result<()>;
    /// Remove the slow-walk cap the engine puts on freshly possessed agents
    fn lift_speed_limit(&mut self, agent: AgentId) -> Result<()>;

    /// Scoreboard "you are dead" banner; no-op when no scoreboard exists
    fn set_main_character_dead(&mut self, dead: bool);
    fn set_fast_forward(&mut self, enabled: bool);
}

/// The agent the player controls and the team they fight for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    current: Option<AgentId>,
    team: Option<TeamId>,
}

impl ControlState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<AgentId> {
        self.current
    }

    pub fn team(&self) -> Option<TeamId> {
        self.team
    }

    /// Track a new main agent reported by the engine, including its team
    pub fn adopt(&mut self, agent: &AgentSnapshot) {
        self.current = Some(agent.id);
        self.team = agent.team;
    }

    /// Forget everything; used when a mission starts
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Options for a single transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOptions {
    /// Hand the outgoing agent's formations and orders to the new agent
    pub reassign_formations: bool,
}

/// Move player control to `new_agent`
///
/// The caller guarantees `new_agent` is alive. The player's team stays what
/// it was, so possessing an allied unit keeps commanding the player's own
/// formations.
pub fn transfer_control<H: ControlHost + ?Sized>(
    state: &mut ControlState,
    new_agent: &AgentSnapshot,
    host: &mut H,
    options: TransferOptions,
) -> Result<()> {
    if options.reassign_formations {
        if let (Some(previous), Some(team)) = (state.current, state.team) {
            reassign_formations(host, team, previous, new_agent.id)?;
        }
    }

    host.set_player_controlled(new_agent.id)?;
    host.lift_speed_limit(new_agent.id)?;
    state.current = Some(new_agent.id);
    if state.team.is_none() {
        state.team = new_agent.team;
    }

    host.set_main_character_dead(false);
    host.set_fast_forward(false);

    tracing::info!("Player now controls {} ({})", new_agent.name, new_agent.id);
    Ok(())
}

fn reassign_formations<H: ControlHost + ?Sized>(
    host: &mut H,
    team: TeamId,
    previous: AgentId,
    next: AgentId,
) -> Result<()> {
    if previous == next {
        return Ok(());
    }

    if host.order_controller_owner(team) == Some(previous) {
        host.set_order_controller_owner(team, next)?;
    }

    let owned: Vec<FormationClass> = host
        .formation_owners(team)
        .into_iter()
        .filter(|(_, owner)| *owner == Some(previous))
        .map(|(class, _)| class)
        .collect();
    for class in owned {
        host.set_formation_owner(team, class, next)?;
        tracing::trace!("Formation {} ({:?}) now led by {}", class.engine_id(), class, next);
    }

    tracing::debug!("Reassigned formations of team {:?} from {} to {}", team, previous, next);
    Ok(())
}
