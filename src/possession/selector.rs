//! Automatic successor selection
//!
//! Walks the category preference order and returns the first living unit
//! found. Teams whose formations have all emptied out skip the walk and get
//! their healthiest agent instead.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::types::{AgentSnapshot, TeamId};
use crate::possession::category::UnitCategory;
use crate::possession::roster::RosterView;

/// Where a successor was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionSource {
    /// The player's own units of this category
    Category(UnitCategory),
    /// The allied team's units of this category
    AlliedCategory(UnitCategory),
    /// No populated formation left on the player's team; healthiest agent picked
    HealthiestFallback,
}

impl SelectionSource {
    pub fn category(&self) -> Option<UnitCategory> {
        match self {
            SelectionSource::Category(c) | SelectionSource::AlliedCategory(c) => Some(*c),
            SelectionSource::HealthiestFallback => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Successor {
    pub agent: AgentSnapshot,
    pub source: SelectionSource,
}

/// Pick the unit that should inherit player control
///
/// Returns `None` when no category yields a living unit. That is an
/// ordinary outcome, not a fault.
pub fn select_successor<R: RosterView + ?Sized>(
    order: &[UnitCategory],
    roster: &R,
    player_team: TeamId,
    allow_allies: bool,
) -> Option<Successor> {
    if roster.formation_count(player_team) == 0 {
        return healthiest_agent(roster, player_team).map(|agent| Successor {
            agent,
            source: SelectionSource::HealthiestFallback,
        });
    }

    let ally_team = roster
        .player_ally_team()
        .filter(|team| allow_allies && *team != player_team);

    order.iter().find_map(|&category| {
        let found = find_in_category(roster, player_team, ally_team, category);
        if found.is_none() {
            tracing::debug!("No eligible unit in {}", category);
        }
        found
    })
}

fn find_in_category<R: RosterView + ?Sized>(
    roster: &R,
    player_team: TeamId,
    ally_team: Option<TeamId>,
    category: UnitCategory,
) -> Option<Successor> {
    let Some(class) = category.formation_class() else {
        return first_companion(roster, player_team).map(|agent| Successor {
            agent,
            source: SelectionSource::Category(category),
        });
    };

    if let Some(agent) = roster.first_unit(player_team, class).filter(|a| a.is_alive()) {
        return Some(Successor {
            agent,
            source: SelectionSource::Category(category),
        });
    }

    ally_team
        .and_then(|team| roster.first_unit(team, class))
        .filter(|a| a.is_alive())
        .map(|agent| Successor {
            agent,
            source: SelectionSource::AlliedCategory(category),
        })
}

fn first_companion<R: RosterView + ?Sized>(roster: &R, team: TeamId) -> Option<AgentSnapshot> {
    roster
        .active_agents(team)
        .into_iter()
        .find(|a| a.is_hero && a.is_alive())
}

/// Highest-health living agent; earliest in the roster wins ties
fn healthiest_agent<R: RosterView + ?Sized>(roster: &R, team: TeamId) -> Option<AgentSnapshot> {
    roster
        .active_agents(team)
        .into_iter()
        .enumerate()
        .filter(|(_, a)| a.is_alive())
        .max_by_key(|(i, a)| (OrderedFloat(a.health), Reverse(*i)))
        .map(|(_, a)| a)
}
