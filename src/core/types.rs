//! Core type definitions used throughout the codebase
//!
//! Everything here is a plain value copied out of the host engine each
//! frame. Nothing holds a reference into engine-owned memory.

use serde::{Deserialize, Serialize};

use crate::possession::category::FormationClass;

/// Engine-assigned agent index, stable for the lifetime of a mission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl AgentId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Engine-assigned team index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub u32);

impl TeamId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }
}

/// How a team stands relative to the player's team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamRelation {
    /// The player's own team
    Own,
    /// A different team flagged friendly to the player
    Ally,
    /// A team flagged hostile to the player
    Enemy,
    /// Neither friend nor foe (spectators, unset teams)
    Neutral,
}

/// Read-only copy of one agent as seen in a single frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub name: String,
    pub team: Option<TeamId>,
    pub health: f32,
    /// Hero-type unit (lord, companion)
    pub is_hero: bool,
    pub formation: Option<FormationClass>,
}

impl AgentSnapshot {
    pub fn new(id: AgentId, name: impl Into<String>, team: TeamId, health: f32) -> Self {
        Self {
            id,
            name: name.into(),
            team: Some(team),
            health,
            is_hero: false,
            formation: None,
        }
    }

    pub fn hero(mut self) -> Self {
        self.is_hero = true;
        self
    }

    pub fn in_formation(mut self, class: FormationClass) -> Self {
        self.formation = Some(class);
        self
    }

    pub fn without_team(mut self) -> Self {
        self.team = None;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

/// 8-bit RGB display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from exactly three components in 0..=255
    pub fn from_components(values: &[i64]) -> Option<Self> {
        match values {
            [r, g, b] => Some(Self::new(
                u8::try_from(*r).ok()?,
                u8::try_from(*g).ok()?,
                u8::try_from(*b).ok()?,
            )),
            _ => None,
        }
    }
}
