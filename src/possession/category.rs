//! Unit categories and their engine formation classes
//!
//! `UnitCategory` is internal and engine-agnostic. The host only ever sees
//! `FormationClass`, reached through `UnitCategory::formation_class`.

use serde::{Deserialize, Serialize};

/// Number of categories, and the required length of a weight array
pub const CATEGORY_COUNT: usize = 9;

/// Group of units the automatic successor search walks through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitCategory {
    /// Hero units; not backed by a formation
    Companions,
    Infantry,
    Ranged,
    Cavalry,
    HorseArcher,
    Skirmisher,
    HeavyInfantry,
    LightCavalry,
    HeavyCavalry,
}

impl UnitCategory {
    /// Declaration order; positional index into a weight array
    pub const ALL: [UnitCategory; CATEGORY_COUNT] = [
        UnitCategory::Companions,
        UnitCategory::Infantry,
        UnitCategory::Ranged,
        UnitCategory::Cavalry,
        UnitCategory::HorseArcher,
        UnitCategory::Skirmisher,
        UnitCategory::HeavyInfantry,
        UnitCategory::LightCavalry,
        UnitCategory::HeavyCavalry,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Engine formation backing this category, `None` for companions
    pub fn formation_class(self) -> Option<FormationClass> {
        FORMATION_TABLE
            .iter()
            .find(|(category, _)| *category == self)
            .map(|(_, class)| *class)
    }

    pub fn name(self) -> &'static str {
        match self {
            UnitCategory::Companions => "Companions",
            UnitCategory::Infantry => "Infantry",
            UnitCategory::Ranged => "Ranged",
            UnitCategory::Cavalry => "Cavalry",
            UnitCategory::HorseArcher => "HorseArcher",
            UnitCategory::Skirmisher => "Skirmisher",
            UnitCategory::HeavyInfantry => "HeavyInfantry",
            UnitCategory::LightCavalry => "LightCavalry",
            UnitCategory::HeavyCavalry => "HeavyCavalry",
        }
    }
}

impl std::fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Formation classes as the host engine numbers them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FormationClass {
    Infantry = 0,
    Ranged = 1,
    Cavalry = 2,
    HorseArcher = 3,
    Skirmisher = 4,
    HeavyInfantry = 5,
    LightCavalry = 6,
    HeavyCavalry = 7,
}

impl FormationClass {
    pub const ALL: [FormationClass; 8] = [
        FormationClass::Infantry,
        FormationClass::Ranged,
        FormationClass::Cavalry,
        FormationClass::HorseArcher,
        FormationClass::Skirmisher,
        FormationClass::HeavyInfantry,
        FormationClass::LightCavalry,
        FormationClass::HeavyCavalry,
    ];

    /// Engine-side numeric identifier
    pub fn engine_id(self) -> u8 {
        self as u8
    }
}

/// Category → formation mapping; companions are resolved by hero flag instead
const FORMATION_TABLE: [(UnitCategory, FormationClass); 8] = [
    (UnitCategory::Infantry, FormationClass::Infantry),
    (UnitCategory::Ranged, FormationClass::Ranged),
    (UnitCategory::Cavalry, FormationClass::Cavalry),
    (UnitCategory::HorseArcher, FormationClass::HorseArcher),
    (UnitCategory::Skirmisher, FormationClass::Skirmisher),
    (UnitCategory::HeavyInfantry, FormationClass::HeavyInfantry),
    (UnitCategory::LightCavalry, FormationClass::LightCavalry),
    (UnitCategory::HeavyCavalry, FormationClass::HeavyCavalry),
];
