//! Monster data structures: elements, rarities, roles and stat blocks.

use serde::{Deserialize, Serialize};

/// Elemental affinity of a monster or enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Element {
    #[default]
    Fire,
    Water,
    Earth,
    Wind,
    Light,
    Dark,
    Chaos,
}

impl Element {
    pub const ALL: [Element; 7] = [
        Element::Fire,
        Element::Water,
        Element::Earth,
        Element::Wind,
        Element::Light,
        Element::Dark,
        Element::Chaos,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Element::Fire => "Fire",
            Element::Water => "Water",
            Element::Earth => "Earth",
            Element::Wind => "Wind",
            Element::Light => "Light",
            Element::Dark => "Dark",
            Element::Chaos => "Chaos",
        }
    }

    /// The element this one deals bonus damage to, if any.
    /// Fire > Earth > Wind > Water > Fire; Light and Dark beat each other.
    pub fn strong_against(&self) -> Option<Element> {
        match self {
            Element::Fire => Some(Element::Earth),
            Element::Earth => Some(Element::Wind),
            Element::Wind => Some(Element::Water),
            Element::Water => Some(Element::Fire),
            Element::Light => Some(Element::Dark),
            Element::Dark => Some(Element::Light),
            Element::Chaos => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    N,
    R,
    SR,
    SSR,
    UR,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Tank,
    Dps,
    Support,
    Hybrid,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonsterStats {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
}

/// Static definition of a monster type, owned by the content tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterTemplate {
    pub id: String,
    pub name: String,
    pub element: Element,
    pub role: Role,
    #[serde(default)]
    pub rarity: Rarity,
    pub base_stats: MonsterStats,
}

/// A monster instance owned by the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMonster {
    /// Instance id
    pub id: String,
    /// Template id into the monster table
    pub monster_type_id: String,
    pub level: u32,
    /// Experience accumulated toward the next level
    #[serde(default)]
    pub exp: u64,
    #[serde(default)]
    pub awakening_level: u32,
    #[serde(default)]
    pub unlocked_skills: Vec<String>,
}

impl PlayerMonster {
    pub fn new(id: impl Into<String>, monster_type_id: impl Into<String>, level: u32) -> Self {
        Self {
            id: id.into(),
            monster_type_id: monster_type_id.into(),
            level: level.max(1),
            exp: 0,
            awakening_level: 0,
            unlocked_skills: Vec::new(),
        }
    }
}
