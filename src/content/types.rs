//! Static content definitions: dungeons, enemies, drops, consumables, skills.

use crate::monster::{Element, Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DropKind {
    #[default]
    Material,
    Equipment,
}

/// One loot-table entry. `chance` is a percentage in 0..=100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyDrop {
    pub material_id: String,
    pub chance: f64,
    pub min_quantity: u32,
    pub max_quantity: u32,
    #[serde(default)]
    pub kind: DropKind,
}

impl EnemyDrop {
    pub fn material(material_id: &str, chance: f64, min_quantity: u32, max_quantity: u32) -> Self {
        Self {
            material_id: material_id.to_string(),
            chance,
            min_quantity,
            max_quantity,
            kind: DropKind::Material,
        }
    }

    pub fn equipment(equipment_id: &str, chance: f64) -> Self {
        Self {
            material_id: equipment_id.to_string(),
            chance,
            min_quantity: 1,
            max_quantity: 1,
            kind: DropKind::Equipment,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldRange {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyDefinition {
    pub id: String,
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    #[serde(default)]
    pub element: Element,
    #[serde(default)]
    pub exp: u64,
    #[serde(default)]
    pub drops: Vec<EnemyDrop>,
    #[serde(default)]
    pub gold_drop: Option<GoldRange>,
}

fn default_level() -> u32 {
    1
}

impl EnemyDefinition {
    pub fn new(id: &str, name: &str, hp: u32, attack: u32, defense: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            level: 1,
            hp,
            attack,
            defense,
            element: Element::default(),
            exp: 0,
            drops: Vec::new(),
            gold_drop: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dungeon {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_level")]
    pub recommended_level: u32,
    pub enemies: Vec<EnemyDefinition>,
}

impl Dungeon {
    pub fn enemy(&self, enemy_id: &str) -> Option<&EnemyDefinition> {
        self.enemies.iter().find(|e| e.id == enemy_id)
    }
}

/// What a consumable does when used. Decided at content-authoring time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsumableEffect {
    /// Restore a percentage of max HP
    HealHp { percent: u32 },
    BuffAtk { percent: u32, duration: u32 },
    BuffDef { percent: u32, duration: u32 },
    /// Strip harmful status effects
    CureStatus,
    /// Feed experience to a monster outside of battle
    GrantXp { amount: u64 },
}

impl ConsumableEffect {
    pub fn usable_in_battle(&self) -> bool {
        !matches!(self, ConsumableEffect::GrantXp { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumableDefinition {
    pub id: String,
    pub name: String,
    pub effect: ConsumableEffect,
}

/// A skill unlocked by level. Role skills leave `monster_type_id` empty;
/// unique skills name the monster type they belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub id: String,
    pub name: String,
    pub unlock_level: u32,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub monster_type_id: Option<String>,
}

impl SkillDefinition {
    pub fn unlocks_for(&self, monster_type_id: &str, role: Role, level: u32) -> bool {
        if self.unlock_level != level {
            return false;
        }
        match (&self.monster_type_id, self.role) {
            (Some(type_id), _) => type_id == monster_type_id,
            (None, Some(skill_role)) => skill_role == role,
            (None, None) => false,
        }
    }
}
