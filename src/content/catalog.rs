//! Read-only lookups into the static content tables.
//!
//! The battle engine only ever sees these traits. `GameContent` is the
//! in-memory implementation, loaded from JSON.

use super::types::{ConsumableDefinition, ConsumableEffect, Dungeon, EnemyDefinition, SkillDefinition};
use crate::error::ContentError;
use crate::monster::{MonsterTemplate, Role};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Monster base stats and dungeon/enemy definitions.
pub trait ContentSource {
    fn monster(&self, monster_type_id: &str) -> Option<&MonsterTemplate>;

    fn dungeon(&self, dungeon_id: &str) -> Option<&Dungeon>;

    fn enemy(&self, dungeon_id: &str, enemy_id: &str) -> Option<&EnemyDefinition> {
        self.dungeon(dungeon_id)?.enemy(enemy_id)
    }
}

pub trait ConsumableCatalog {
    fn consumable_effect(&self, consumable_id: &str) -> Option<ConsumableEffect>;
}

pub trait SkillCatalog {
    /// Skill ids that unlock exactly at `level` for this monster type and role.
    fn skills_unlocked_at(&self, monster_type_id: &str, role: Role, level: u32) -> Vec<String>;
}

/// Everything a battle session needs from content.
pub trait GameData: ContentSource + ConsumableCatalog + SkillCatalog {}

impl<T: ContentSource + ConsumableCatalog + SkillCatalog> GameData for T {}

const SAMPLE_CONTENT: &str = include_str!("../../data/sample_content.json");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameContent {
    #[serde(default)]
    pub monsters: Vec<MonsterTemplate>,
    #[serde(default)]
    pub dungeons: Vec<Dungeon>,
    #[serde(default)]
    pub consumables: Vec<ConsumableDefinition>,
    #[serde(default)]
    pub skills: Vec<SkillDefinition>,
}

impl GameContent {
    pub fn from_json_str(json: &str) -> Result<Self, ContentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The bundled starter content (slime forest dungeon, starter monsters).
    pub fn sample() -> Result<Self, ContentError> {
        Self::from_json_str(SAMPLE_CONTENT)
    }
}

impl ContentSource for GameContent {
    fn monster(&self, monster_type_id: &str) -> Option<&MonsterTemplate> {
        self.monsters.iter().find(|m| m.id == monster_type_id)
    }

    fn dungeon(&self, dungeon_id: &str) -> Option<&Dungeon> {
        self.dungeons.iter().find(|d| d.id == dungeon_id)
    }
}

impl ConsumableCatalog for GameContent {
    fn consumable_effect(&self, consumable_id: &str) -> Option<ConsumableEffect> {
        self.consumables
            .iter()
            .find(|c| c.id == consumable_id)
            .map(|c| c.effect.clone())
    }
}

impl SkillCatalog for GameContent {
    fn skills_unlocked_at(&self, monster_type_id: &str, role: Role, level: u32) -> Vec<String> {
        self.skills
            .iter()
            .filter(|s| s.unlocks_for(monster_type_id, role, level))
            .map(|s| s.id.clone())
            .collect()
    }
}
