//! Battle state: combatants, status effects and the per-battle snapshot.

use crate::core::config::BattleConfig;
use crate::monster::Element;
use crate::rewards::RewardManifest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PLAYER_ENTITY_ID: &str = "player";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusKind {
    Burn,
    Poison,
    Stun,
    AtkBuff,
    DefBuff,
    AtkDebuff,
    DefDebuff,
    Regen,
}

impl StatusKind {
    pub fn name(&self) -> &'static str {
        match self {
            StatusKind::Burn => "Burn",
            StatusKind::Poison => "Poison",
            StatusKind::Stun => "Stun",
            StatusKind::AtkBuff => "Attack Up",
            StatusKind::DefBuff => "Defense Up",
            StatusKind::AtkDebuff => "Attack Down",
            StatusKind::DefDebuff => "Defense Down",
            StatusKind::Regen => "Regen",
        }
    }

    /// Effects a cure potion strips.
    pub fn is_harmful(&self) -> bool {
        matches!(
            self,
            StatusKind::Burn
                | StatusKind::Poison
                | StatusKind::Stun
                | StatusKind::AtkDebuff
                | StatusKind::DefDebuff
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub id: String,
    pub kind: StatusKind,
    /// Magnitude override; 0 means the kind's default
    #[serde(default)]
    pub value: u32,
    /// Remaining ticks
    pub duration: u32,
    pub source_id: String,
}

impl StatusEffect {
    pub fn new(kind: StatusKind, duration: u32, source_id: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            value: 0,
            duration,
            source_id: source_id.to_string(),
        }
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// One combatant for the duration of a battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleEntity {
    pub id: String,
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub atk: u32,
    pub def: u32,
    pub element: Element,
    pub status_effects: Vec<StatusEffect>,
    pub is_player: bool,
}

impl BattleEntity {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.status_effects.iter().any(|e| e.kind == kind)
    }

    /// Adds an effect, refreshing any existing effect of the same kind in place.
    pub fn apply_status(&mut self, effect: StatusEffect) {
        match self.status_effects.iter_mut().find(|e| e.kind == effect.kind) {
            Some(existing) => *existing = effect,
            None => self.status_effects.push(effect),
        }
    }

    pub fn heal(&mut self, amount: u32) {
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    pub fn hp_percent(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.hp as f64 / self.max_hp as f64 * 100.0
    }

    /// ATK after buffs and debuffs.
    pub fn effective_atk(&self, config: &BattleConfig) -> u32 {
        self.modified_stat(self.atk, StatusKind::AtkBuff, StatusKind::AtkDebuff, config)
    }

    /// DEF after buffs and debuffs.
    pub fn effective_def(&self, config: &BattleConfig) -> u32 {
        self.modified_stat(self.def, StatusKind::DefBuff, StatusKind::DefDebuff, config)
    }

    fn modified_stat(
        &self,
        base: u32,
        buff: StatusKind,
        debuff: StatusKind,
        config: &BattleConfig,
    ) -> u32 {
        let mut percent: i64 = 100;
        for effect in &self.status_effects {
            let magnitude = match effect.value {
                0 => config.stat_modifier_default_percent as i64,
                v => v as i64,
            };
            if effect.kind == buff {
                percent += magnitude;
            } else if effect.kind == debuff {
                percent -= magnitude;
            }
        }
        let scaled = base as i64 * percent.max(0) / 100;
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleResult {
    Victory,
    Defeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FloatingKind {
    Damage,
    Crit,
    Heal,
    Xp,
    LevelUp,
}

/// A visual event for the UI. The engine only ever appends these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloatingText {
    pub id: String,
    pub text: String,
    pub kind: FloatingKind,
    pub target: Side,
}

/// Percent bonuses from assigned support monsters, fixed at battle start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SynergyBonuses {
    pub atk_percent: u32,
    pub def_percent: u32,
    pub hp_percent: u32,
}

/// Single source of truth for one active battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    pub is_battling: bool,
    pub turn: u32,
    pub result: Option<BattleResult>,

    pub dungeon_id: String,
    pub player_monster_id: String,
    pub player_monster_type: String,
    pub player_name: String,
    pub player_hp: u32,
    pub player_max_hp: u32,
    pub player_atk: u32,
    pub player_def: u32,
    pub player_element: Element,
    pub player_status_effects: Vec<StatusEffect>,

    pub enemy_id: String,
    pub enemy_name: String,
    pub enemy_hp: u32,
    pub enemy_max_hp: u32,
    pub enemy_atk: u32,
    pub enemy_def: u32,
    pub enemy_element: Element,
    pub enemy_status_effects: Vec<StatusEffect>,

    pub logs: Vec<String>,
    pub floating_texts: Vec<FloatingText>,
    /// material id -> quantity, plus the reserved gold key
    pub rewards: BTreeMap<String, u32>,
    pub equipment_rewards: Vec<String>,
    pub reward_manifest: Option<RewardManifest>,
    pub synergy_bonuses: SynergyBonuses,
}

impl BattleState {
    /// ACTIVE: still battling and no result yet.
    pub fn is_active(&self) -> bool {
        self.is_battling && self.result.is_none()
    }

    pub fn player_entity(&self) -> BattleEntity {
        BattleEntity {
            id: PLAYER_ENTITY_ID.to_string(),
            name: self.player_name.clone(),
            hp: self.player_hp,
            max_hp: self.player_max_hp,
            atk: self.player_atk,
            def: self.player_def,
            element: self.player_element,
            status_effects: self.player_status_effects.clone(),
            is_player: true,
        }
    }

    pub fn enemy_entity(&self) -> BattleEntity {
        BattleEntity {
            id: self.enemy_id.clone(),
            name: self.enemy_name.clone(),
            hp: self.enemy_hp,
            max_hp: self.enemy_max_hp,
            atk: self.enemy_atk,
            def: self.enemy_def,
            element: self.enemy_element,
            status_effects: self.enemy_status_effects.clone(),
            is_player: false,
        }
    }

    /// Writes back the mutable combat fields of both combatants.
    pub fn store_entities(&mut self, player: BattleEntity, enemy: BattleEntity) {
        self.player_hp = player.hp.min(self.player_max_hp);
        self.player_status_effects = player.status_effects;
        self.enemy_hp = enemy.hp.min(self.enemy_max_hp);
        self.enemy_status_effects = enemy.status_effects;
    }

    /// Drains the visual-event queue for the UI.
    pub fn consume_floating_texts(&mut self) -> Vec<FloatingText> {
        std::mem::take(&mut self.floating_texts)
    }

    pub fn gold_reward(&self) -> u32 {
        self.rewards
            .get(crate::core::constants::GOLD_REWARD_KEY)
            .copied()
            .unwrap_or(0)
    }
}
