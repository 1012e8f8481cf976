//! Victory rewards and the outbox of effects that still need persisting.

use super::drops::LootRoll;
use super::experience::{LevelUpOutcome, MonsterProgress};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything a victory granted, in one place.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RewardManifest {
    pub materials: BTreeMap<String, u32>,
    pub gold: u32,
    pub equipment: Vec<String>,
    pub xp_gain: u64,
    pub leveled_up: bool,
    pub levels_gained: u32,
    pub new_level: Option<u32>,
    pub new_skill_ids: Vec<String>,
    /// Progression after XP was applied, when a monster was tracked
    pub progress: Option<MonsterProgress>,
}

impl RewardManifest {
    pub fn new(loot: LootRoll, level_up: Option<LevelUpOutcome>, progress: Option<MonsterProgress>) -> Self {
        let level_up = level_up.unwrap_or_default();
        Self {
            materials: loot.materials,
            gold: loot.gold,
            equipment: loot.equipment,
            xp_gain: loot.xp_gain,
            leveled_up: level_up.leveled_up,
            levels_gained: level_up.levels_gained,
            new_level: progress.as_ref().map(|p| p.level),
            new_skill_ids: level_up.newly_unlocked_skill_ids,
            progress,
        }
    }

    /// Outbox entries for durable storage, in grant order.
    pub fn pending_effects(&self) -> Vec<PendingEffect> {
        let mut effects: Vec<PendingEffect> = self
            .materials
            .iter()
            .filter(|(_, qty)| **qty > 0)
            .map(|(id, qty)| PendingEffect::GrantMaterial {
                material_id: id.clone(),
                quantity: *qty,
            })
            .collect();

        if self.gold > 0 {
            effects.push(PendingEffect::GrantGold { amount: self.gold });
        }
        effects.extend(
            self.equipment
                .iter()
                .map(|id| PendingEffect::GrantEquipment {
                    equipment_id: id.clone(),
                }),
        );
        if let Some(progress) = &self.progress {
            effects.push(PendingEffect::PersistMonsterProgress {
                progress: progress.clone(),
            });
        }
        effects
    }
}

/// A side effect the engine decided on but does not perform itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PendingEffect {
    GrantMaterial { material_id: String, quantity: u32 },
    GrantGold { amount: u32 },
    GrantEquipment { equipment_id: String },
    /// Mirror of a local inventory consumption
    ConsumeItem { item_id: String, quantity: u32 },
    PersistMonsterProgress { progress: MonsterProgress },
}

impl PendingEffect {
    pub fn label(&self) -> String {
        match self {
            PendingEffect::GrantMaterial { material_id, quantity } => {
                format!("grant {quantity}x {material_id}")
            }
            PendingEffect::GrantGold { amount } => format!("grant {amount} gold"),
            PendingEffect::GrantEquipment { equipment_id } => format!("grant {equipment_id}"),
            PendingEffect::ConsumeItem { item_id, quantity } => {
                format!("consume {quantity}x {item_id}")
            }
            PendingEffect::PersistMonsterProgress { progress } => {
                format!("save {} at level {}", progress.monster_id, progress.level)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_effects_skip_empty_grants() {
        let manifest = RewardManifest::new(LootRoll::default(), None, None);
        assert!(manifest.pending_effects().is_empty());
    }

    #[test]
    fn test_pending_effects_order() {
        let loot = LootRoll {
            materials: BTreeMap::from([("slime_fluid".to_string(), 2)]),
            gold: 4,
            equipment: vec!["eq_slime_crown".to_string()],
            xp_gain: 10,
        };
        let manifest = RewardManifest::new(loot, None, None);
        let effects = manifest.pending_effects();
        assert_eq!(
            effects,
            vec![
                PendingEffect::GrantMaterial {
                    material_id: "slime_fluid".to_string(),
                    quantity: 2,
                },
                PendingEffect::GrantGold { amount: 4 },
                PendingEffect::GrantEquipment {
                    equipment_id: "eq_slime_crown".to_string(),
                },
            ]
        );
        assert_eq!(manifest.xp_gain, 10);
        assert!(!manifest.leveled_up);
    }

    #[test]
    fn test_pending_effect_json_shape() {
        let json = serde_json::to_string(&PendingEffect::GrantGold { amount: 3 }).unwrap();
        assert_eq!(json, r#"{"type":"GRANT_GOLD","amount":3}"#);
    }
}
