//! Automatic consumable usage, evaluated at the start of every turn.

use super::types::{BattleEntity, StatusEffect, StatusKind, PLAYER_ENTITY_ID};
use crate::content::{ConsumableCatalog, ConsumableEffect};
use crate::core::constants::DEFAULT_HP_SLOT_THRESHOLD;
use crate::error::InventoryError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Player inventory as seen by the battle engine.
pub trait Inventory {
    /// Removes `quantity` of `item_id`, or fails without changing anything.
    fn consume(&mut self, item_id: &str, quantity: u32) -> Result<(), InventoryError>;
}

impl Inventory for HashMap<String, u32> {
    fn consume(&mut self, item_id: &str, quantity: u32) -> Result<(), InventoryError> {
        let available = self.get(item_id).copied().unwrap_or(0);
        if available < quantity {
            return Err(InventoryError::Insufficient {
                item_id: item_id.to_string(),
                available,
                requested: quantity,
            });
        }
        self.insert(item_id.to_string(), available - quantity);
        Ok(())
    }
}

/// When a slot fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotTrigger {
    /// HP percent at or below `threshold`
    HpBelow { threshold: u32 },
    /// Any active player effect of one of these kinds
    StatusMatch { status_types: Vec<StatusKind> },
}

/// A player-configured auto-use rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumableSlot {
    pub enabled: bool,
    pub consumable_id: Option<String>,
    pub trigger: SlotTrigger,
}

impl ConsumableSlot {
    pub fn hp_below(consumable_id: &str, threshold: u32) -> Self {
        Self {
            enabled: true,
            consumable_id: Some(consumable_id.to_string()),
            trigger: SlotTrigger::HpBelow { threshold },
        }
    }

    pub fn status_match(consumable_id: &str, status_types: Vec<StatusKind>) -> Self {
        Self {
            enabled: true,
            consumable_id: Some(consumable_id.to_string()),
            trigger: SlotTrigger::StatusMatch { status_types },
        }
    }

    /// The two empty, disabled slots a new player starts with.
    pub fn default_slots() -> Vec<Self> {
        vec![
            Self {
                enabled: false,
                consumable_id: None,
                trigger: SlotTrigger::HpBelow {
                    threshold: DEFAULT_HP_SLOT_THRESHOLD,
                },
            },
            Self {
                enabled: false,
                consumable_id: None,
                trigger: SlotTrigger::StatusMatch {
                    status_types: vec![StatusKind::Burn, StatusKind::Poison],
                },
            },
        ]
    }

    pub fn should_trigger(&self, player: &BattleEntity) -> bool {
        match &self.trigger {
            SlotTrigger::HpBelow { threshold } => {
                player.max_hp > 0 && player.hp_percent() <= *threshold as f64
            }
            SlotTrigger::StatusMatch { status_types } => player
                .status_effects
                .iter()
                .any(|e| status_types.contains(&e.kind)),
        }
    }
}

/// One consumable that was actually used this turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumableUse {
    pub consumable_id: String,
    pub healed: u32,
    pub cured: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutomationOutcome {
    pub used: Vec<ConsumableUse>,
    pub logs: Vec<String>,
}

/// Evaluates every slot in order against `player`, consuming and applying
/// items as they fire. Later slots see the effects of earlier ones.
pub fn run_consumable_automation(
    player: &mut BattleEntity,
    slots: &[ConsumableSlot],
    catalog: &dyn ConsumableCatalog,
    inventory: &mut dyn Inventory,
) -> AutomationOutcome {
    let mut outcome = AutomationOutcome::default();

    for slot in slots {
        if !slot.enabled {
            continue;
        }
        let Some(consumable_id) = slot.consumable_id.as_deref() else {
            continue;
        };
        let Some(effect) = catalog.consumable_effect(consumable_id) else {
            tracing::debug!(consumable_id, "no effect defined, skipping slot");
            continue;
        };
        if !effect.usable_in_battle() || !slot.should_trigger(player) {
            continue;
        }

        if let Err(err) = inventory.consume(consumable_id, 1) {
            tracing::debug!(consumable_id, %err, "auto-consumable skipped");
            continue;
        }

        let used = apply_consumable(player, &effect, slot, consumable_id);
        outcome.logs.push(describe_use(player, &effect, &used));
        outcome.used.push(used);
    }

    outcome
}

fn apply_consumable(
    player: &mut BattleEntity,
    effect: &ConsumableEffect,
    slot: &ConsumableSlot,
    consumable_id: &str,
) -> ConsumableUse {
    let mut used = ConsumableUse {
        consumable_id: consumable_id.to_string(),
        healed: 0,
        cured: 0,
    };

    match effect {
        ConsumableEffect::HealHp { percent } => {
            let amount = (player.max_hp as u64 * *percent as u64 / 100) as u32;
            let before = player.hp;
            player.heal(amount);
            used.healed = player.hp - before;
        }
        ConsumableEffect::CureStatus => {
            let before = player.status_effects.len();
            match &slot.trigger {
                SlotTrigger::StatusMatch { status_types } => player
                    .status_effects
                    .retain(|e| !status_types.contains(&e.kind)),
                SlotTrigger::HpBelow { .. } => {
                    player.status_effects.retain(|e| !e.kind.is_harmful())
                }
            }
            used.cured = before - player.status_effects.len();
        }
        ConsumableEffect::BuffAtk { percent, duration } => {
            player.apply_status(
                StatusEffect::new(StatusKind::AtkBuff, *duration, PLAYER_ENTITY_ID).with_value(*percent),
            );
        }
        ConsumableEffect::BuffDef { percent, duration } => {
            player.apply_status(
                StatusEffect::new(StatusKind::DefBuff, *duration, PLAYER_ENTITY_ID).with_value(*percent),
            );
        }
        ConsumableEffect::GrantXp { .. } => {}
    }

    used
}

fn describe_use(player: &BattleEntity, effect: &ConsumableEffect, used: &ConsumableUse) -> String {
    match effect {
        ConsumableEffect::HealHp { .. } => format!(
            "Used {}! Recovered {} HP ({}/{}).",
            used.consumable_id, used.healed, player.hp, player.max_hp
        ),
        ConsumableEffect::CureStatus => format!(
            "Used {}! Cleared {} status effect(s).",
            used.consumable_id, used.cured
        ),
        ConsumableEffect::BuffAtk { percent, duration } => format!(
            "Used {}! Attack +{}% for {} turns.",
            used.consumable_id, percent, duration
        ),
        ConsumableEffect::BuffDef { percent, duration } => format!(
            "Used {}! Defense +{}% for {} turns.",
            used.consumable_id, percent, duration
        ),
        ConsumableEffect::GrantXp { .. } => format!("Used {}.", used.consumable_id),
    }
}
