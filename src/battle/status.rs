//! Per-turn status effect resolution (damage and healing over time).

use super::types::{BattleEntity, StatusEffect, StatusKind};
use crate::core::config::BattleConfig;

/// Outcome of one status tick on one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusTickResult {
    pub entity: BattleEntity,
    pub damage_taken: u32,
    pub healing_received: u32,
    pub logs: Vec<String>,
}

/// Per-tick magnitude: `value` when set, otherwise `round(max_hp × percent)`.
pub fn tick_amount(effect: &StatusEffect, max_hp: u32, percent: f64) -> u32 {
    if effect.value > 0 {
        return effect.value;
    }
    (max_hp as f64 * percent).round() as u32
}

/// Applies one tick of every status effect on `entity`.
///
/// Damage and healing are summed over all effects and applied together, then
/// HP is clamped to `[0, max_hp]`. Every duration drops by one and expired
/// effects are removed. STUN and stat modifiers are left for the attack phase.
pub fn process_status_effects(entity: &BattleEntity, config: &BattleConfig) -> StatusTickResult {
    let mut logs = Vec::new();
    let mut damage_taken: u32 = 0;
    let mut healing_received: u32 = 0;

    for effect in &entity.status_effects {
        match effect.kind {
            StatusKind::Burn | StatusKind::Poison => {
                let percent = if effect.kind == StatusKind::Burn {
                    config.burn_percent
                } else {
                    config.poison_percent
                };
                let dmg = tick_amount(effect, entity.max_hp, percent);
                damage_taken = damage_taken.saturating_add(dmg);
                logs.push(format!(
                    "{} takes {} damage from {}.",
                    entity.name,
                    dmg,
                    effect.name()
                ));
            }
            StatusKind::Regen => {
                let heal = tick_amount(effect, entity.max_hp, config.regen_percent);
                healing_received = healing_received.saturating_add(heal);
                logs.push(format!("{} recovers {} HP from {}.", entity.name, heal, effect.name()));
            }
            _ => {}
        }
    }

    let net = entity.hp as i64 - damage_taken as i64 + healing_received as i64;
    let hp = net.clamp(0, entity.max_hp as i64) as u32;

    let mut remaining = Vec::with_capacity(entity.status_effects.len());
    for effect in &entity.status_effects {
        let duration = effect.duration.saturating_sub(1);
        if duration > 0 {
            remaining.push(StatusEffect {
                duration,
                ..effect.clone()
            });
        } else {
            logs.push(format!("{}'s {} wore off.", entity.name, effect.name()));
        }
    }

    StatusTickResult {
        entity: BattleEntity {
            hp,
            status_effects: remaining,
            ..entity.clone()
        },
        damage_taken,
        healing_received,
        logs,
    }
}
