//! Loot rolls for a defeated enemy.

use crate::content::{DropKind, EnemyDefinition, EnemyDrop, GoldRange};
use crate::core::constants::DROP_ROLL_SCALE;
use rand::Rng;
use std::collections::BTreeMap;

/// Everything one defeated enemy yields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LootRoll {
    /// material id -> summed quantity
    pub materials: BTreeMap<String, u32>,
    pub gold: u32,
    pub equipment: Vec<String>,
    pub xp_gain: u64,
}

/// One independent trial: draw in `[0, 100)`, success when below `chance`.
/// Returns the rolled quantity on success.
pub fn roll_drop(drop: &EnemyDrop, rng: &mut impl Rng) -> Option<u32> {
    let roll = rng.gen::<f64>() * DROP_ROLL_SCALE;
    if roll >= drop.chance {
        return None;
    }
    let (lo, hi) = ordered(drop.min_quantity, drop.max_quantity);
    Some(rng.gen_range(lo..=hi))
}

pub fn roll_gold(range: &GoldRange, rng: &mut impl Rng) -> u32 {
    let (lo, hi) = ordered(range.min, range.max);
    rng.gen_range(lo..=hi)
}

fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Rolls every drop of `enemy` plus its gold range. Drops that roll a
/// quantity of 0 grant nothing. XP is the enemy's flat `exp` with no randomness.
pub fn resolve_rewards(enemy: &EnemyDefinition, rng: &mut impl Rng) -> LootRoll {
    let mut loot = LootRoll {
        xp_gain: enemy.exp,
        ..Default::default()
    };

    for drop in &enemy.drops {
        let quantity = match roll_drop(drop, rng) {
            Some(quantity) if quantity > 0 => quantity,
            _ => continue,
        };
        match drop.kind {
            DropKind::Material => {
                *loot.materials.entry(drop.material_id.clone()).or_insert(0) += quantity;
            }
            DropKind::Equipment => loot.equipment.push(drop.material_id.clone()),
        }
    }

    if let Some(range) = &enemy.gold_drop {
        loot.gold = roll_gold(range, rng);
    }

    loot
}
