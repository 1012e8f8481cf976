//! Monster leveling: experience curve, level caps and level-scaled stats.

use super::types::{MonsterStats, Rarity};
use crate::core::constants::*;
use serde::{Deserialize, Serialize};

/// Per-rarity leveling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RarityConfig {
    pub max_level: u32,
    /// Stat growth multiplier per level
    pub growth_rate: f64,
    /// Required-exp multiplier
    pub exp_multiplier: f64,
}

pub fn rarity_config(rarity: Rarity) -> RarityConfig {
    match rarity {
        Rarity::N => RarityConfig {
            max_level: 30,
            growth_rate: 1.0,
            exp_multiplier: 1.0,
        },
        Rarity::R => RarityConfig {
            max_level: 50,
            growth_rate: 1.15,
            exp_multiplier: 1.2,
        },
        Rarity::SR => RarityConfig {
            max_level: 70,
            growth_rate: 1.3,
            exp_multiplier: 1.5,
        },
        // UR shares the SSR curve; it differs only in synergy bonuses
        Rarity::SSR | Rarity::UR => RarityConfig {
            max_level: 99,
            growth_rate: 1.5,
            exp_multiplier: 2.0,
        },
    }
}

/// Experience needed to go from `level` to `level + 1`.
pub fn required_exp(level: u32, rarity: Rarity) -> u64 {
    let level = level as u64;
    let raw = EXP_CURVE_LINEAR * level + EXP_CURVE_QUADRATIC * level * level;
    (raw as f64 * rarity_config(rarity).exp_multiplier).floor() as u64
}

/// Total experience from level 1 to `target_level`.
pub fn total_exp_to_level(target_level: u32, rarity: Rarity) -> u64 {
    (1..target_level).map(|lv| required_exp(lv, rarity)).sum()
}

/// Level cap including the awakening extension.
pub fn max_level(rarity: Rarity, awakening_level: u32) -> u32 {
    rarity_config(rarity).max_level + awakening_level * AWAKENING_MAX_LEVEL_BONUS
}

/// Stats at a given level:
/// `base × (1 + (level − 1) × 0.08 × growth) × (1 + awakening × 0.05)`, floored.
pub fn calculate_stats(
    base: &MonsterStats,
    level: u32,
    rarity: Rarity,
    awakening_level: u32,
) -> MonsterStats {
    let config = rarity_config(rarity);
    let level_mult =
        1.0 + level.saturating_sub(1) as f64 * BASE_STAT_GROWTH_PER_LEVEL * config.growth_rate;
    let awakening_mult = 1.0 + awakening_level as f64 * AWAKENING_STAT_BONUS_PER_LEVEL;
    let mult = level_mult * awakening_mult;

    MonsterStats {
        hp: (base.hp as f64 * mult).floor() as u32,
        atk: (base.atk as f64 * mult).floor() as u32,
        def: (base.def as f64 * mult).floor() as u32,
    }
}

/// Result of adding experience to a level/exp pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    pub new_level: u32,
    pub new_exp: u64,
    pub levels_gained: u32,
}

/// Adds experience and applies every level-up it pays for.
/// Exp overflow is discarded once the level cap is reached.
pub fn process_level_up(
    level: u32,
    exp: u64,
    added_exp: u64,
    rarity: Rarity,
    awakening_level: u32,
) -> LevelProgress {
    let cap = max_level(rarity, awakening_level);
    let mut new_level = level.max(1);
    let mut new_exp = exp.saturating_add(added_exp);
    let mut levels_gained = 0;

    while new_level < cap {
        let needed = required_exp(new_level, rarity);
        if new_exp < needed {
            break;
        }
        new_exp -= needed;
        new_level += 1;
        levels_gained += 1;
    }

    if new_level >= cap {
        new_exp = 0;
    }

    LevelProgress {
        new_level,
        new_exp,
        levels_gained,
    }
}
