//! Battle formula configuration.
//!
//! Every tunable number the battle engine reads lives here. `Default` matches
//! the reference constants in `core::constants`; content authors can override
//! any subset from JSON.

use super::constants::*;
use crate::error::ContentError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// BURN damage per tick as a fraction of max HP
    pub burn_percent: f64,
    /// POISON damage per tick as a fraction of max HP
    pub poison_percent: f64,
    /// REGEN healing per tick as a fraction of max HP
    pub regen_percent: f64,
    /// Percent applied by ATK/DEF buffs and debuffs whose `value` is 0
    pub stat_modifier_default_percent: u32,

    /// Critical hit probability (0.0 - 1.0)
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub elemental_advantage: f64,
    pub elemental_disadvantage: f64,
    /// Fraction of the defender's DEF subtracted from raw damage
    pub defense_factor: f64,
    /// Half-width of the uniform damage roll; 0.1 means ×[0.9, 1.1)
    pub damage_variance: f64,
    pub minimum_damage: u32,

    /// Period of the auto-battle driver
    pub turn_interval_ms: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            burn_percent: BURN_PERCENT_OF_MAX_HP,
            poison_percent: POISON_PERCENT_OF_MAX_HP,
            regen_percent: REGEN_PERCENT_OF_MAX_HP,
            stat_modifier_default_percent: STAT_MODIFIER_DEFAULT_PERCENT,
            crit_chance: CRIT_CHANCE,
            crit_multiplier: CRIT_MULTIPLIER,
            elemental_advantage: ELEMENTAL_ADVANTAGE,
            elemental_disadvantage: ELEMENTAL_DISADVANTAGE,
            defense_factor: DEFENSE_MITIGATION_FACTOR,
            damage_variance: DAMAGE_VARIANCE,
            minimum_damage: MINIMUM_DAMAGE,
            turn_interval_ms: TURN_INTERVAL_MS,
        }
    }
}

impl BattleConfig {
    /// Reference formulas with crits and variance switched off, so every
    /// attack deals the same damage. Used by tests and balance checks.
    pub fn deterministic() -> Self {
        Self {
            crit_chance: 0.0,
            damage_variance: 0.0,
            ..Default::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ContentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
