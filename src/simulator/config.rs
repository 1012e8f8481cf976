//! Simulation configuration.

use crate::core::config::BattleConfig;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulation runs to perform
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Dungeon whose enemies are fought
    pub dungeon_id: String,

    /// Fight only this enemy (None = cycle through the dungeon's roster)
    pub enemy_id: Option<String>,

    /// Monster type sent into battle
    pub monster_type_id: String,

    /// Level the monster starts each run at
    pub starting_level: u32,

    /// Consecutive battles per run; the monster keeps its experience
    pub battles_per_run: u32,

    /// Turn limit before a battle counts as a timeout
    pub max_turns_per_battle: u32,

    /// Healing potions in stock at the start of each run (0 = no auto-heal slot)
    pub starting_potions: u32,

    /// Formula constants used by the engine
    pub battle: BattleConfig,

    /// Log verbosity (0 = silent, 1 = summary, 2 = detailed)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 1000,
            seed: None,
            dungeon_id: "dungeon_slime_forest".to_string(),
            enemy_id: None,
            monster_type_id: "monster_slime_basic".to_string(),
            starting_level: 1,
            battles_per_run: 20,
            max_turns_per_battle: 200,
            starting_potions: 0,
            battle: BattleConfig::default(),
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Quick config for a sanity pass over the default dungeon
    pub fn quick() -> Self {
        Self {
            num_runs: 100,
            battles_per_run: 10,
            ..Default::default()
        }
    }

    /// Single-enemy matchup at a fixed level
    pub fn matchup(monster_type_id: &str, level: u32, enemy_id: &str) -> Self {
        Self {
            num_runs: 500,
            monster_type_id: monster_type_id.to_string(),
            starting_level: level,
            enemy_id: Some(enemy_id.to_string()),
            battles_per_run: 1,
            ..Default::default()
        }
    }

    /// Long grind to study leveling pace and loot income
    pub fn grind(battles_per_run: u32) -> Self {
        Self {
            num_runs: 50,
            battles_per_run,
            starting_potions: 10,
            ..Default::default()
        }
    }
}
