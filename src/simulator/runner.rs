//! Main simulation runner.
//!
//! Drives the real battle engine (`battle::advance_turn`) headlessly, so
//! simulated outcomes follow the same formulas as live battles.

use super::config::SimConfig;
use super::report::{RunStats, SimReport};
use crate::battle::{advance_turn, start_battle, BattleResult, ConsumableSlot, TurnContext};
use crate::content::{ContentSource, GameContent};
use crate::core::constants::{DEFAULT_HEAL_POTION_ID, DEFAULT_HP_SLOT_THRESHOLD};
use crate::error::BattleError;
use crate::monster::PlayerMonster;
use crate::rewards::{MonsterProgress, PendingEffect};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig, content: &GameContent) -> Result<SimReport, BattleError> {
    let roster = enemy_roster(config, content)?;
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        // Create RNG for this run
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(run_idx as u64)),
            None => ChaCha8Rng::from_entropy(),
        };

        let run = simulate_single_run(config, content, &roster, &mut rng)?;

        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - Level {}, Wins {}, Losses {}, Timeouts {}, Gold {}",
                run_idx + 1,
                config.num_runs,
                run.final_level,
                run.victories,
                run.defeats,
                run.timeouts,
                run.gold
            );
        }
        all_runs.push(run);
    }

    Ok(SimReport::from_runs(all_runs))
}

fn enemy_roster(config: &SimConfig, content: &GameContent) -> Result<Vec<String>, BattleError> {
    let dungeon = content
        .dungeon(&config.dungeon_id)
        .ok_or_else(|| BattleError::UnknownDungeon(config.dungeon_id.clone()))?;

    match &config.enemy_id {
        Some(enemy_id) => {
            dungeon.enemy(enemy_id).ok_or_else(|| BattleError::UnknownEnemy {
                dungeon_id: config.dungeon_id.clone(),
                enemy_id: enemy_id.clone(),
            })?;
            Ok(vec![enemy_id.clone()])
        }
        None => Ok(dungeon.enemies.iter().map(|e| e.id.clone()).collect()),
    }
}

/// One monster fighting `battles_per_run` battles back to back.
fn simulate_single_run(
    config: &SimConfig,
    content: &GameContent,
    roster: &[String],
    rng: &mut ChaCha8Rng,
) -> Result<RunStats, BattleError> {
    let template = content
        .monster(&config.monster_type_id)
        .ok_or_else(|| BattleError::UnknownMonster(config.monster_type_id.clone()))?;
    let mut monster = PlayerMonster::new("sim_monster", config.monster_type_id.as_str(), config.starting_level);
    let mut inventory: HashMap<String, u32> = HashMap::new();
    let mut slots = Vec::new();
    if config.starting_potions > 0 {
        inventory.insert(DEFAULT_HEAL_POTION_ID.to_string(), config.starting_potions);
        slots.push(ConsumableSlot::hp_below(DEFAULT_HEAL_POTION_ID, DEFAULT_HP_SLOT_THRESHOLD));
    }

    let mut stats = RunStats::default();

    for battle_idx in 0..config.battles_per_run {
        if roster.is_empty() {
            break;
        }
        let enemy_id = &roster[battle_idx as usize % roster.len()];
        let enemy = content
            .enemy(&config.dungeon_id, enemy_id)
            .ok_or_else(|| BattleError::UnknownEnemy {
                dungeon_id: config.dungeon_id.clone(),
                enemy_id: enemy_id.clone(),
            })?;

        let mut state = start_battle(content, &config.dungeon_id, enemy_id, &monster, &[])?;
        let progress = MonsterProgress::from_monster(&monster, template);
        let mut turns = 0;

        while state.is_active() && turns < config.max_turns_per_battle {
            let mut ctx = TurnContext::new(&config.battle, content, enemy, &mut inventory)
                .with_slots(&slots)
                .with_progress(&progress);
            let outcome = advance_turn(&state, &mut ctx, rng);
            turns += 1;

            for effect in &outcome.effects {
                match effect {
                    PendingEffect::ConsumeItem { .. } => stats.potions_used += 1,
                    PendingEffect::GrantMaterial { material_id, quantity } => {
                        *stats.materials.entry(material_id.clone()).or_insert(0) += *quantity as u64;
                    }
                    PendingEffect::GrantGold { amount } => stats.gold += *amount as u64,
                    PendingEffect::GrantEquipment { .. } => stats.equipment_drops += 1,
                    PendingEffect::PersistMonsterProgress { progress } => progress.apply_to(&mut monster),
                }
            }
            state = outcome.state;
        }

        stats.battles += 1;
        stats.total_turns += turns as u64;
        match state.result {
            Some(BattleResult::Victory) => stats.victories += 1,
            Some(BattleResult::Defeat) => stats.defeats += 1,
            None => stats.timeouts += 1,
        }
    }

    stats.final_level = monster.level;
    Ok(stats)
}
