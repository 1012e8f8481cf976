//! Battle setup: resolves both combatants and builds the initial state.

use super::types::{BattleState, SynergyBonuses};
use crate::content::ContentSource;
use crate::core::constants::*;
use crate::error::BattleError;
use crate::monster::{calculate_stats, MonsterStats, MonsterTemplate, PlayerMonster, Rarity, Role};
use std::collections::BTreeMap;

/// Sums the percent bonuses every support monster grants the battling one.
pub fn compute_synergy_bonuses(main: &MonsterTemplate, supports: &[&MonsterTemplate]) -> SynergyBonuses {
    let mut bonuses = SynergyBonuses::default();

    for support in supports {
        if support.element == main.element {
            bonuses.atk_percent += SYNERGY_ELEMENT_MATCH_ATK;
        }

        match support.role {
            Role::Tank => bonuses.hp_percent += SYNERGY_ROLE_BONUS,
            Role::Dps => bonuses.atk_percent += SYNERGY_ROLE_BONUS,
            Role::Support => bonuses.def_percent += SYNERGY_ROLE_BONUS,
            Role::Hybrid | Role::Production => {}
        }

        let rarity_bonus = match support.rarity {
            Rarity::SSR => SYNERGY_SSR_BONUS,
            Rarity::UR => SYNERGY_UR_BONUS,
            _ => 0,
        };
        bonuses.atk_percent += rarity_bonus;
        bonuses.def_percent += rarity_bonus;
        bonuses.hp_percent += rarity_bonus;
    }

    bonuses
}

/// Level-scaled stats with synergy bonuses applied on top, floored.
pub fn battle_stats(template: &MonsterTemplate, monster: &PlayerMonster, bonuses: &SynergyBonuses) -> MonsterStats {
    let scaled = calculate_stats(
        &template.base_stats,
        monster.level,
        template.rarity,
        monster.awakening_level,
    );
    MonsterStats {
        hp: apply_percent(scaled.hp, bonuses.hp_percent),
        atk: apply_percent(scaled.atk, bonuses.atk_percent),
        def: apply_percent(scaled.def, bonuses.def_percent),
    }
}

fn apply_percent(value: u32, percent: u32) -> u32 {
    let scaled = value as u64 * (100 + percent as u64) / 100;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Creates a fresh battle between `monster` and one enemy of `dungeon_id`.
///
/// Support monsters whose type is missing from content are ignored. A
/// missing dungeon, enemy or battling monster type refuses the battle.
pub fn start_battle(
    content: &impl ContentSource,
    dungeon_id: &str,
    enemy_id: &str,
    monster: &PlayerMonster,
    supports: &[PlayerMonster],
) -> Result<BattleState, BattleError> {
    let dungeon = content
        .dungeon(dungeon_id)
        .ok_or_else(|| BattleError::UnknownDungeon(dungeon_id.to_string()))?;
    let enemy = dungeon
        .enemy(enemy_id)
        .ok_or_else(|| BattleError::UnknownEnemy {
            dungeon_id: dungeon_id.to_string(),
            enemy_id: enemy_id.to_string(),
        })?;
    let template = content
        .monster(&monster.monster_type_id)
        .ok_or_else(|| BattleError::UnknownMonster(monster.monster_type_id.clone()))?;

    let support_templates: Vec<&MonsterTemplate> = supports
        .iter()
        .filter(|s| s.id != monster.id)
        .filter_map(|s| {
            let found = content.monster(&s.monster_type_id);
            if found.is_none() {
                tracing::warn!(monster_type_id = %s.monster_type_id, "support monster has no template");
            }
            found
        })
        .collect();

    let synergy_bonuses = compute_synergy_bonuses(template, &support_templates);
    let stats = battle_stats(template, monster, &synergy_bonuses);

    tracing::info!(
        dungeon_id,
        enemy_id,
        monster_id = %monster.id,
        hp = stats.hp,
        atk = stats.atk,
        def = stats.def,
        "battle started"
    );

    Ok(BattleState {
        is_battling: true,
        turn: 1,
        result: None,
        dungeon_id: dungeon_id.to_string(),
        player_monster_id: monster.id.clone(),
        player_monster_type: monster.monster_type_id.clone(),
        player_name: template.name.clone(),
        player_hp: stats.hp,
        player_max_hp: stats.hp,
        player_atk: stats.atk,
        player_def: stats.def,
        player_element: template.element,
        player_status_effects: Vec::new(),
        enemy_id: enemy.id.clone(),
        enemy_name: enemy.name.clone(),
        enemy_hp: enemy.hp,
        enemy_max_hp: enemy.hp,
        enemy_atk: enemy.attack,
        enemy_def: enemy.defense,
        enemy_element: enemy.element,
        enemy_status_effects: Vec::new(),
        logs: vec![format!("Battle start! {} appeared!", enemy.name)],
        floating_texts: Vec::new(),
        rewards: BTreeMap::new(),
        equipment_rewards: Vec::new(),
        reward_manifest: None,
        synergy_bonuses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::GameContent;
    use crate::monster::Element;

    fn template(id: &str, element: Element, role: Role, rarity: Rarity) -> MonsterTemplate {
        MonsterTemplate {
            id: id.to_string(),
            name: id.to_string(),
            element,
            role,
            rarity,
            base_stats: MonsterStats { hp: 100, atk: 10, def: 10 },
        }
    }

    #[test]
    fn test_synergy_element_role_rarity() {
        let main = template("main", Element::Fire, Role::Dps, Rarity::N);
        let fire_dps = template("a", Element::Fire, Role::Dps, Rarity::N);
        let tank_ssr = template("b", Element::Water, Role::Tank, Rarity::SSR);
        let support_ur = template("c", Element::Wind, Role::Support, Rarity::UR);

        let bonuses = compute_synergy_bonuses(&main, &[&fire_dps, &tank_ssr, &support_ur]);

        // atk: 2 (element) + 2 (dps) + 5 + 10
        assert_eq!(bonuses.atk_percent, 19);
        // def: 5 + 2 (support) + 10
        assert_eq!(bonuses.def_percent, 17);
        // hp: 2 (tank) + 5 + 10
        assert_eq!(bonuses.hp_percent, 17);
    }

    #[test]
    fn test_no_supports_no_bonus() {
        let main = template("main", Element::Fire, Role::Dps, Rarity::N);
        assert_eq!(compute_synergy_bonuses(&main, &[]), SynergyBonuses::default());
    }

    #[test]
    fn test_battle_stats_apply_bonus_after_scaling() {
        let t = template("main", Element::Fire, Role::Dps, Rarity::N);
        let m = PlayerMonster::new("pm", "main", 1);
        let stats = battle_stats(
            &t,
            &m,
            &SynergyBonuses {
                atk_percent: 19,
                def_percent: 0,
                hp_percent: 17,
            },
        );
        assert_eq!(stats, MonsterStats { hp: 117, atk: 11, def: 10 });
    }

    #[test]
    fn test_large_synergy_saturates_stats() {
        let mut t = template("main", Element::Fire, Role::Dps, Rarity::N);
        t.base_stats = MonsterStats { hp: u32::MAX, atk: 10, def: 10 };
        let m = PlayerMonster::new("pm", "main", 1);
        let stats = battle_stats(
            &t,
            &m,
            &SynergyBonuses {
                atk_percent: 0,
                def_percent: 0,
                hp_percent: 50,
            },
        );
        assert_eq!(stats.hp, u32::MAX);
        assert_eq!(stats.atk, 10);
    }

    #[test]
    fn test_start_battle_from_sample_content() {
        let content = GameContent::sample().unwrap();
        let slime = PlayerMonster::new("pm_1", "monster_slime_basic", 1);
        let state = start_battle(&content, "dungeon_slime_forest", "slime_green", &slime, &[]).unwrap();

        assert!(state.is_active());
        assert_eq!(state.turn, 1);
        assert_eq!(state.player_hp, 150);
        assert_eq!(state.player_max_hp, 150);
        assert_eq!(state.player_atk, 20);
        assert_eq!(state.player_def, 30);
        assert_eq!(state.enemy_hp, 30);
        assert_eq!(state.logs, vec!["Battle start! Green Slime appeared!".to_string()]);
    }

    #[test]
    fn test_start_battle_unknown_ids() {
        let content = GameContent::sample().unwrap();
        let slime = PlayerMonster::new("pm_1", "monster_slime_basic", 1);

        assert_eq!(
            start_battle(&content, "nowhere", "slime_green", &slime, &[]),
            Err(BattleError::UnknownDungeon("nowhere".to_string()))
        );
        assert!(matches!(
            start_battle(&content, "dungeon_slime_forest", "dragon", &slime, &[]),
            Err(BattleError::UnknownEnemy { .. })
        ));
        let ghost = PlayerMonster::new("pm_2", "monster_ghost", 1);
        assert_eq!(
            start_battle(&content, "dungeon_slime_forest", "slime_green", &ghost, &[]),
            Err(BattleError::UnknownMonster("monster_ghost".to_string()))
        );
    }

    #[test]
    fn test_unknown_support_is_ignored() {
        let content = GameContent::sample().unwrap();
        let slime = PlayerMonster::new("pm_1", "monster_slime_basic", 1);
        let supports = vec![
            PlayerMonster::new("pm_2", "monster_ghost", 1),
            PlayerMonster::new("pm_3", "monster_wolf_dark", 1),
        ];
        let state =
            start_battle(&content, "dungeon_slime_forest", "slime_green", &slime, &supports).unwrap();
        // Dark Wolf: DPS +2 and SSR +5
        assert_eq!(state.synergy_bonuses.atk_percent, 7);
        assert_eq!(state.synergy_bonuses.def_percent, 5);
        assert_eq!(state.synergy_bonuses.hp_percent, 5);
        assert_eq!(state.player_atk, 21);
    }
}
