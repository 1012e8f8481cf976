//! Experience gain, level-up cascade and skill unlocks for the battling monster.

use crate::content::SkillCatalog;
use crate::monster::{process_level_up, MonsterTemplate, PlayerMonster, Rarity, Role};
use serde::{Deserialize, Serialize};

/// Progression snapshot of the monster in battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterProgress {
    pub monster_id: String,
    pub monster_type_id: String,
    pub role: Role,
    pub rarity: Rarity,
    pub level: u32,
    pub exp: u64,
    pub awakening_level: u32,
    pub unlocked_skills: Vec<String>,
}

impl MonsterProgress {
    pub fn from_monster(monster: &PlayerMonster, template: &MonsterTemplate) -> Self {
        Self {
            monster_id: monster.id.clone(),
            monster_type_id: monster.monster_type_id.clone(),
            role: template.role,
            rarity: template.rarity,
            level: monster.level.max(1),
            exp: monster.exp,
            awakening_level: monster.awakening_level,
            unlocked_skills: monster.unlocked_skills.clone(),
        }
    }

    /// Writes level, exp and skills back onto the owned monster.
    pub fn apply_to(&self, monster: &mut PlayerMonster) {
        monster.level = self.level;
        monster.exp = self.exp;
        monster.unlocked_skills = self.unlocked_skills.clone();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelUpOutcome {
    pub new_level: u32,
    pub new_exp: u64,
    pub leveled_up: bool,
    pub levels_gained: u32,
    pub newly_unlocked_skill_ids: Vec<String>,
}

/// Adds `xp` to `progress`, cascading through as many levels as it pays for.
///
/// Skills unlocking at every crossed level are collected once each, skipping
/// any the monster already has.
pub fn apply_experience(
    progress: &mut MonsterProgress,
    xp: u64,
    skills: &dyn SkillCatalog,
) -> LevelUpOutcome {
    let old_level = progress.level;
    let result = process_level_up(
        progress.level,
        progress.exp,
        xp,
        progress.rarity,
        progress.awakening_level,
    );

    let mut newly_unlocked: Vec<String> = Vec::new();
    for level in (old_level + 1)..=result.new_level {
        for skill_id in skills.skills_unlocked_at(&progress.monster_type_id, progress.role, level) {
            if !progress.unlocked_skills.contains(&skill_id) && !newly_unlocked.contains(&skill_id) {
                newly_unlocked.push(skill_id);
            }
        }
    }

    progress.level = result.new_level;
    progress.exp = result.new_exp;
    progress.unlocked_skills.extend(newly_unlocked.iter().cloned());

    if result.levels_gained > 0 {
        tracing::debug!(
            monster_id = %progress.monster_id,
            from = old_level,
            to = result.new_level,
            skills = newly_unlocked.len(),
            "monster leveled up"
        );
    }

    LevelUpOutcome {
        new_level: result.new_level,
        new_exp: result.new_exp,
        leveled_up: result.levels_gained > 0,
        levels_gained: result.levels_gained,
        newly_unlocked_skill_ids: newly_unlocked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monster::required_exp;
    use std::collections::HashMap;

    /// Skill table keyed by level only.
    struct LevelSkills(HashMap<u32, Vec<&'static str>>);

    impl SkillCatalog for LevelSkills {
        fn skills_unlocked_at(&self, _type_id: &str, _role: Role, level: u32) -> Vec<String> {
            self.0
                .get(&level)
                .map(|ids| ids.iter().map(|s| s.to_string()).collect())
                .unwrap_or_default()
        }
    }

    fn progress(level: u32) -> MonsterProgress {
        MonsterProgress {
            monster_id: "pm_1".to_string(),
            monster_type_id: "monster_slime_basic".to_string(),
            role: Role::Tank,
            rarity: Rarity::N,
            level,
            exp: 0,
            awakening_level: 0,
            unlocked_skills: vec!["tank_guard".to_string()],
        }
    }

    #[test]
    fn test_three_level_cascade_collects_each_skill_once() {
        let skills = LevelSkills(HashMap::from([
            (5, vec!["skill_a"]),
            (6, vec!["skill_b", "skill_a"]),
            (7, vec!["skill_c", "tank_guard"]),
        ]));
        let mut p = progress(4);
        let xp = required_exp(4, Rarity::N) + required_exp(5, Rarity::N) + required_exp(6, Rarity::N);

        let outcome = apply_experience(&mut p, xp, &skills);

        assert!(outcome.leveled_up);
        assert_eq!(outcome.levels_gained, 3);
        assert_eq!(outcome.new_level, 7);
        assert_eq!(outcome.new_exp, 0);
        assert_eq!(outcome.newly_unlocked_skill_ids, vec!["skill_a", "skill_b", "skill_c"]);
        assert_eq!(p.unlocked_skills, vec!["tank_guard", "skill_a", "skill_b", "skill_c"]);
    }

    #[test]
    fn test_partial_exp_carries_over() {
        let skills = LevelSkills(HashMap::new());
        let mut p = progress(1);
        // 53 + 112 + 177 = 342 to reach level 4
        let outcome = apply_experience(&mut p, 350, &skills);
        assert_eq!(outcome.new_level, 4);
        assert_eq!(outcome.new_exp, 8);
        assert_eq!(p.level, 4);
        assert_eq!(p.exp, 8);
    }

    #[test]
    fn test_no_level_up() {
        let skills = LevelSkills(HashMap::from([(2, vec!["skill_a"])]));
        let mut p = progress(1);
        let outcome = apply_experience(&mut p, 10, &skills);
        assert!(!outcome.leveled_up);
        assert_eq!(outcome.levels_gained, 0);
        assert!(outcome.newly_unlocked_skill_ids.is_empty());
        assert_eq!(p.exp, 10);
    }

    #[test]
    fn test_cap_discards_overflow() {
        let skills = LevelSkills(HashMap::new());
        let mut p = progress(29);
        let outcome = apply_experience(&mut p, 1_000_000, &skills);
        assert_eq!(outcome.new_level, 30);
        assert_eq!(outcome.new_exp, 0);
        assert_eq!(outcome.levels_gained, 1);
    }

    #[test]
    fn test_progress_round_trips_onto_monster() {
        let mut monster = PlayerMonster::new("pm_1", "monster_slime_basic", 4);
        let mut p = progress(4);
        p.level = 7;
        p.exp = 12;
        p.unlocked_skills.push("skill_slime_sticky".to_string());
        p.apply_to(&mut monster);
        assert_eq!(monster.level, 7);
        assert_eq!(monster.exp, 12);
        assert_eq!(monster.unlocked_skills.len(), 2);
    }
}
