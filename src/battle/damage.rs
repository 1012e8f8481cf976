//! Attack damage math.
//!
//! Pure functions over two combatants and an injected RNG, so callers can
//! replay exact outcomes with a seeded generator.

use super::types::BattleEntity;
use crate::core::config::BattleConfig;
use crate::core::constants::{BASIC_ATTACK_PERCENT, MINIMUM_DAMAGE};
use crate::monster::Element;
use rand::Rng;

/// Result of one attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackResult {
    /// Damage dealt after crit and variance
    pub damage: u32,
    pub is_critical: bool,
    pub element_multiplier: f64,
}

/// Element-vs-element damage multiplier.
pub fn element_multiplier(attacker: Element, defender: Element, config: &BattleConfig) -> f64 {
    if attacker.strong_against() == Some(defender) {
        config.elemental_advantage
    } else if defender.strong_against() == Some(attacker) {
        config.elemental_disadvantage
    } else {
        1.0
    }
}

/// Roll for critical hit. `chance` is a probability in 0.0..=1.0.
pub fn roll_crit(chance: f64, rng: &mut impl Rng) -> bool {
    rng.gen::<f64>() < chance
}

/// Uniform damage multiplier in `[1 - variance, 1 + variance)`.
pub fn roll_variance(variance: f64, rng: &mut impl Rng) -> f64 {
    if variance <= 0.0 {
        return 1.0;
    }
    1.0 - variance + rng.gen::<f64>() * variance * 2.0
}

/// Basic attack from `attacker` against `defender`.
pub fn calculate_damage(
    attacker: &BattleEntity,
    defender: &BattleEntity,
    config: &BattleConfig,
    rng: &mut impl Rng,
) -> AttackResult {
    calculate_skill_damage(attacker, defender, BASIC_ATTACK_PERCENT, config, rng)
}

/// Attack scaled by a skill percentage (100 = basic attack).
///
/// `atk × skill% × element − def × defense_factor`, floored at 1, then crit and
/// variance. An attacker with positive base ATK always deals at least
/// `minimum_damage` (never less than 1), even when debuffed to zero; an
/// attacker with zero base ATK deals nothing.
pub fn calculate_skill_damage(
    attacker: &BattleEntity,
    defender: &BattleEntity,
    skill_percent: u32,
    config: &BattleConfig,
    rng: &mut impl Rng,
) -> AttackResult {
    let element = element_multiplier(attacker.element, defender.element, config);
    if attacker.atk == 0 {
        return AttackResult {
            damage: 0,
            is_critical: false,
            element_multiplier: element,
        };
    }

    let atk = attacker.effective_atk(config);
    let mut damage = atk as f64 * (skill_percent as f64 / 100.0) * element;

    let mitigation = defender.effective_def(config) as f64 * config.defense_factor;
    damage = (damage - mitigation).max(1.0);

    let is_critical = roll_crit(config.crit_chance, rng);
    if is_critical {
        damage *= config.crit_multiplier;
    }

    damage *= roll_variance(config.damage_variance, rng);

    let floored = if damage.is_finite() && damage > 0.0 {
        damage.floor() as u32
    } else {
        0
    };

    AttackResult {
        damage: floored.max(config.minimum_damage.max(MINIMUM_DAMAGE)),
        is_critical,
        element_multiplier: element,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::types::{StatusEffect, StatusKind};
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fighter(atk: u32, def: u32, element: Element) -> BattleEntity {
        BattleEntity {
            id: "fighter".to_string(),
            name: "Fighter".to_string(),
            hp: 100,
            max_hp: 100,
            atk,
            def,
            element,
            status_effects: Vec::new(),
            is_player: false,
        }
    }

    #[test]
    fn test_element_matrix() {
        let config = BattleConfig::default();
        assert_eq!(element_multiplier(Element::Fire, Element::Earth, &config), 1.3);
        assert_eq!(element_multiplier(Element::Earth, Element::Fire, &config), 0.8);
        assert_eq!(element_multiplier(Element::Wind, Element::Water, &config), 1.3);
        assert_eq!(element_multiplier(Element::Water, Element::Wind, &config), 0.8);
        assert_eq!(element_multiplier(Element::Water, Element::Fire, &config), 1.3);
        assert_eq!(element_multiplier(Element::Fire, Element::Water, &config), 0.8);
        // Light and Dark both deal bonus damage to each other
        assert_eq!(element_multiplier(Element::Light, Element::Dark, &config), 1.3);
        assert_eq!(element_multiplier(Element::Dark, Element::Light, &config), 1.3);
        assert_eq!(element_multiplier(Element::Chaos, Element::Fire, &config), 1.0);
        assert_eq!(element_multiplier(Element::Fire, Element::Fire, &config), 1.0);
        assert_eq!(element_multiplier(Element::Fire, Element::Wind, &config), 1.0);
    }

    #[test]
    fn test_deterministic_damage() {
        let config = BattleConfig::deterministic();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        // 20 - 1 * 0.5 = 19.5 -> 19
        let hit = calculate_damage(
            &fighter(20, 30, Element::Water),
            &fighter(5, 1, Element::Earth),
            &config,
            &mut rng,
        );
        assert_eq!(hit.damage, 19);
        assert!(!hit.is_critical);
    }

    #[test]
    fn test_elemental_advantage_applies_before_defense() {
        let config = BattleConfig::deterministic();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        // 100 * 1.3 - 20 * 0.5 = 120
        let hit = calculate_damage(
            &fighter(100, 0, Element::Fire),
            &fighter(0, 20, Element::Earth),
            &config,
            &mut rng,
        );
        assert_eq!(hit.damage, 120);
        assert_eq!(hit.element_multiplier, 1.3);
    }

    #[test]
    fn test_minimum_damage_against_heavy_defense() {
        let config = BattleConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..200 {
            let hit = calculate_damage(
                &fighter(5, 0, Element::Water),
                &fighter(0, 1000, Element::Water),
                &config,
                &mut rng,
            );
            assert!(hit.damage >= 1);
        }
    }

    #[test]
    fn test_zero_attack_deals_no_damage() {
        let config = BattleConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let hit = calculate_damage(
            &fighter(0, 0, Element::Fire),
            &fighter(0, 0, Element::Fire),
            &config,
            &mut rng,
        );
        assert_eq!(hit.damage, 0);
        assert!(!hit.is_critical);
    }

    #[test]
    fn test_forced_crit_with_low_roll() {
        // StepRng(0, 0) always rolls 0.0: crit succeeds and variance is 0.9
        let config = BattleConfig::default();
        let mut rng = StepRng::new(0, 0);
        let hit = calculate_damage(
            &fighter(100, 0, Element::Chaos),
            &fighter(0, 0, Element::Chaos),
            &config,
            &mut rng,
        );
        assert!(hit.is_critical);
        // 100 * 1.5 * 0.9 = 135
        assert_eq!(hit.damage, 135);
    }

    #[test]
    fn test_roll_crit_always_and_never() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            assert!(roll_crit(1.0, &mut rng));
            assert!(!roll_crit(0.0, &mut rng));
        }
    }

    #[test]
    fn test_variance_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..1000 {
            let v = roll_variance(0.1, &mut rng);
            assert!((0.9..1.1).contains(&v));
        }
        assert_eq!(roll_variance(0.0, &mut rng), 1.0);
    }

    #[test]
    fn test_damage_never_negative_with_positive_attack() {
        let config = BattleConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for atk in 1..40 {
            for def in [0, 10, 50, 500] {
                for element in Element::ALL {
                    let hit = calculate_damage(
                        &fighter(atk, 0, element),
                        &fighter(0, def, Element::Earth),
                        &config,
                        &mut rng,
                    );
                    assert!(hit.damage >= 1);
                }
            }
        }
    }

    #[test]
    fn test_fully_debuffed_attacker_still_deals_minimum() {
        let config = BattleConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let mut weakened = fighter(50, 0, Element::Fire);
        weakened.apply_status(StatusEffect::new(StatusKind::AtkDebuff, 3, "enemy").with_value(100));
        assert_eq!(weakened.effective_atk(&config), 0);

        for _ in 0..100 {
            let hit = calculate_damage(&weakened, &fighter(0, 0, Element::Fire), &config, &mut rng);
            assert!(hit.damage >= 1);
        }
    }

    #[test]
    fn test_zero_minimum_damage_config_keeps_floor_of_one() {
        let config = BattleConfig::from_json_str(r#"{ "minimum_damage": 0 }"#).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for _ in 0..200 {
            let hit = calculate_damage(
                &fighter(1, 0, Element::Water),
                &fighter(0, 1000, Element::Water),
                &config,
                &mut rng,
            );
            assert!(hit.damage >= 1);
        }
    }

    #[test]
    fn test_skill_percent_scales_damage() {
        let config = BattleConfig::deterministic();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let hit = calculate_skill_damage(
            &fighter(40, 0, Element::Chaos),
            &fighter(0, 0, Element::Fire),
            150,
            &config,
            &mut rng,
        );
        assert_eq!(hit.damage, 60);
    }
}
