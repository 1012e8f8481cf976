//! The battle state machine: advances a `BattleState` by exactly one turn.
//!
//! Turn order is fixed: consumables, status ticks (player then enemy), the
//! attack phase, the terminal check, and reward resolution on victory. The
//! engine never performs side effects itself; anything that must be persisted
//! comes back as `PendingEffect`s alongside the new state.

use super::consumables::{run_consumable_automation, ConsumableSlot, Inventory};
use super::damage::calculate_damage;
use super::status::process_status_effects;
use super::types::{BattleEntity, BattleResult, BattleState, FloatingKind, FloatingText, Side, StatusKind};
use crate::content::{ConsumableCatalog, EnemyDefinition, SkillCatalog};
use crate::core::config::BattleConfig;
use crate::core::constants::GOLD_REWARD_KEY;
use crate::rewards::{apply_experience, resolve_rewards, MonsterProgress, PendingEffect, RewardManifest};
use rand::Rng;

/// Collaborators one turn reads from. Nothing here is global.
pub struct TurnContext<'a> {
    pub config: &'a BattleConfig,
    pub slots: &'a [ConsumableSlot],
    pub consumables: &'a dyn ConsumableCatalog,
    pub inventory: &'a mut dyn Inventory,
    /// Definition of the enemy being fought, for its loot table
    pub enemy: &'a EnemyDefinition,
    /// Monster that receives experience on victory
    pub progress: Option<&'a MonsterProgress>,
    pub skills: &'a dyn SkillCatalog,
}

impl<'a> TurnContext<'a> {
    pub fn new<D>(
        config: &'a BattleConfig,
        data: &'a D,
        enemy: &'a EnemyDefinition,
        inventory: &'a mut dyn Inventory,
    ) -> Self
    where
        D: ConsumableCatalog + SkillCatalog,
    {
        Self {
            config,
            slots: &[],
            consumables: data,
            inventory,
            enemy,
            progress: None,
            skills: data,
        }
    }

    pub fn with_slots(mut self, slots: &'a [ConsumableSlot]) -> Self {
        self.slots = slots;
        self
    }

    pub fn with_progress(mut self, progress: &'a MonsterProgress) -> Self {
        self.progress = Some(progress);
        self
    }
}

/// New state plus the outbox of effects produced during the turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub state: BattleState,
    pub effects: Vec<PendingEffect>,
}

/// Collects the logs and floating texts of one turn.
struct TurnLog {
    turn: u32,
    lines: Vec<String>,
    texts: Vec<FloatingText>,
}

impl TurnLog {
    fn new(turn: u32) -> Self {
        Self {
            turn,
            lines: Vec::new(),
            texts: Vec::new(),
        }
    }

    fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn float(&mut self, text: impl Into<String>, kind: FloatingKind, target: Side) {
        let id = format!("t{}-{}", self.turn, self.texts.len());
        self.texts.push(FloatingText {
            id,
            text: text.into(),
            kind,
            target,
        });
    }
}

/// Advances `state` by one turn.
///
/// A terminal state comes back unchanged with an empty outbox.
pub fn advance_turn(state: &BattleState, ctx: &mut TurnContext<'_>, rng: &mut impl Rng) -> TurnOutcome {
    if !state.is_active() {
        return TurnOutcome {
            state: state.clone(),
            effects: Vec::new(),
        };
    }

    let mut log = TurnLog::new(state.turn);
    let mut effects = Vec::new();
    let mut player = state.player_entity();
    let mut enemy = state.enemy_entity();

    // 1. Automatic consumables
    let automation = run_consumable_automation(&mut player, ctx.slots, ctx.consumables, ctx.inventory);
    for used in &automation.used {
        effects.push(PendingEffect::ConsumeItem {
            item_id: used.consumable_id.clone(),
            quantity: 1,
        });
        if used.healed > 0 {
            log.float(format!("+{}", used.healed), FloatingKind::Heal, Side::Player);
        }
    }
    for line in automation.logs {
        log.line(line);
    }

    // Stun is read before ticking, so a one-turn stun still costs the action
    let player_stunned = player.has_status(StatusKind::Stun);
    let enemy_stunned = enemy.has_status(StatusKind::Stun);

    // 2. Status effects, player first
    player = tick_status(player, "[Player]", Side::Player, ctx.config, &mut log);
    enemy = tick_status(enemy, "[Enemy]", Side::Enemy, ctx.config, &mut log);

    // 3-4. Attack phase, skipped if anyone fell to status damage
    if player.is_alive() && enemy.is_alive() {
        if player_stunned {
            log.line(format!("{} is stunned and cannot act!", player.name));
        } else {
            attack(&player, &mut enemy, Side::Enemy, ctx.config, rng, &mut log);
        }

        if enemy.is_alive() {
            if enemy_stunned {
                log.line(format!("{} is stunned and cannot act!", enemy.name));
            } else {
                attack(&enemy, &mut player, Side::Player, ctx.config, rng, &mut log);
            }
        }
    }

    // 5. Terminal check
    let result = if !enemy.is_alive() {
        Some(BattleResult::Victory)
    } else if !player.is_alive() {
        Some(BattleResult::Defeat)
    } else {
        None
    };

    let mut next = state.clone();
    next.store_entities(player, enemy);
    next.result = result;

    // 6. Rewards
    match result {
        Some(BattleResult::Victory) => {
            let manifest = grant_victory(&mut next, ctx, rng, &mut log);
            effects.extend(manifest.pending_effects());
            next.reward_manifest = Some(manifest);
            tracing::info!(
                dungeon_id = %next.dungeon_id,
                enemy_id = %next.enemy_id,
                turn = next.turn,
                "battle won"
            );
        }
        Some(BattleResult::Defeat) => {
            log.line(format!("Defeat... {} can no longer fight.", next.player_name));
            tracing::info!(
                dungeon_id = %next.dungeon_id,
                enemy_id = %next.enemy_id,
                turn = next.turn,
                "battle lost"
            );
        }
        None => {}
    }

    tracing::debug!(
        turn = next.turn,
        player_hp = next.player_hp,
        enemy_hp = next.enemy_hp,
        effects = effects.len(),
        "turn resolved"
    );

    // 7. Publish
    next.turn += 1;
    next.logs.extend(log.lines);
    next.floating_texts.extend(log.texts);

    TurnOutcome { state: next, effects }
}

fn tick_status(
    entity: BattleEntity,
    prefix: &str,
    side: Side,
    config: &BattleConfig,
    log: &mut TurnLog,
) -> BattleEntity {
    if entity.status_effects.is_empty() {
        return entity;
    }
    let tick = process_status_effects(&entity, config);
    for line in &tick.logs {
        log.line(format!("{prefix} {line}"));
    }
    if tick.damage_taken > 0 {
        log.float(format!("-{}", tick.damage_taken), FloatingKind::Damage, side);
    }
    if tick.healing_received > 0 {
        log.float(format!("+{}", tick.healing_received), FloatingKind::Heal, side);
    }
    tick.entity
}

fn attack(
    attacker: &BattleEntity,
    defender: &mut BattleEntity,
    defender_side: Side,
    config: &BattleConfig,
    rng: &mut impl Rng,
    log: &mut TurnLog,
) {
    let hit = calculate_damage(attacker, defender, config, rng);
    defender.take_damage(hit.damage);

    if hit.is_critical {
        log.line(format!(
            "Critical hit! {} deals {} damage to {}!",
            attacker.name, hit.damage, defender.name
        ));
        log.float(format!("{}!", hit.damage), FloatingKind::Crit, defender_side);
    } else {
        log.line(format!(
            "{} deals {} damage to {}.",
            attacker.name, hit.damage, defender.name
        ));
        log.float(format!("-{}", hit.damage), FloatingKind::Damage, defender_side);
    }

    if hit.element_multiplier > 1.0 {
        log.line("It's super effective!");
    } else if hit.element_multiplier < 1.0 {
        log.line("It's not very effective...");
    }
}

fn grant_victory(
    next: &mut BattleState,
    ctx: &TurnContext<'_>,
    rng: &mut impl Rng,
    log: &mut TurnLog,
) -> RewardManifest {
    log.line(format!("Victory! {} was defeated.", next.enemy_name));

    let loot = resolve_rewards(ctx.enemy, rng);

    for (material_id, quantity) in &loot.materials {
        *next.rewards.entry(material_id.clone()).or_insert(0) += quantity;
        log.line(format!("Obtained {material_id} x{quantity}."));
    }
    if loot.gold > 0 {
        *next.rewards.entry(GOLD_REWARD_KEY.to_string()).or_insert(0) += loot.gold;
        log.line(format!("Obtained {} gold.", loot.gold));
    }
    for equipment_id in &loot.equipment {
        next.equipment_rewards.push(equipment_id.clone());
        log.line(format!("Obtained equipment: {equipment_id}!"));
    }

    if loot.xp_gain > 0 {
        log.line(format!("{} gained {} EXP.", next.player_name, loot.xp_gain));
        log.float(format!("+{} XP", loot.xp_gain), FloatingKind::Xp, Side::Player);
    }

    let (level_up, progress) = match ctx.progress {
        Some(progress) => {
            let mut progress = progress.clone();
            let outcome = apply_experience(&mut progress, loot.xp_gain, ctx.skills);
            if outcome.leveled_up {
                log.line(format!("{} reached level {}!", next.player_name, outcome.new_level));
                log.float(
                    format!("LEVEL UP! Lv.{}", outcome.new_level),
                    FloatingKind::LevelUp,
                    Side::Player,
                );
            }
            for skill_id in &outcome.newly_unlocked_skill_ids {
                log.line(format!("New skill unlocked: {skill_id}"));
            }
            (Some(outcome), Some(progress))
        }
        None => (None, None),
    };

    RewardManifest::new(loot, level_up, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::types::{StatusEffect, SynergyBonuses};
    use crate::content::{EnemyDrop, GameContent, GoldRange};
    use crate::monster::{Element, Rarity, Role};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::{BTreeMap, HashMap};

    fn state(player_hp: u32, enemy_hp: u32) -> BattleState {
        BattleState {
            is_battling: true,
            turn: 1,
            result: None,
            dungeon_id: "dungeon_slime_forest".to_string(),
            player_monster_id: "pm_1".to_string(),
            player_monster_type: "monster_slime_basic".to_string(),
            player_name: "Basic Slime".to_string(),
            player_hp,
            player_max_hp: 150,
            player_atk: 20,
            player_def: 30,
            player_element: Element::Water,
            player_status_effects: Vec::new(),
            enemy_id: "slime_green".to_string(),
            enemy_name: "Green Slime".to_string(),
            enemy_hp,
            enemy_max_hp: 30,
            enemy_atk: 5,
            enemy_def: 1,
            enemy_element: Element::Water,
            enemy_status_effects: Vec::new(),
            logs: Vec::new(),
            floating_texts: Vec::new(),
            rewards: BTreeMap::new(),
            equipment_rewards: Vec::new(),
            reward_manifest: None,
            synergy_bonuses: SynergyBonuses::default(),
        }
    }

    fn green_slime() -> EnemyDefinition {
        let mut enemy = EnemyDefinition::new("slime_green", "Green Slime", 30, 5, 1);
        enemy.element = Element::Water;
        enemy.exp = 10;
        enemy.drops = vec![EnemyDrop::material("slime_fluid", 100.0, 1, 1)];
        enemy.gold_drop = Some(GoldRange { min: 2, max: 2 });
        enemy
    }

    fn progress() -> MonsterProgress {
        MonsterProgress {
            monster_id: "pm_1".to_string(),
            monster_type_id: "monster_slime_basic".to_string(),
            role: Role::Tank,
            rarity: Rarity::N,
            level: 1,
            exp: 0,
            awakening_level: 0,
            unlocked_skills: Vec::new(),
        }
    }

    #[test]
    fn test_one_turn_both_attack() {
        let content = GameContent::sample().unwrap();
        let config = BattleConfig::deterministic();
        let enemy = green_slime();
        let mut inventory: HashMap<String, u32> = HashMap::new();
        let mut ctx = TurnContext::new(&config, &content, &enemy, &mut inventory);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let outcome = advance_turn(&state(150, 30), &mut ctx, &mut rng);

        // Player: 20 - 0.5 = 19. Enemy: 5 - 15 -> 1
        assert_eq!(outcome.state.enemy_hp, 11);
        assert_eq!(outcome.state.player_hp, 149);
        assert_eq!(outcome.state.turn, 2);
        assert!(outcome.state.result.is_none());
        assert!(outcome.effects.is_empty());
        assert_eq!(outcome.state.floating_texts.len(), 2);
        assert_eq!(outcome.state.floating_texts[0].id, "t1-0");
    }

    #[test]
    fn test_victory_grants_rewards_and_outbox() {
        let content = GameContent::sample().unwrap();
        let config = BattleConfig::deterministic();
        let enemy = green_slime();
        let progress = progress();
        let mut inventory: HashMap<String, u32> = HashMap::new();
        let mut ctx =
            TurnContext::new(&config, &content, &enemy, &mut inventory).with_progress(&progress);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let outcome = advance_turn(&state(150, 10), &mut ctx, &mut rng);

        assert_eq!(outcome.state.result, Some(BattleResult::Victory));
        assert_eq!(outcome.state.enemy_hp, 0);
        // The enemy never got to swing back
        assert_eq!(outcome.state.player_hp, 150);
        assert_eq!(outcome.state.rewards["slime_fluid"], 1);
        assert_eq!(outcome.state.gold_reward(), 2);

        let manifest = outcome.state.reward_manifest.as_ref().unwrap();
        assert_eq!(manifest.xp_gain, 10);
        assert_eq!(manifest.progress.as_ref().unwrap().exp, 10);
        assert!(outcome
            .effects
            .iter()
            .any(|e| matches!(e, PendingEffect::PersistMonsterProgress { .. })));
        assert!(outcome
            .effects
            .contains(&PendingEffect::GrantGold { amount: 2 }));
    }

    #[test]
    fn test_zero_quantity_drop_leaves_rewards_clean() {
        let content = GameContent::sample().unwrap();
        let config = BattleConfig::deterministic();
        let mut enemy = green_slime();
        enemy.drops = vec![EnemyDrop::material("dust", 100.0, 0, 0)];
        enemy.gold_drop = None;
        let mut inventory: HashMap<String, u32> = HashMap::new();
        let mut ctx = TurnContext::new(&config, &content, &enemy, &mut inventory);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let outcome = advance_turn(&state(150, 10), &mut ctx, &mut rng);

        assert_eq!(outcome.state.result, Some(BattleResult::Victory));
        assert!(outcome.state.rewards.is_empty());
        assert!(!outcome.state.logs.iter().any(|l| l.contains("x0")));
        assert!(outcome.effects.is_empty());
    }

    #[test]
    fn test_terminal_state_is_noop() {
        let content = GameContent::sample().unwrap();
        let config = BattleConfig::default();
        let enemy = green_slime();
        let mut inventory: HashMap<String, u32> = HashMap::new();
        let mut ctx = TurnContext::new(&config, &content, &enemy, &mut inventory);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let mut done = state(150, 0);
        done.result = Some(BattleResult::Victory);
        let outcome = advance_turn(&done, &mut ctx, &mut rng);

        assert_eq!(outcome.state, done);
        assert!(outcome.effects.is_empty());
    }

    #[test]
    fn test_status_death_skips_attack_phase() {
        let content = GameContent::sample().unwrap();
        let config = BattleConfig::deterministic();
        let enemy = green_slime();
        let mut inventory: HashMap<String, u32> = HashMap::new();
        let mut ctx = TurnContext::new(&config, &content, &enemy, &mut inventory);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let mut s = state(2, 30);
        s.player_status_effects = vec![StatusEffect::new(StatusKind::Burn, 3, "slime_green")];
        let outcome = advance_turn(&s, &mut ctx, &mut rng);

        assert_eq!(outcome.state.result, Some(BattleResult::Defeat));
        assert_eq!(outcome.state.player_hp, 0);
        assert_eq!(outcome.state.enemy_hp, 30);
        assert!(outcome.state.logs.iter().any(|l| l.starts_with("[Player]")));
        assert!(outcome.effects.is_empty());
    }

    #[test]
    fn test_stunned_player_loses_attack() {
        let content = GameContent::sample().unwrap();
        let config = BattleConfig::deterministic();
        let enemy = green_slime();
        let mut inventory: HashMap<String, u32> = HashMap::new();
        let mut ctx = TurnContext::new(&config, &content, &enemy, &mut inventory);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let mut s = state(150, 30);
        s.player_status_effects = vec![StatusEffect::new(StatusKind::Stun, 1, "slime_green")];
        let outcome = advance_turn(&s, &mut ctx, &mut rng);

        assert_eq!(outcome.state.enemy_hp, 30);
        assert_eq!(outcome.state.player_hp, 149);
        assert!(outcome.state.player_status_effects.is_empty());
        assert!(outcome.state.logs.iter().any(|l| l.contains("stunned")));
    }

    #[test]
    fn test_consumable_use_mirrored_to_outbox() {
        let content = GameContent::sample().unwrap();
        let config = BattleConfig::deterministic();
        let enemy = green_slime();
        let slots = vec![ConsumableSlot::hp_below("potion_hp_small", 30)];
        let mut inventory: HashMap<String, u32> = HashMap::from([("potion_hp_small".to_string(), 1)]);
        let mut ctx = TurnContext::new(&config, &content, &enemy, &mut inventory).with_slots(&slots);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let outcome = advance_turn(&state(30, 30), &mut ctx, &mut rng);

        // 30 + 45 healed - 1 from the slime
        assert_eq!(outcome.state.player_hp, 74);
        assert_eq!(
            outcome.effects,
            vec![PendingEffect::ConsumeItem {
                item_id: "potion_hp_small".to_string(),
                quantity: 1,
            }]
        );
        assert_eq!(inventory["potion_hp_small"], 0);
    }
}
