// Battle timing
pub const TURN_INTERVAL_MS: u64 = 1000;

// Status effects: per-tick magnitude as a fraction of max HP
pub const BURN_PERCENT_OF_MAX_HP: f64 = 0.05;
pub const POISON_PERCENT_OF_MAX_HP: f64 = 0.03;
pub const REGEN_PERCENT_OF_MAX_HP: f64 = 0.05;
pub const STAT_MODIFIER_DEFAULT_PERCENT: u32 = 20;

// Damage formula
pub const CRIT_CHANCE: f64 = 0.10;
pub const CRIT_MULTIPLIER: f64 = 1.5;
pub const ELEMENTAL_ADVANTAGE: f64 = 1.3;
pub const ELEMENTAL_DISADVANTAGE: f64 = 0.8; // smaller penalty than the advantage bonus
pub const DEFENSE_MITIGATION_FACTOR: f64 = 0.5;
pub const DAMAGE_VARIANCE: f64 = 0.1; // ±10%
pub const MINIMUM_DAMAGE: u32 = 1;
pub const BASIC_ATTACK_PERCENT: u32 = 100;

// Monster leveling: required exp = (LINEAR * L + QUADRATIC * L^2) * rarity multiplier
pub const EXP_CURVE_LINEAR: u64 = 50;
pub const EXP_CURVE_QUADRATIC: u64 = 3;
pub const BASE_STAT_GROWTH_PER_LEVEL: f64 = 0.08;
pub const AWAKENING_STAT_BONUS_PER_LEVEL: f64 = 0.05;
pub const AWAKENING_MAX_LEVEL_BONUS: u32 = 5;

// Synergy bonuses (percent) granted by each assigned support monster
pub const SYNERGY_ELEMENT_MATCH_ATK: u32 = 2;
pub const SYNERGY_ROLE_BONUS: u32 = 2;
pub const SYNERGY_SSR_BONUS: u32 = 5;
pub const SYNERGY_UR_BONUS: u32 = 10;

// Rewards
pub const GOLD_REWARD_KEY: &str = "gold";
pub const DROP_ROLL_SCALE: f64 = 100.0;

// Default auto-consumable slots
pub const DEFAULT_HP_SLOT_THRESHOLD: u32 = 30;
pub const DEFAULT_HEAL_POTION_ID: &str = "potion_hp_small";
