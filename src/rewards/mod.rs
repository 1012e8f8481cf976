//! Reward resolution: loot rolls, experience and the persistence outbox.

pub mod drops;
pub mod experience;
pub mod manifest;

pub use drops::{resolve_rewards, roll_drop, roll_gold, LootRoll};
pub use experience::{apply_experience, LevelUpOutcome, MonsterProgress};
pub use manifest::{PendingEffect, RewardManifest};
