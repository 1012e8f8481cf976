//! Turn-based battle engine.

pub mod consumables;
pub mod damage;
pub mod engine;
pub mod setup;
pub mod status;
pub mod types;

pub use consumables::{run_consumable_automation, ConsumableSlot, Inventory, SlotTrigger};
pub use damage::{calculate_damage, calculate_skill_damage, element_multiplier, AttackResult};
pub use engine::{advance_turn, TurnContext, TurnOutcome};
pub use setup::{compute_synergy_bonuses, start_battle};
pub use status::{process_status_effects, StatusTickResult};
pub use types::*;
