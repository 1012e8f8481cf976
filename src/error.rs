//! Error types for battle setup, inventory, persistence and content loading.

use thiserror::Error;

/// Refusals from battle setup and the session driver.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BattleError {
    #[error("Unknown monster type: {0}")]
    UnknownMonster(String),

    #[error("Unknown dungeon: {0}")]
    UnknownDungeon(String),

    #[error("Unknown enemy {enemy_id} in dungeon {dungeon_id}")]
    UnknownEnemy { dungeon_id: String, enemy_id: String },

    #[error("No active battle")]
    NoActiveBattle,
}

/// An automatic consumable could not be taken from the inventory.
/// Never fatal to a turn; the slot is skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("Not enough {item_id}: have {available}, need {requested}")]
    Insufficient {
        item_id: String,
        available: u32,
        requested: u32,
    },

    #[error("Inventory unavailable: {0}")]
    Unavailable(String),
}

/// Durable reward sync failed. Logged, never retried by the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PersistError {
    #[error("Reward store rejected {effect}: {reason}")]
    Rejected { effect: String, reason: String },

    #[error("Reward store unreachable: {0}")]
    Unreachable(String),
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
