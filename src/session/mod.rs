//! Async session driver: auto-battle timer, local inventory and the
//! persistence worker that drains reward effects.

pub mod driver;
pub mod ledger;
pub mod persistence;

pub use driver::BattleSession;
pub use ledger::InventoryLedger;
pub use persistence::{spawn_persistence_worker, MemoryRewardStore, OutboxSender, PersistenceStats, RewardStore};
