//! Battle balance simulator for Monte Carlo analysis.
//!
//! Run thousands of simulated battles to analyze:
//! - Win rates for a monster against a dungeon
//! - Battle length in turns
//! - Material, gold and equipment income
//! - Leveling pace over a grind
//!
//! The simulator drives the live battle engine (src/battle/engine.rs), so
//! results match real gameplay behavior.

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{RunStats, SimReport};
pub use runner::run_simulation;
