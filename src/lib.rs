//! Monster Keeper - turn-based battle engine for a monster-collecting idle RPG
//!
//! This crate exposes the battle simulation for the game client, the balance
//! simulator and tests.

pub mod battle;
pub mod content;
pub mod core;
pub mod error;
pub mod monster;
pub mod rewards;
#[cfg(feature = "session")]
pub mod session;
pub mod simulator;
