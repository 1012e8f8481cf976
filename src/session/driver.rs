//! The battle session: one active battle, advanced one turn at a time.

use super::ledger::InventoryLedger;
use super::persistence::OutboxSender;
use crate::battle::{advance_turn, start_battle, BattleState, ConsumableSlot, FloatingText, TurnContext};
use crate::content::{EnemyDefinition, GameData};
use crate::core::config::BattleConfig;
use crate::error::BattleError;
use crate::monster::PlayerMonster;
use crate::rewards::{MonsterProgress, PendingEffect};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

struct ActiveBattle {
    state: BattleState,
    enemy: EnemyDefinition,
    progress: MonsterProgress,
    started_at: DateTime<Utc>,
}

struct SessionState {
    battle: Option<ActiveBattle>,
    inventory: InventoryLedger,
    slots: Vec<ConsumableSlot>,
    rng: StdRng,
}

/// Async driver around the pure battle engine.
///
/// Turns are serialized through a single lock, so concurrent `advance`
/// calls never interleave. Effects from each turn are forwarded to the
/// persistence outbox after the new state is in place.
pub struct BattleSession<D> {
    data: Arc<D>,
    config: BattleConfig,
    inner: Arc<Mutex<SessionState>>,
    outbox: Option<OutboxSender>,
}

impl<D> Clone for BattleSession<D> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            config: self.config.clone(),
            inner: Arc::clone(&self.inner),
            outbox: self.outbox.clone(),
        }
    }
}

impl<D> BattleSession<D>
where
    D: GameData + Send + Sync + 'static,
{
    pub fn new(data: Arc<D>, config: BattleConfig, inventory: InventoryLedger) -> Self {
        Self::with_rng(data, config, inventory, StdRng::from_entropy())
    }

    /// Session with reproducible rolls.
    pub fn seeded(data: Arc<D>, config: BattleConfig, inventory: InventoryLedger, seed: u64) -> Self {
        Self::with_rng(data, config, inventory, StdRng::seed_from_u64(seed))
    }

    fn with_rng(data: Arc<D>, config: BattleConfig, inventory: InventoryLedger, rng: StdRng) -> Self {
        Self {
            data,
            config,
            inner: Arc::new(Mutex::new(SessionState {
                battle: None,
                inventory,
                slots: ConsumableSlot::default_slots(),
                rng,
            })),
            outbox: None,
        }
    }

    /// Forwards every pending effect to a persistence worker.
    pub fn with_outbox(mut self, outbox: OutboxSender) -> Self {
        self.outbox = Some(outbox);
        self
    }

    /// Starts a battle, replacing any battle already in progress.
    pub async fn start(
        &self,
        dungeon_id: &str,
        enemy_id: &str,
        monster: &PlayerMonster,
        supports: &[PlayerMonster],
    ) -> Result<BattleState, BattleError> {
        let state = start_battle(self.data.as_ref(), dungeon_id, enemy_id, monster, supports)?;
        let enemy = self
            .data
            .enemy(dungeon_id, enemy_id)
            .cloned()
            .ok_or_else(|| BattleError::UnknownEnemy {
                dungeon_id: dungeon_id.to_string(),
                enemy_id: enemy_id.to_string(),
            })?;
        let template = self
            .data
            .monster(&monster.monster_type_id)
            .ok_or_else(|| BattleError::UnknownMonster(monster.monster_type_id.clone()))?;
        let progress = MonsterProgress::from_monster(monster, template);

        let mut inner = self.inner.lock().await;
        inner.battle = Some(ActiveBattle {
            state: state.clone(),
            enemy,
            progress,
            started_at: Utc::now(),
        });
        Ok(state)
    }

    /// Advances the active battle by one turn and returns the new snapshot.
    pub async fn advance(&self) -> Result<BattleState, BattleError> {
        let (state, effects) = {
            let mut inner = self.inner.lock().await;
            run_turn(&mut inner, self.data.as_ref(), &self.config)?
        };
        self.forward(effects);
        Ok(state)
    }

    /// Auto-battle: one turn per `turn_interval_ms` until the battle ends.
    pub async fn run_auto(&self) -> Result<BattleState, BattleError> {
        let period = Duration::from_millis(self.config.turn_interval_ms.max(1));
        let mut ticker = tokio::time::interval(period);
        // The first tick fires immediately; battles begin after one full period
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let state = self.advance().await?;
            if !state.is_active() {
                return Ok(state);
            }
        }
    }

    pub async fn snapshot(&self) -> Option<BattleState> {
        let inner = self.inner.lock().await;
        inner.battle.as_ref().map(|b| b.state.clone())
    }

    pub async fn started_at(&self) -> Option<DateTime<Utc>> {
        let inner = self.inner.lock().await;
        inner.battle.as_ref().map(|b| b.started_at)
    }

    pub async fn set_slots(&self, slots: Vec<ConsumableSlot>) {
        self.inner.lock().await.slots = slots;
    }

    /// Drains the UI event queue of the active battle.
    pub async fn consume_floating_texts(&self) -> Vec<FloatingText> {
        let mut inner = self.inner.lock().await;
        match inner.battle.as_mut() {
            Some(battle) => battle.state.consume_floating_texts(),
            None => Vec::new(),
        }
    }

    /// Ends the battle and discards its state.
    pub async fn leave(&self) -> Option<BattleState> {
        let mut inner = self.inner.lock().await;
        let battle = inner.battle.take()?;
        tracing::info!(
            dungeon_id = %battle.state.dungeon_id,
            turns = battle.state.turn.saturating_sub(1),
            result = ?battle.state.result,
            "left battle"
        );
        Some(battle.state)
    }

    pub async fn inventory(&self) -> InventoryLedger {
        self.inner.lock().await.inventory.clone()
    }

    fn forward(&self, effects: Vec<PendingEffect>) {
        let Some(outbox) = &self.outbox else {
            return;
        };
        for effect in effects {
            if let Err(err) = outbox.send(effect) {
                tracing::warn!(effect = %err.0.label(), "persistence worker gone, dropping effect");
            }
        }
    }
}

/// One engine turn against the locked session.
fn run_turn<D: GameData>(
    inner: &mut SessionState,
    data: &D,
    config: &BattleConfig,
) -> Result<(BattleState, Vec<PendingEffect>), BattleError> {
    let SessionState {
        battle,
        inventory,
        slots,
        rng,
    } = inner;
    let battle = battle.as_mut().ok_or(BattleError::NoActiveBattle)?;

    let outcome = {
        let mut ctx = TurnContext::new(config, data, &battle.enemy, inventory)
            .with_slots(slots)
            .with_progress(&battle.progress);
        advance_turn(&battle.state, &mut ctx, rng)
    };

    // Local-first: grants land in the ledger before the worker persists them
    if outcome.state.reward_manifest.is_some() && battle.state.reward_manifest.is_none() {
        for effect in &outcome.effects {
            match effect {
                PendingEffect::GrantMaterial { material_id, quantity } => {
                    inventory.add(material_id.clone(), *quantity)
                }
                PendingEffect::PersistMonsterProgress { progress } => {
                    battle.progress = progress.clone();
                }
                _ => {}
            }
        }
    }

    battle.state = outcome.state.clone();
    Ok((outcome.state, outcome.effects))
}
