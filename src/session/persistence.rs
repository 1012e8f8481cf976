//! Background worker that drains the reward outbox into durable storage.
//!
//! Failures are logged and dropped. The battle outcome already stands
//! locally, so nothing here retries or rolls back.

use crate::error::PersistError;
use crate::rewards::PendingEffect;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Durable sink for pending effects (a database, a remote API, ...).
#[async_trait]
pub trait RewardStore: Send + Sync {
    async fn persist(&self, effect: &PendingEffect) -> Result<(), PersistError>;
}

/// Keeps every persisted effect in memory.
#[derive(Debug, Default)]
pub struct MemoryRewardStore {
    effects: Mutex<Vec<PendingEffect>>,
}

impl MemoryRewardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects(&self) -> Vec<PendingEffect> {
        match self.effects.lock() {
            Ok(effects) => effects.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl RewardStore for MemoryRewardStore {
    async fn persist(&self, effect: &PendingEffect) -> Result<(), PersistError> {
        let mut effects = self
            .effects
            .lock()
            .map_err(|e| PersistError::Unreachable(e.to_string()))?;
        effects.push(effect.clone());
        Ok(())
    }
}

/// Counts reported by a finished worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistenceStats {
    pub persisted: usize,
    pub failed: usize,
}

pub type OutboxSender = mpsc::UnboundedSender<PendingEffect>;

/// Spawns the outbox drain. The worker exits once every sender is dropped.
pub fn spawn_persistence_worker(store: Arc<dyn RewardStore>) -> (OutboxSender, JoinHandle<PersistenceStats>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<PendingEffect>();

    let handle = tokio::spawn(async move {
        let mut stats = PersistenceStats::default();
        while let Some(effect) = rx.recv().await {
            match store.persist(&effect).await {
                Ok(()) => stats.persisted += 1,
                Err(err) => {
                    stats.failed += 1;
                    tracing::warn!(effect = %effect.label(), %err, "failed to persist reward");
                }
            }
        }
        tracing::debug!(persisted = stats.persisted, failed = stats.failed, "persistence worker stopped");
        stats
    });

    (tx, handle)
}
