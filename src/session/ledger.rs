//! Local-first inventory the session consumes from and grants into.

use crate::battle::Inventory;
use crate::error::InventoryError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLedger {
    items: HashMap<String, u32>,
}

impl InventoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut ledger = Self::new();
        for (id, quantity) in items {
            ledger.add(id, quantity);
        }
        ledger
    }

    pub fn add(&mut self, item_id: impl Into<String>, quantity: u32) {
        let entry = self.items.entry(item_id.into()).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    pub fn quantity(&self, item_id: &str) -> u32 {
        self.items.get(item_id).copied().unwrap_or(0)
    }

    pub fn items(&self) -> &HashMap<String, u32> {
        &self.items
    }
}

impl Inventory for InventoryLedger {
    fn consume(&mut self, item_id: &str, quantity: u32) -> Result<(), InventoryError> {
        self.items.consume(item_id, quantity)
    }
}
