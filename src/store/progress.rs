//! Saved Progress
//!
//! A key-value store scoped to exactly one (domain, seed) pair. Entries for
//! earlier seeds are superseded by simply never being read again.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::StoreError;
use crate::category::Domain;
use crate::game::state::GameState;

/// Storage key for one day's progress in one domain.
pub fn progress_key(domain: Domain, seed: u64) -> String {
    format!("tcgdoku-{}-{}", domain.as_str(), seed)
}

/// Load/save boundary for player progress.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Saved state for this day, if any.
    async fn load(&self, domain: Domain, seed: u64) -> Result<Option<GameState>, StoreError>;

    /// Overwrite the saved state for this day.
    async fn save(&self, domain: Domain, seed: u64, state: &GameState) -> Result<(), StoreError>;
}

/// In-process store holding JSON text, the way a browser's local storage would.
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryProgressStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored text, for inspection.
    pub async fn raw(&self, domain: Domain, seed: u64) -> Option<String> {
        self.entries.read().await.get(&progress_key(domain, seed)).cloned()
    }

    /// Store arbitrary text under a key, bypassing encoding.
    pub async fn insert_raw(&self, domain: Domain, seed: u64, text: impl Into<String>) {
        self.entries.write().await.insert(progress_key(domain, seed), text.into());
    }

    /// Number of stored days.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Is the store empty?
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn load(&self, domain: Domain, seed: u64) -> Result<Option<GameState>, StoreError> {
        let key = progress_key(domain, seed);
        let entries = self.entries.read().await;
        let Some(text) = entries.get(&key) else {
            return Ok(None);
        };

        let state: GameState = serde_json::from_str(text)?;
        if !state.check_invariants() {
            return Err(StoreError::Corrupt(key));
        }
        Ok(Some(state))
    }

    async fn save(&self, domain: Domain, seed: u64, state: &GameState) -> Result<(), StoreError> {
        let text = serde_json::to_string(state)?;
        self.entries.write().await.insert(progress_key(domain, seed), text);
        Ok(())
    }
}
