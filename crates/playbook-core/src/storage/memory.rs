//! In-memory strategy store.

use super::{BoxFuture, StorageError, StorageResult, StrategyStore, new_play_id, sort_plays};
use crate::play::StoredPlay;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-memory store for testing and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    plays: RwLock<BTreeMap<String, StoredPlay>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StrategyStore for MemoryStore {
    fn save(&self, play: &StoredPlay) -> BoxFuture<'_, StorageResult<String>> {
        let mut play = play.clone();
        Box::pin(async move {
            let mut plays = self
                .plays
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            let id = play.id.get_or_insert_with(new_play_id).clone();
            plays.insert(id.clone(), play);
            Ok(id)
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<StoredPlay>> {
        let id = id.to_string();
        Box::pin(async move {
            let plays = self
                .plays
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            plays.get(&id).cloned().ok_or(StorageError::NotFound(id))
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<StoredPlay>>> {
        Box::pin(async move {
            let plays = self
                .plays
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            let mut list: Vec<StoredPlay> = plays.values().cloned().collect();
            sort_plays(&mut list);
            Ok(list)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut plays = self
                .plays
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            plays.remove(&id);
            Ok(())
        })
    }
}
