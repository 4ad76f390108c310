//! Strategy store abstraction for persisted plays.

mod library;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use library::PlayLibrary;
pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

use crate::play::StoredPlay;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Play not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Persistence collaborator for plays.
///
/// `save` assigns a fresh id when the play has none and overwrites the
/// stored copy otherwise. Returned plays always carry their id.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait StrategyStore: Send + Sync {
    /// Save a play, returning its id.
    fn save(&self, play: &StoredPlay) -> BoxFuture<'_, StorageResult<String>>;

    /// Load a play by id.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<StoredPlay>>;

    /// List all stored plays, ordered by name.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<StoredPlay>>>;

    /// Delete a play. Deleting an unknown id is not an error.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;
}

/// Persistence collaborator for plays (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait StrategyStore {
    /// Save a play, returning its id.
    fn save(&self, play: &StoredPlay) -> BoxFuture<'_, StorageResult<String>>;

    /// Load a play by id.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<StoredPlay>>;

    /// List all stored plays, ordered by name.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<StoredPlay>>>;

    /// Delete a play. Deleting an unknown id is not an error.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;
}

/// Id for a play saved for the first time.
pub(crate) fn new_play_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Order plays for listing: by name, then id.
pub(crate) fn sort_plays(plays: &mut [StoredPlay]) {
    plays.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
}
