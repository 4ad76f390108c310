//! File-based strategy store for native platforms.

use super::{BoxFuture, StorageError, StorageResult, StrategyStore, new_play_id, sort_plays};
use crate::play::StoredPlay;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each play as a pretty-printed JSON file named after its id.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Base directory for play files.
    base_path: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// The default plays directory: `<data_local_dir>/playbook/plays`.
    pub fn default_path() -> StorageResult<PathBuf> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Ok(base.join("playbook").join("plays"))
    }

    /// Create a file store in the default location.
    pub fn default_location() -> StorageResult<Self> {
        Self::new(Self::default_path()?)
    }

    fn play_path(&self, id: &str) -> PathBuf {
        // Sanitize ID to be safe for filenames
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

fn read_play(path: &Path) -> StorageResult<StoredPlay> {
    let json = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    StoredPlay::from_json(&json).map_err(|e| {
        StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
    })
}

impl StrategyStore for FileStore {
    fn save(&self, play: &StoredPlay) -> BoxFuture<'_, StorageResult<String>> {
        let mut play = play.clone();
        Box::pin(async move {
            let id = play.id.get_or_insert_with(new_play_id).clone();
            let json = play
                .to_json()
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            let path = self.play_path(&id);
            fs::write(&path, json).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {}", path.display(), e))
            })?;
            Ok(id)
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<StoredPlay>> {
        let path = self.play_path(id);
        let id = id.to_string();
        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(id));
            }
            let mut play = read_play(&path)?;
            // Files copied in by hand may lack an id
            play.id.get_or_insert(id);
            Ok(play)
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<StoredPlay>>> {
        Box::pin(async move {
            if !self.base_path.exists() {
                return Ok(vec![]);
            }
            let entries = fs::read_dir(&self.base_path)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

            let mut plays = Vec::new();
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_none_or(|ext| ext != "json") {
                    continue;
                }
                match read_play(&path) {
                    Ok(mut play) => {
                        if play.id.is_none() {
                            play.id = path.file_stem().and_then(|s| s.to_str()).map(str::to_string);
                        }
                        plays.push(play);
                    }
                    Err(e) => log::warn!("Skipping unreadable play: {}", e),
                }
            }
            sort_plays(&mut plays);
            Ok(plays)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.play_path(id);
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }
}
