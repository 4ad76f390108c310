//! Editor tuning knobs.

use crate::history::MAX_UNDO_HISTORY;
use crate::magnet::{DEFAULT_BALL_OFFSET, DEFAULT_MAGNET_RADIUS, Magnet};
use crate::playback::DEFAULT_FRAME_INTERVAL;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default width of the invisible eraser hit region around a path (view-box units).
pub const DEFAULT_ERASE_HIT_WIDTH: f64 = 20.0;
/// Default grab radius around a token center (percent units, aspect-corrected).
pub const DEFAULT_TOKEN_HIT_RADIUS: f64 = 3.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunable constants of an editing session. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of undo snapshots.
    pub undo_capacity: usize,
    /// Delay between auto-advanced frames during playback.
    pub playback_interval_ms: u64,
    pub magnet_radius: f64,
    pub ball_offset: f64,
    pub erase_hit_width: f64,
    pub token_hit_radius: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            undo_capacity: MAX_UNDO_HISTORY,
            playback_interval_ms: DEFAULT_FRAME_INTERVAL.as_millis() as u64,
            magnet_radius: DEFAULT_MAGNET_RADIUS,
            ball_offset: DEFAULT_BALL_OFFSET,
            erase_hit_width: DEFAULT_ERASE_HIT_WIDTH,
            token_hit_radius: DEFAULT_TOKEN_HIT_RADIUS,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn playback_interval(&self) -> Duration {
        Duration::from_millis(self.playback_interval_ms)
    }

    pub fn magnet(&self) -> Magnet {
        Magnet {
            radius: self.magnet_radius,
            ball_offset: self.ball_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.undo_capacity, 20);
        assert_eq!(config.playback_interval(), Duration::from_millis(800));
        assert_eq!(config.magnet(), Magnet::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r#"{ "undo_capacity": 5 }"#).unwrap();
        assert_eq!(config.undo_capacity, 5);
        assert_eq!(config.erase_hit_width, DEFAULT_ERASE_HIT_WIDTH);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            EditorConfig::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");
        std::fs::write(&path, r#"{ "playback_interval_ms": 250 }"#).unwrap();
        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.playback_interval(), Duration::from_millis(250));

        assert!(matches!(
            EditorConfig::load(&dir.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));
    }
}
