//! Persisted play wire format.

use crate::court::CourtType;
use crate::frame::Frame;
use serde::{Deserialize, Serialize};

/// A play as handed to the strategy store: roster-independent frames plus
/// court type.
///
/// Wire shape: `{ "id"?, "name", "type": "full" | "half", "data": [Frame] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPlay {
    /// Assigned by the store on first save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub court: CourtType,
    #[serde(rename = "data")]
    pub frames: Vec<Frame>,
}

impl StoredPlay {
    pub fn new(name: impl Into<String>, court: CourtType, frames: Vec<Frame>) -> Self {
        Self {
            id: None,
            name: name.into(),
            court,
            frames,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
