//! Playbook Core Library
//!
//! Platform-agnostic data model and editing logic for the tactical play
//! editor: multi-frame court diagrams, undo, playback, and the slot-based
//! mapping that lets a saved play be reopened against any starting five.

pub mod config;
pub mod court;
pub mod editor;
pub mod frame;
pub mod history;
pub mod magnet;
pub mod notify;
pub mod path;
pub mod play;
pub mod playback;
pub mod roles;
pub mod roster;
pub mod storage;
pub mod token;
pub mod tools;

pub use config::{ConfigError, EditorConfig};
pub use court::{CourtMapper, CourtType};
pub use editor::{Editor, EditorEvent, PendingSave, PointerCapture};
pub use frame::{Frame, FrameSequence};
pub use history::{UndoHistory, MAX_UNDO_HISTORY};
pub use magnet::{Magnet, apply_ball_magnetism};
pub use notify::{LogNotifier, Notifier, NotifyLevel, RecordingNotifier};
pub use path::{CourtPath, PathParseError};
pub use play::StoredPlay;
pub use playback::{Playback, PlaybackTick};
pub use roles::{
    AbstractionReport, InstantiationReport, Substitution, SubstitutionReport, abstract_frames,
    instantiate_frames, substitute,
};
pub use roster::{PlayerRecord, Roster};
pub use storage::{MemoryStore, PlayLibrary, StorageError, StorageResult, StrategyStore};
pub use token::{PlayerCard, PlayerId, Token, TokenId, TokenKind};
pub use tools::{EditMode, Gesture, ModeController};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;
