//! The editing session: frames, undo history, playback cursor and tool mode.

use crate::config::EditorConfig;
use crate::court::{CourtMapper, CourtType};
use crate::frame::{Frame, FrameSequence};
use crate::history::UndoHistory;
use crate::magnet::apply_ball_magnetism;
use crate::path::CourtPath;
use crate::play::StoredPlay;
use crate::playback::{Playback, PlaybackTick};
use crate::roles::{
    AbstractionReport, InstantiationReport, Substitution, SubstitutionReport, abstract_frames,
    instantiate_frames, substitute,
};
use crate::roster::{PlayerRecord, Roster};
use crate::token::{PlayerCard, Token, TokenId, TokenKind};
use crate::tools::{EditMode, Gesture, ModeController};
use kurbo::{Point, Rect};

// Use web-time on WASM, std::time otherwise
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Default name of a new play.
pub const UNTITLED_PLAY: &str = "Untitled play";

/// Change notifications for a presentation layer, drained with
/// [`Editor::take_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// The frame sequence was replaced or edited.
    FramesChanged,
    /// The playback cursor now points at this frame.
    CursorMoved(usize),
    PlaybackStarted,
    PlaybackStopped,
    ModeChanged(EditMode),
    /// The session was stored under this id.
    Saved(String),
}

/// An owned, roster-independent save payload.
///
/// Produced synchronously so the asynchronous store call does not borrow the
/// session; editing may continue while it is in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    pub play: StoredPlay,
    pub report: AbstractionReport,
}

/// A tactical play editing session.
///
/// Every mutating operation pushes one snapshot of the whole frame sequence
/// onto the undo history before it applies, and touches only the frame under
/// the playback cursor (frame insert/delete and reset aside).
#[derive(Debug, Clone)]
pub struct Editor {
    id: Option<String>,
    name: String,
    mapper: CourtMapper,
    frames: FrameSequence,
    history: UndoHistory,
    playback: Playback,
    tools: ModeController,
    config: EditorConfig,
    dirty: bool,
    events: Vec<EditorEvent>,
}

impl Editor {
    /// Open a session with a single empty frame.
    pub fn new(court: CourtType) -> Self {
        Self::with_config(court, EditorConfig::default())
    }

    pub fn with_config(court: CourtType, config: EditorConfig) -> Self {
        log::debug!("Opening {:?} court session", court);
        Self {
            id: None,
            name: UNTITLED_PLAY.to_string(),
            mapper: CourtMapper::native(court),
            frames: FrameSequence::new(),
            history: UndoHistory::with_capacity(config.undo_capacity),
            playback: Playback::with_interval(config.playback_interval()),
            tools: ModeController::new(),
            config,
            dirty: false,
            events: Vec::new(),
        }
    }

    /// Open a stored play, binding its slot labels to `roster`'s starters.
    pub fn from_stored(play: &StoredPlay, roster: &Roster, config: EditorConfig) -> (Self, InstantiationReport) {
        let (frames, report) = instantiate_frames(&play.frames, roster);
        let mut editor = Self::with_config(play.court, config);
        editor.id = play.id.clone();
        editor.name = play.name.clone();
        editor.frames = FrameSequence::from_frames(frames);
        log::info!(
            "Loaded play '{}' ({} frames, {} players bound)",
            editor.name,
            editor.frames.len(),
            report.bound
        );
        (editor, report)
    }

    // --- Accessors ---

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.dirty = true;
    }

    pub fn court(&self) -> CourtType {
        self.mapper.court
    }

    /// Switch the court diagram. Existing paths keep their coordinates.
    pub fn set_court_type(&mut self, court: CourtType) {
        if self.mapper.court != court {
            self.mapper.court = court;
            self.dirty = true;
        }
    }

    /// Update the court element's on-screen bounding box.
    pub fn set_court_bounds(&mut self, bounds: Rect) {
        self.mapper.bounds = bounds;
    }

    pub fn mapper(&self) -> &CourtMapper {
        &self.mapper
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn frames(&self) -> &FrameSequence {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// The frame under the playback cursor.
    pub fn current_frame(&self) -> &Frame {
        self.frames.at(self.playback.cursor())
    }

    pub fn cursor(&self) -> usize {
        self.playback.cursor()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn mode(&self) -> EditMode {
        self.tools.mode()
    }

    pub fn gesture(&self) -> &Gesture {
        self.tools.gesture()
    }

    /// Points of the path being drawn, for a live preview.
    pub fn draft_path(&self) -> &[Point] {
        self.tools.draft_points()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Drain queued change notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Internal helpers ---

    fn record_undo(&mut self) {
        self.history.push(&self.frames);
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.events.push(EditorEvent::FramesChanged);
    }

    fn current_frame_mut(&mut self) -> &mut Frame {
        self.frames.at_mut(self.playback.cursor())
    }

    /// Move a token without recording undo, then let the ball follow it.
    fn place_token(&mut self, id: TokenId, x: f64, y: f64) -> bool {
        let court = self.court();
        let magnet = self.config.magnet();
        let frame = self.current_frame_mut();
        if !frame.set_token_position(id, x, y) {
            return false;
        }
        apply_ball_magnetism(frame, id, court, magnet);
        true
    }

    // --- Frame & token store ---

    /// Add a token at center court on the current frame.
    ///
    /// `player` is required for [`TokenKind::Player`] and ignored otherwise.
    /// Returns `None` without touching history when a uniqueness rule would
    /// be broken.
    pub fn add_token(&mut self, kind: TokenKind, label: Option<&str>, player: Option<&PlayerRecord>) -> Option<TokenId> {
        let token = match (kind, player) {
            (TokenKind::Player, Some(record)) => Token::player(PlayerCard::from(record)),
            (TokenKind::Player, None) => return None,
            (kind, _) => Token::new(kind, label.map(str::to_string)),
        };
        if !self.current_frame().can_add(&token) {
            log::debug!("Ignoring duplicate {} token", kind);
            return None;
        }

        let id = token.id;
        self.record_undo();
        self.current_frame_mut().add_token(token);
        self.touch();
        Some(id)
    }

    /// Move a token to `(x, y)`, clamped to the court. Unknown ids are ignored.
    pub fn move_token(&mut self, id: TokenId, x: f64, y: f64) -> bool {
        if self.current_frame().token(id).is_none() {
            return false;
        }
        self.record_undo();
        self.place_token(id, x, y);
        self.touch();
        true
    }

    pub fn remove_token(&mut self, id: TokenId) -> bool {
        if self.current_frame().token(id).is_none() {
            return false;
        }
        self.record_undo();
        self.current_frame_mut().remove_token(id);
        self.touch();
        true
    }

    /// Attach a path to the current frame. Empty paths are ignored.
    pub fn add_path(&mut self, path: CourtPath) -> bool {
        if path.is_empty() {
            return false;
        }
        self.record_undo();
        self.current_frame_mut().add_path(path);
        self.touch();
        true
    }

    pub fn remove_path(&mut self, index: usize) -> bool {
        if index >= self.current_frame().paths.len() {
            return false;
        }
        self.record_undo();
        self.current_frame_mut().remove_path(index);
        self.touch();
        true
    }

    // --- Undo ---

    /// Restore the sequence as it was before the last mutation.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.pop() else {
            return false;
        };
        self.tools.cancel();
        self.frames = snapshot;
        self.clamp_cursor();
        self.touch();
        log::debug!("Undo ({} left)", self.history.len());
        true
    }

    /// Clear the board to a single empty frame. Undoable.
    pub fn reset(&mut self) {
        self.record_undo();
        self.tools.cancel();
        if self.playback.pause() {
            self.events.push(EditorEvent::PlaybackStopped);
        }
        self.frames = FrameSequence::new();
        self.clamp_cursor();
        self.touch();
        log::debug!("Board reset");
    }

    // --- Playback sequencer ---

    fn clamp_cursor(&mut self) {
        let before = self.playback.cursor();
        self.playback.clamp(self.frames.len());
        if self.playback.cursor() != before {
            self.events.push(EditorEvent::CursorMoved(self.playback.cursor()));
        }
    }

    /// Duplicate the current frame right after it and move into the copy.
    pub fn add_frame(&mut self) -> usize {
        self.record_undo();
        let index = self.frames.duplicate(self.playback.cursor());
        self.playback.seek(index, self.frames.len());
        self.touch();
        self.events.push(EditorEvent::CursorMoved(index));
        log::debug!("Added frame {} of {}", index + 1, self.frames.len());
        index
    }

    /// Delete the current frame. No-op when it is the only one.
    pub fn delete_frame(&mut self) -> bool {
        if self.frames.len() <= 1 {
            return false;
        }
        self.record_undo();
        self.frames.remove(self.playback.cursor());
        self.clamp_cursor();
        self.touch();
        log::debug!("Deleted frame, {} left", self.frames.len());
        true
    }

    pub fn seek(&mut self, index: usize) -> bool {
        let moved = self.playback.seek(index, self.frames.len());
        if moved {
            self.events.push(EditorEvent::CursorMoved(self.playback.cursor()));
        }
        moved
    }

    pub fn prev(&mut self) -> bool {
        let moved = self.playback.prev();
        if moved {
            self.events.push(EditorEvent::CursorMoved(self.playback.cursor()));
        }
        moved
    }

    pub fn next(&mut self) -> bool {
        let moved = self.playback.next(self.frames.len());
        if moved {
            self.events.push(EditorEvent::CursorMoved(self.playback.cursor()));
        }
        moved
    }

    pub fn play(&mut self) -> bool {
        self.play_at(Instant::now())
    }

    /// Start auto-advancing from `now`.
    pub fn play_at(&mut self, now: Instant) -> bool {
        let before = self.playback.cursor();
        if !self.playback.play(now, self.frames.len()) {
            return false;
        }
        if self.playback.cursor() != before {
            self.events.push(EditorEvent::CursorMoved(self.playback.cursor()));
        }
        self.events.push(EditorEvent::PlaybackStarted);
        true
    }

    pub fn pause(&mut self) -> bool {
        let was_playing = self.playback.pause();
        if was_playing {
            self.events.push(EditorEvent::PlaybackStopped);
        }
        was_playing
    }

    pub fn tick(&mut self) -> PlaybackTick {
        self.tick_at(Instant::now())
    }

    /// Drive the playback timer. Call from the host's event loop.
    pub fn tick_at(&mut self, now: Instant) -> PlaybackTick {
        let tick = self.playback.tick(now, self.frames.len());
        match tick {
            PlaybackTick::Idle => {}
            PlaybackTick::Advanced(cursor) => self.events.push(EditorEvent::CursorMoved(cursor)),
            PlaybackTick::Finished(cursor) => {
                self.events.push(EditorEvent::CursorMoved(cursor));
                self.events.push(EditorEvent::PlaybackStopped);
            }
            PlaybackTick::Stopped => self.events.push(EditorEvent::PlaybackStopped),
        }
        tick
    }

    // --- Mode state machine / drag controller ---

    /// Select a tool mode. Cancels any gesture in flight.
    pub fn set_mode(&mut self, mode: EditMode) {
        if self.tools.mode() == mode {
            return;
        }
        self.cancel();
        self.tools.set_mode(mode);
        self.events.push(EditorEvent::ModeChanged(mode));
    }

    /// Pointer-down at a screen point. Returns true if a gesture started.
    ///
    /// - Move: grabs the topmost token under the pointer, taking one undo snapshot.
    /// - Draw: starts accumulating a path, only on empty court.
    /// - Erase: removes a path under the pointer and keeps erasing while held.
    pub fn begin(&mut self, screen: Point) -> bool {
        if self.tools.is_active() {
            self.cancel();
        }
        match self.tools.mode() {
            EditMode::Move => {
                let Some(id) = self.token_under(screen) else {
                    return false;
                };
                self.record_undo();
                self.tools.begin_drag(id);
                true
            }
            EditMode::Draw => {
                if self.token_under(screen).is_some() {
                    return false;
                }
                let point = self.mapper.screen_to_view_box(screen);
                self.tools.begin_draw(point);
                true
            }
            EditMode::Erase => {
                self.tools.begin_erase();
                self.erase_at(screen);
                true
            }
        }
    }

    /// Pointer-move while a gesture is active. Returns true if anything changed.
    pub fn update(&mut self, screen: Point) -> bool {
        match self.tools.gesture() {
            Gesture::Idle => false,
            Gesture::Dragging { token } => {
                let token = *token;
                let point = self.mapper.screen_to_percent(screen);
                let moved = self.place_token(token, point.x, point.y);
                if moved {
                    self.touch();
                }
                moved
            }
            Gesture::Drawing { .. } => {
                let point = self.mapper.screen_to_view_box(screen);
                self.tools.push_point(point)
            }
            Gesture::Erasing { .. } => self.erase_at(screen),
        }
    }

    /// Pointer-up. Commits a drawn path (one undo snapshot); drags and erase
    /// sweeps were applied as they happened. Returns true if a path was committed.
    pub fn end(&mut self) -> bool {
        match self.tools.end() {
            Gesture::Drawing { points } if points.len() >= 2 => {
                self.record_undo();
                self.current_frame_mut().add_path(CourtPath::from_points(points));
                self.touch();
                true
            }
            _ => false,
        }
    }

    /// Abandon the gesture (pointer-cancel, lost capture, mode switch).
    ///
    /// A drag keeps the position reached so far; an uncommitted path is discarded.
    pub fn cancel(&mut self) {
        if let Gesture::Drawing { points } = self.tools.cancel() {
            log::debug!("Discarded draft path of {} points", points.len());
        }
    }

    /// Start a gesture scoped to the returned guard. Dropping the guard
    /// without [`PointerCapture::release`] cancels the gesture.
    pub fn capture(&mut self, screen: Point) -> Option<PointerCapture<'_>> {
        if !self.begin(screen) {
            return None;
        }
        Some(PointerCapture {
            editor: self,
            released: false,
        })
    }

    /// Topmost token within grab radius of a screen point.
    fn token_under(&self, screen: Point) -> Option<TokenId> {
        let point = self.mapper.screen_to_percent(screen);
        self.current_frame()
            .token_at(point, self.config.token_hit_radius, self.court().aspect())
    }

    fn erase_at(&mut self, screen: Point) -> bool {
        let point = self.mapper.screen_to_view_box(screen);
        let Some(index) = self
            .current_frame()
            .path_at(point, self.config.erase_hit_width / 2.0)
        else {
            return false;
        };
        self.record_undo();
        self.current_frame_mut().remove_path(index);
        self.tools.record_erase();
        self.touch();
        true
    }

    // --- Role abstraction ---

    /// Build the roster-independent save payload against the current starters.
    pub fn prepare_save(&self, roster: &Roster) -> PendingSave {
        let (frames, report) = abstract_frames(self.frames.iter(), roster);
        PendingSave {
            play: StoredPlay {
                id: self.id.clone(),
                name: self.name.clone(),
                court: self.court(),
                frames,
            },
            report,
        }
    }

    /// Record a successful save. Only call once the store has accepted the payload.
    pub fn mark_saved(&mut self, id: String) {
        self.id = Some(id.clone());
        self.dirty = false;
        self.events.push(EditorEvent::Saved(id));
    }

    /// Rebind tokens across every frame in one undoable step.
    pub fn substitute(&mut self, outgoing: &Substitution, incoming: &PlayerRecord) -> SubstitutionReport {
        let before = self.frames.clone();
        let report = substitute(&mut self.frames, outgoing, incoming);
        if report.changed() {
            self.history.push(&before);
            self.touch();
            log::info!("Substituted {} into {} tokens", incoming.name, report.rewritten);
        }
        report
    }
}

/// A pointer gesture scoped to a borrow of the editor.
///
/// Hosts that deliver a whole gesture synchronously hold this for its
/// duration; dropping it without [`release`](Self::release) cancels the
/// gesture, so early returns and panics never leave a drag dangling.
pub struct PointerCapture<'a> {
    editor: &'a mut Editor,
    released: bool,
}

impl PointerCapture<'_> {
    pub fn update(&mut self, screen: Point) -> bool {
        self.editor.update(screen)
    }

    pub fn editor(&self) -> &Editor {
        self.editor
    }

    /// Pointer-up: finish the gesture normally.
    pub fn release(mut self) -> bool {
        self.released = true;
        self.editor.end()
    }
}

impl Drop for PointerCapture<'_> {
    fn drop(&mut self) {
        if !self.released {
            self.editor.cancel();
        }
    }
}
