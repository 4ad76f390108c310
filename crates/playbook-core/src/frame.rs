//! Frames (full snapshots of a single instant) and the frame sequence.

use crate::path::CourtPath;
use crate::token::{Token, TokenId, TokenKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One full snapshot of tokens and paths.
///
/// Frames are not deltas: a token missing from this list does not exist in
/// this frame, whatever earlier frames contain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub paths: Vec<CourtPath>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether inserting `candidate` keeps the per-frame uniqueness rules:
    /// one ball, one defense marker per label, one token per bound player.
    pub fn can_add(&self, candidate: &Token) -> bool {
        match candidate.kind {
            TokenKind::Ball => !self.tokens.iter().any(Token::is_ball),
            TokenKind::Defense => !self
                .tokens
                .iter()
                .any(|t| t.kind == TokenKind::Defense && t.label == candidate.label),
            TokenKind::Player => match candidate.player_ref() {
                Some(player) => !self.tokens.iter().any(|t| t.player_ref() == Some(player)),
                None => false,
            },
            TokenKind::Offense => true,
        }
    }

    /// Insert a token. Returns false (and leaves the frame alone) if a
    /// uniqueness rule would be broken.
    pub fn add_token(&mut self, token: Token) -> bool {
        if !self.can_add(&token) {
            return false;
        }
        self.tokens.push(token);
        true
    }

    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    pub fn token_mut(&mut self, id: TokenId) -> Option<&mut Token> {
        self.tokens.iter_mut().find(|t| t.id == id)
    }

    pub fn ball(&self) -> Option<&Token> {
        self.tokens.iter().find(|t| t.is_ball())
    }

    pub fn ball_mut(&mut self) -> Option<&mut Token> {
        self.tokens.iter_mut().find(|t| t.is_ball())
    }

    /// Move a token in place (clamped). Returns false if the id is unknown.
    pub fn set_token_position(&mut self, id: TokenId, x: f64, y: f64) -> bool {
        match self.token_mut(id) {
            Some(token) => {
                token.set_position(x, y);
                true
            }
            None => false,
        }
    }

    pub fn remove_token(&mut self, id: TokenId) -> Option<Token> {
        let index = self.tokens.iter().position(|t| t.id == id)?;
        Some(self.tokens.remove(index))
    }

    pub fn add_path(&mut self, path: CourtPath) {
        self.paths.push(path);
    }

    pub fn remove_path(&mut self, index: usize) -> Option<CourtPath> {
        (index < self.paths.len()).then(|| self.paths.remove(index))
    }

    /// Topmost token whose center lies within `radius` of `point`.
    ///
    /// `aspect` scales the y axis (view-box height / width) so the hit area
    /// is round on screen.
    pub fn token_at(&self, point: Point, radius: f64, aspect: f64) -> Option<TokenId> {
        self.tokens
            .iter()
            .rev()
            .find(|t| {
                let dx = t.x - point.x;
                let dy = (t.y - point.y) * aspect;
                (dx * dx + dy * dy).sqrt() <= radius
            })
            .map(|t| t.id)
    }

    /// Index of the topmost path within `tolerance` of `point` (view-box units).
    pub fn path_at(&self, point: Point, tolerance: f64) -> Option<usize> {
        self.paths
            .iter()
            .enumerate()
            .rev()
            .find(|(_, path)| path.hit_test(point, tolerance))
            .map(|(index, _)| index)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.paths.is_empty()
    }
}

/// The ordered frames of a play. Never empty.
///
/// Frames are shared behind `Arc` so cloning the whole sequence for undo only
/// copies pointers; the frame being edited is copied on first write.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSequence {
    frames: Vec<Arc<Frame>>,
}

impl Default for FrameSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSequence {
    /// A sequence holding a single empty frame.
    pub fn new() -> Self {
        Self {
            frames: vec![Arc::new(Frame::new())],
        }
    }

    /// Build from owned frames. An empty list yields a single empty frame.
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        if frames.is_empty() {
            return Self::new();
        }
        Self {
            frames: frames.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn to_frames(&self) -> Vec<Frame> {
        self.frames.iter().map(|f| Frame::clone(f)).collect()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn last_index(&self) -> usize {
        self.frames.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index).map(Arc::as_ref)
    }

    /// Mutable access to one frame, copying it first if a snapshot shares it.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Frame> {
        self.frames.get_mut(index).map(Arc::make_mut)
    }

    /// The frame at `index`, clamped to the last frame.
    pub fn at(&self, index: usize) -> &Frame {
        &self.frames[index.min(self.last_index())]
    }

    /// Mutable frame at `index` (clamped), copied first if a snapshot shares it.
    pub fn at_mut(&mut self, index: usize) -> &mut Frame {
        let index = index.min(self.last_index());
        Arc::make_mut(&mut self.frames[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter().map(Arc::as_ref)
    }

    /// Insert a frame right after `index` (clamped to the end). Returns the new index.
    pub fn insert_after(&mut self, index: usize, frame: Frame) -> usize {
        let at = (index + 1).min(self.frames.len());
        self.frames.insert(at, Arc::new(frame));
        at
    }

    /// Insert a copy of the frame at `index` right after it. Returns the new index.
    ///
    /// The copy shares storage until either side is edited.
    pub fn duplicate(&mut self, index: usize) -> usize {
        let index = index.min(self.last_index());
        let copy = Arc::clone(&self.frames[index]);
        self.frames.insert(index + 1, copy);
        index + 1
    }

    /// Remove the frame at `index`. Refuses to remove the last remaining frame.
    pub fn remove(&mut self, index: usize) -> Option<Frame> {
        if self.frames.len() <= 1 || index >= self.frames.len() {
            return None;
        }
        let frame = self.frames.remove(index);
        Some(Arc::unwrap_or_clone(frame))
    }

    /// Apply `f` to every frame, copying only the frames it reports as changed.
    pub fn update_each<F>(&mut self, mut f: F) -> usize
    where
        F: FnMut(&mut Frame) -> bool,
    {
        let mut changed = 0;
        for slot in &mut self.frames {
            let mut frame = Frame::clone(slot);
            if f(&mut frame) {
                *slot = Arc::new(frame);
                changed += 1;
            }
        }
        changed
    }

    /// Whether two sequences share storage for the frame at `index`.
    pub fn shares_frame(&self, other: &Self, index: usize) -> bool {
        match (self.frames.get(index), other.frames.get(index)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
