//! Editing modes and the pointer gesture state machine.
//!
//! The controller only tracks *which* gesture is in flight; the
//! [`Editor`](crate::editor::Editor) performs the mutation each gesture step
//! implies.

use crate::token::TokenId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Tool mode selected by the user. Changes only on explicit selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EditMode {
    /// Drag tokens around the court.
    #[default]
    Move,
    /// Draw freehand paths.
    Draw,
    /// Remove paths by clicking or sweeping over them.
    Erase,
}

/// Pointer gesture in progress.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    /// Waiting for a pointer-down.
    #[default]
    Idle,
    /// A token is being dragged. The undo snapshot was taken at drag start.
    Dragging { token: TokenId },
    /// A path is being accumulated, in view-box units.
    Drawing { points: Vec<Point> },
    /// The primary button is held in erase mode.
    Erasing { removed: usize },
}

impl Gesture {
    pub fn is_active(&self) -> bool {
        !matches!(self, Gesture::Idle)
    }
}

/// Current mode plus the gesture in flight.
#[derive(Debug, Clone, Default)]
pub struct ModeController {
    mode: EditMode,
    gesture: Gesture,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_active()
    }

    /// Switch mode. Any gesture in flight is cancelled and returned.
    pub fn set_mode(&mut self, mode: EditMode) -> Gesture {
        self.mode = mode;
        self.cancel()
    }

    pub fn begin_drag(&mut self, token: TokenId) {
        self.gesture = Gesture::Dragging { token };
    }

    pub fn begin_draw(&mut self, point: Point) {
        self.gesture = Gesture::Drawing { points: vec![point] };
    }

    pub fn begin_erase(&mut self) {
        self.gesture = Gesture::Erasing { removed: 0 };
    }

    /// The token being dragged, if any.
    pub fn dragged_token(&self) -> Option<TokenId> {
        match self.gesture {
            Gesture::Dragging { token } => Some(token),
            _ => None,
        }
    }

    /// Append a point to the path being drawn. Returns false when not drawing.
    pub fn push_point(&mut self, point: Point) -> bool {
        match &mut self.gesture {
            Gesture::Drawing { points } => {
                points.push(point);
                true
            }
            _ => false,
        }
    }

    /// Count a path removed during the current erase sweep.
    pub fn record_erase(&mut self) {
        if let Gesture::Erasing { removed } = &mut self.gesture {
            *removed += 1;
        }
    }

    /// Points accumulated by the current draw gesture.
    pub fn draft_points(&self) -> &[Point] {
        match &self.gesture {
            Gesture::Drawing { points } => points,
            _ => &[],
        }
    }

    /// Finish the gesture, returning it for the caller to commit.
    pub fn end(&mut self) -> Gesture {
        std::mem::take(&mut self.gesture)
    }

    /// Abandon the gesture, returning what was in flight.
    pub fn cancel(&mut self) -> Gesture {
        std::mem::take(&mut self.gesture)
    }
}
