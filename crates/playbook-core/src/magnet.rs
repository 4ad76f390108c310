//! Ball magnetism: the ball sticks to a token dragged close enough to it.

use crate::court::CourtType;
use crate::frame::Frame;
use crate::token::TokenId;
use kurbo::Point;

/// Distance (percent units, aspect-corrected) under which the ball snaps.
pub const DEFAULT_MAGNET_RADIUS: f64 = 4.0;
/// Offset from the carrier's position where the snapped ball lands.
pub const DEFAULT_BALL_OFFSET: f64 = 2.0;

/// Tuning for [`apply_ball_magnetism`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Magnet {
    pub radius: f64,
    pub ball_offset: f64,
}

impl Default for Magnet {
    fn default() -> Self {
        Self {
            radius: DEFAULT_MAGNET_RADIUS,
            ball_offset: DEFAULT_BALL_OFFSET,
        }
    }
}

/// Aspect-corrected distance between two points in percentage space.
pub fn court_distance(a: Point, b: Point, court: CourtType) -> f64 {
    let dx = b.x - a.x;
    let dy = (b.y - a.y) * court.aspect();
    (dx * dx + dy * dy).sqrt()
}

/// Snap the frame's ball next to `mover` if it is within the magnet radius.
///
/// No-op when the frame has no ball, the mover is unknown, or the mover is
/// the ball itself. Returns true if the ball was moved.
pub fn apply_ball_magnetism(frame: &mut Frame, mover: TokenId, court: CourtType, magnet: Magnet) -> bool {
    let Some(carrier) = frame.token(mover).filter(|t| !t.is_ball()).map(|t| t.position()) else {
        return false;
    };
    let Some(ball) = frame.ball_mut() else {
        return false;
    };

    if court_distance(carrier, ball.position(), court) >= magnet.radius {
        return false;
    }

    ball.set_position(carrier.x + magnet.ball_offset, carrier.y + magnet.ball_offset);
    log::trace!("Ball snapped to carrier {} at ({}, {})", mover, ball.x, ball.y);
    true
}
