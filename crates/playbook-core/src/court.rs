//! Court geometry and screen-to-court coordinate mapping.

use crate::token::clamp_coord;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Native view-box of a full court.
pub const FULL_COURT_VIEW_BOX: Size = Size::new(1000.0, 560.0);
/// Native view-box of a half court.
pub const HALF_COURT_VIEW_BOX: Size = Size::new(500.0, 470.0);

/// Which court diagram a play is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourtType {
    #[default]
    Full,
    Half,
}

impl CourtType {
    /// The court's native coordinate space, used for path geometry.
    pub fn view_box(self) -> Size {
        match self {
            CourtType::Full => FULL_COURT_VIEW_BOX,
            CourtType::Half => HALF_COURT_VIEW_BOX,
        }
    }

    /// View-box height over width. Scaling a percentage-space y delta by
    /// this makes distances isotropic on screen.
    pub fn aspect(self) -> f64 {
        let view_box = self.view_box();
        view_box.height / view_box.width
    }
}

impl fmt::Display for CourtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            CourtType::Full => "full",
            CourtType::Half => "half",
        })
    }
}

/// Maps between screen pixels, token percentage space `[0, 100]` and the
/// court's view-box units.
///
/// `bounds` is the court element's bounding box on screen, as reported by the
/// hosting UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourtMapper {
    pub court: CourtType,
    pub bounds: Rect,
}

impl CourtMapper {
    pub fn new(court: CourtType, bounds: Rect) -> Self {
        Self { court, bounds }
    }

    /// A mapper whose screen box coincides with the view-box, handy for hosts
    /// that already report court-native coordinates.
    pub fn native(court: CourtType) -> Self {
        Self::new(court, Rect::from_origin_size(Point::ZERO, court.view_box()))
    }

    /// Screen to normalized `[0, 1]` court space. A degenerate box maps everything to the origin.
    fn screen_to_unit(&self) -> Affine {
        let width = self.bounds.width();
        let height = self.bounds.height();
        if width <= f64::EPSILON || height <= f64::EPSILON {
            return Affine::scale(0.0);
        }
        Affine::scale_non_uniform(1.0 / width, 1.0 / height)
            * Affine::translate(-Vec2::new(self.bounds.x0, self.bounds.y0))
    }

    /// Screen point to token percentage space, clamped to the court.
    pub fn screen_to_percent(&self, screen: Point) -> Point {
        let unit = self.screen_to_unit() * screen;
        Point::new(clamp_coord(unit.x * 100.0), clamp_coord(unit.y * 100.0))
    }

    /// Screen point to view-box units (not clamped; strokes may leave the court).
    pub fn screen_to_view_box(&self, screen: Point) -> Point {
        let view_box = self.court.view_box();
        let unit = self.screen_to_unit() * screen;
        Point::new(unit.x * view_box.width, unit.y * view_box.height)
    }

    pub fn percent_to_view_box(&self, percent: Point) -> Point {
        let view_box = self.court.view_box();
        Point::new(
            percent.x / 100.0 * view_box.width,
            percent.y / 100.0 * view_box.height,
        )
    }

    pub fn view_box_to_percent(&self, point: Point) -> Point {
        let view_box = self.court.view_box();
        Point::new(
            clamp_coord(point.x / view_box.width * 100.0),
            clamp_coord(point.y / view_box.height * 100.0),
        )
    }
}
