//! Freehand movement paths drawn on a frame.

use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error decoding the stored point-list encoding of a path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathParseError {
    #[error("point `{0}` is not an `x,y` pair")]
    MalformedPoint(String),
    #[error("invalid coordinate `{0}`")]
    InvalidNumber(String),
}

/// An ordered point sequence in court view-box units, rendered as a polyline.
///
/// Stored as an SVG `points` string (`"x,y x,y ..."`). Rust's float formatting
/// is shortest-round-trip, so store/load is lossless.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourtPath {
    points: Vec<Point>,
}

impl CourtPath {
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The `points` attribute of an SVG polyline.
    pub fn svg_points(&self) -> String {
        self.to_string()
    }

    /// Polyline as a kurbo path for renderers.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some((first, rest)) = self.points.split_first() else {
            return path;
        };
        path.move_to(*first);
        for point in rest {
            path.line_to(*point);
        }
        path
    }

    pub fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p))
    }

    /// Whether `point` lies within `tolerance` of any segment.
    ///
    /// The eraser passes half of its hit-region width as the tolerance.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.points.len() < 2 {
            return self
                .points
                .first()
                .is_some_and(|p| p.distance(point) <= tolerance);
        }

        self.points.windows(2).any(|segment| {
            let (start, end) = (segment[0], segment[1]);
            let line_vec = end - start;
            let line_len_sq = line_vec.hypot2();
            if line_len_sq < f64::EPSILON {
                return start.distance(point) <= tolerance;
            }
            let point_vec: Vec2 = point - start;
            let t = (point_vec.dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
            let projection = start + line_vec * t;
            projection.distance(point) <= tolerance
        })
    }
}

impl fmt::Display for CourtPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{},{}", p.x, p.y)?;
        }
        Ok(())
    }
}

impl FromStr for CourtPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let points = s
            .split_whitespace()
            .map(|pair| {
                let (x, y) = pair
                    .split_once(',')
                    .ok_or_else(|| PathParseError::MalformedPoint(pair.to_string()))?;
                let parse = |v: &str| {
                    v.parse::<f64>()
                        .map_err(|_| PathParseError::InvalidNumber(v.to_string()))
                };
                Ok(Point::new(parse(x)?, parse(y)?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { points })
    }
}

impl TryFrom<String> for CourtPath {
    type Error = PathParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CourtPath> for String {
    fn from(path: CourtPath) -> Self {
        path.to_string()
    }
}
