//! Pure 2-D point arithmetic shared by every stage of the gaze pipeline.
//!
//! All functions are total: there are no error paths and no panics for
//! any finite input.

use serde::{Deserialize, Serialize};

use crate::constants::DEGREES_FULL_CIRCLE;

/// Immutable 2-D point in image pixel coordinates.
///
/// A single representation is used for landmark positions and pupil
/// candidates alike, regardless of which detector produced them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Signed horizontal distance from `a` to `b` (`b.x - a.x`)
#[must_use]
pub fn horizontal_distance(a: Point2D, b: Point2D) -> f64 {
    b.x - a.x
}

/// Signed vertical distance from `a` to `b` (`b.y - a.y`)
#[must_use]
pub fn vertical_distance(a: Point2D, b: Point2D) -> f64 {
    b.y - a.y
}

/// Euclidean distance between two points
#[must_use]
pub fn distance(a: Point2D, b: Point2D) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Angle of `point` relative to `center`, in degrees.
///
/// Computed with `atan2`, so the result lies in `(-180, 180]`. Callers
/// bucketing into gaze directions normalize with [`normalize_degrees`]
/// first.
#[must_use]
pub fn angle_degrees(center: Point2D, point: Point2D) -> f64 {
    let dy = point.y - center.y;
    let dx = point.x - center.x;
    dy.atan2(dx).to_degrees()
}

/// Normalize an angle in degrees to the range `[0, 360)`
#[must_use]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees % DEGREES_FULL_CIRCLE;
    if normalized < 0.0 {
        normalized + DEGREES_FULL_CIRCLE
    } else {
        normalized
    }
}
