//! Per-face observations produced by the external face-landmark detector.
//!
//! The detector may fail to resolve any individual landmark or eye-open
//! probability; those are legitimate absent states, not errors, and they
//! are modeled as `Option` fields. Observations are consumed read-only
//! and never outlive the frame they were detected in.

use opencv::core::Rect;
use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;

/// Axis-aligned bounding box in image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl FaceRect {
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[must_use]
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    #[must_use]
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Convert to the `OpenCV` rectangle representation
    #[must_use]
    pub fn to_cv(&self) -> Rect {
        Rect::new(self.left, self.top, self.width(), self.height())
    }
}

/// One detected face in one frame.
///
/// Landmark sides are named from the viewer's perspective, matching the
/// mirrored preview the landmark detector operates on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceObservation {
    /// Face bounding box in image pixel coordinates
    pub bounding_box: FaceRect,

    /// Left eye cavity center, when detectable
    pub left_eye: Option<Point2D>,

    /// Right eye cavity center, when detectable
    pub right_eye: Option<Point2D>,

    /// Left ear position, when detectable
    pub left_ear: Option<Point2D>,

    /// Right ear position, when detectable
    pub right_ear: Option<Point2D>,

    /// Nose base position, when detectable
    pub nose_base: Option<Point2D>,

    /// Probability in `[0, 1]` that the left eye is open, when computable
    pub left_eye_open_prob: Option<f32>,

    /// Probability in `[0, 1]` that the right eye is open, when computable
    pub right_eye_open_prob: Option<f32>,
}

impl FaceObservation {
    /// Whether all five landmarks required for gaze classification are present
    #[must_use]
    pub fn has_required_landmarks(&self) -> bool {
        self.left_eye.is_some()
            && self.right_eye.is_some()
            && self.left_ear.is_some()
            && self.right_ear.is_some()
            && self.nose_base.is_some()
    }
}
