//! Gaze classification from resolved landmarks and pupils.
//!
//! Two independent computations per face: the forward-gaze decision (a
//! horizontal plus vertical symmetry test with inclusive pixel
//! tolerances) and a coarse eight-way direction bucket per eye, kept for
//! diagnostics and a future directional overlay. Only the forward-gaze
//! decision gates the frame count.

use serde::{Deserialize, Serialize};

use crate::constants::DIRECTION_SECTOR_DEGREES;
use crate::face::FaceObservation;
use crate::geometry::{
    angle_degrees, horizontal_distance, normalize_degrees, vertical_distance, Point2D,
};

/// Coarse gaze direction: eight contiguous 45° sectors over `[0, 360)`,
/// inclusive on the low boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// `[0, 45)`
    TopRightLow,
    /// `[45, 90)`
    TopRightHigh,
    /// `[90, 135)`
    TopLeftHigh,
    /// `[135, 180)`
    TopLeftLow,
    /// `[180, 225)`
    BottomLeftHigh,
    /// `[225, 270)`
    BottomLeftLow,
    /// `[270, 315)`
    BottomRightLow,
    /// `[315, 360)`
    BottomRightHigh,
}

const SECTORS: [Direction; 8] = [
    Direction::TopRightLow,
    Direction::TopRightHigh,
    Direction::TopLeftHigh,
    Direction::TopLeftLow,
    Direction::BottomLeftHigh,
    Direction::BottomLeftLow,
    Direction::BottomRightLow,
    Direction::BottomRightHigh,
];

impl Direction {
    /// Bucket an angle in degrees (any range, normalized internally)
    #[must_use]
    pub fn from_angle(degrees: f64) -> Self {
        let normalized = normalize_degrees(degrees);
        let index = (normalized / DIRECTION_SECTOR_DEGREES) as usize;
        // normalize_degrees never returns 360.0, but guard the index anyway
        SECTORS[index.min(SECTORS.len() - 1)]
    }
}

/// Per-face classification output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GazeResult {
    /// Whether the face is oriented toward the camera
    pub facing_camera: bool,

    /// Direction bucket of the left pupil relative to the left eye cavity
    pub left_direction: Option<Direction>,

    /// Direction bucket of the right pupil relative to the right eye cavity
    pub right_direction: Option<Direction>,
}

/// Forward-gaze classifier with fixed pixel tolerances.
///
/// The tolerances are tied to a specific capture resolution and absorb
/// landmark and pupil-localization noise; both comparisons are inclusive
/// on the boundary.
#[derive(Debug, Clone)]
pub struct GazeClassifier {
    horizontal_tolerance: f64,
    vertical_tolerance: f64,
}

impl GazeClassifier {
    #[must_use]
    pub const fn new(horizontal_tolerance: f64, vertical_tolerance: f64) -> Self {
        Self {
            horizontal_tolerance,
            vertical_tolerance,
        }
    }

    /// Classify one face given its resolved pupil positions.
    ///
    /// A face looking straight at the camera has pupils roughly
    /// equidistant from the nose and roughly level with the eye cavity
    /// centers; asymmetry on either axis indicates a lateral or vertical
    /// gaze shift. Landmark-to-pupil distances are compared by magnitude:
    /// the pupils sit on opposite sides of the nose, so the signed values
    /// would never cancel. If the nose or either eye landmark is absent
    /// the face cannot be facing the camera, and any direction still
    /// computable from the available landmarks is reported.
    #[must_use]
    pub fn classify(
        &self,
        face: &FaceObservation,
        left_pupil: Point2D,
        right_pupil: Point2D,
    ) -> GazeResult {
        let left_direction = face
            .left_eye
            .map(|eye| Direction::from_angle(angle_degrees(eye, left_pupil)));
        let right_direction = face
            .right_eye
            .map(|eye| Direction::from_angle(angle_degrees(eye, right_pupil)));

        let (Some(left_eye), Some(right_eye), Some(nose)) =
            (face.left_eye, face.right_eye, face.nose_base)
        else {
            return GazeResult {
                facing_camera: false,
                left_direction,
                right_direction,
            };
        };

        let h_left = horizontal_distance(nose, left_pupil).abs();
        let h_right = horizontal_distance(nose, right_pupil).abs();
        let v_left = vertical_distance(left_eye, left_pupil).abs();
        let v_right = vertical_distance(right_eye, right_pupil).abs();

        let h_diff = (h_right - h_left).abs();
        let v_diff = (v_right - v_left).abs();

        GazeResult {
            facing_camera: h_diff <= self.horizontal_tolerance
                && v_diff <= self.vertical_tolerance,
            left_direction,
            right_direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_HORIZONTAL_TOLERANCE, DEFAULT_VERTICAL_TOLERANCE};
    use crate::face::FaceRect;

    fn classifier() -> GazeClassifier {
        GazeClassifier::new(DEFAULT_HORIZONTAL_TOLERANCE, DEFAULT_VERTICAL_TOLERANCE)
    }

    fn face() -> FaceObservation {
        FaceObservation {
            bounding_box: FaceRect::new(100, 100, 300, 340),
            left_eye: Some(Point2D::new(150.0, 180.0)),
            right_eye: Some(Point2D::new(250.0, 180.0)),
            left_ear: Some(Point2D::new(110.0, 200.0)),
            right_ear: Some(Point2D::new(290.0, 200.0)),
            nose_base: Some(Point2D::new(200.0, 230.0)),
            left_eye_open_prob: Some(0.98),
            right_eye_open_prob: Some(0.98),
        }
    }

    #[test]
    fn test_symmetric_pupils_face_camera() {
        // Pupils equidistant from the nose (50px each side) and level
        // with the eye cavities: h_diff = 0, v_diff = 0.
        let result = classifier().classify(
            &face(),
            Point2D::new(150.0, 180.0),
            Point2D::new(250.0, 180.0),
        );
        assert!(result.facing_camera);
    }

    #[test]
    fn test_lateral_gaze_rejected() {
        // Both pupils shifted 20px toward the viewer's right: one moves
        // closer to the nose, the other further, so h_diff = 40.
        let result = classifier().classify(
            &face(),
            Point2D::new(170.0, 180.0),
            Point2D::new(270.0, 180.0),
        );
        assert!(!result.facing_camera);
    }

    #[test]
    fn test_boundary_inclusive() {
        // v_diff = 0; h_diff exactly equal to the tolerance.
        let result = classifier().classify(
            &face(),
            Point2D::new(150.0 - DEFAULT_HORIZONTAL_TOLERANCE, 180.0),
            Point2D::new(250.0, 180.0),
        );
        assert!(result.facing_camera);

        let result = classifier().classify(
            &face(),
            Point2D::new(150.0 - DEFAULT_HORIZONTAL_TOLERANCE - 0.001, 180.0),
            Point2D::new(250.0, 180.0),
        );
        assert!(!result.facing_camera);
    }

    #[test]
    fn test_vertical_asymmetry_rejected() {
        let result = classifier().classify(
            &face(),
            Point2D::new(150.0, 180.0),
            Point2D::new(250.0, 180.0 + DEFAULT_VERTICAL_TOLERANCE + 0.5),
        );
        assert!(!result.facing_camera);
    }

    #[test]
    fn test_classify_idempotent() {
        let left = Point2D::new(153.0, 181.0);
        let right = Point2D::new(247.0, 182.0);
        let first = classifier().classify(&face(), left, right);
        let second = classifier().classify(&face(), left, right);
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_nose_never_faces_camera() {
        let mut face = face();
        face.nose_base = None;
        let result = classifier().classify(
            &face,
            Point2D::new(150.0, 180.0),
            Point2D::new(250.0, 180.0),
        );
        assert!(!result.facing_camera);
        // Directions are still computable from the eye landmarks.
        assert!(result.left_direction.is_some());
        assert!(result.right_direction.is_some());
    }

    #[test]
    fn test_directions_reported_for_facing_face() {
        let result = classifier().classify(
            &face(),
            Point2D::new(153.0, 181.0),
            Point2D::new(253.0, 181.0),
        );
        // Pupils slightly down-right of the eye centers: ~18°, first sector.
        assert_eq!(result.left_direction, Some(Direction::TopRightLow));
        assert_eq!(result.right_direction, Some(Direction::TopRightLow));
    }

    #[test]
    fn test_direction_buckets_cover_full_circle() {
        let angles = [
            (0.0, Direction::TopRightLow),
            (44.99, Direction::TopRightLow),
            (45.0, Direction::TopRightHigh),
            (89.99, Direction::TopRightHigh),
            (90.0, Direction::TopLeftHigh),
            (134.99, Direction::TopLeftHigh),
            (135.0, Direction::TopLeftLow),
            (179.99, Direction::TopLeftLow),
            (180.0, Direction::BottomLeftHigh),
            (224.99, Direction::BottomLeftHigh),
            (225.0, Direction::BottomLeftLow),
            (269.99, Direction::BottomLeftLow),
            (270.0, Direction::BottomRightLow),
            (314.99, Direction::BottomRightLow),
            (315.0, Direction::BottomRightHigh),
            (359.99, Direction::BottomRightHigh),
        ];
        for (angle, expected) in angles {
            assert_eq!(Direction::from_angle(angle), expected, "angle {angle}");
        }
    }

    #[test]
    fn test_direction_negative_angles_normalized() {
        assert_eq!(Direction::from_angle(-45.0), Direction::BottomRightHigh);
        assert_eq!(Direction::from_angle(-90.0), Direction::BottomRightLow);
        assert_eq!(Direction::from_angle(360.0), Direction::TopRightLow);
        assert_eq!(Direction::from_angle(405.0), Direction::TopRightHigh);
    }
}
