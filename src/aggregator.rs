//! Frame-level gaze aggregation.
//!
//! Iterates all faces detected in one frame, applies eligibility gating,
//! runs localization, association and classification, and produces the
//! frame's count of faces looking toward the camera. Every face is
//! evaluated independently: an ineligible face is skipped, never aborts
//! the rest of the frame. Processing is synchronous and the aggregator
//! is not reentrant; the capture layer is expected to drop frames that
//! arrive while one is still being processed.

use std::sync::Arc;

use opencv::core::Mat;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::face::FaceObservation;
use crate::frame;
use crate::gaze_classifier::{GazeClassifier, GazeResult};
use crate::geometry::Point2D;
use crate::metrics::GazeMetrics;
use crate::pupil_associator::isolate;
use crate::pupil_localizer::{create_localizer, PupilLocalizer};
use crate::Result;

/// Why a face was excluded from the frame count.
///
/// Exclusion is the expected steady-state outcome for faces with closed
/// eyes, extreme poses or poor lighting; it is not an error and is not
/// logged as one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// An eye-open probability was absent or below the threshold
    EyesNotOpen,
    /// A required landmark was absent
    MissingLandmarks,
    /// The face bounding box lies outside the frame
    RegionOutOfFrame,
    /// The localizer proposed no pupil candidates
    NoCandidates,
    /// No candidate could be resolved for one of the sides
    AssociationFailed,
}

/// Outcome of evaluating one face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceOutcome {
    Skipped(SkipReason),
    Classified(GazeResult),
}

/// Frame-level result: the looking-faces count plus per-face outcomes
/// in input order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSummary {
    pub looking: usize,
    pub outcomes: Vec<FaceOutcome>,
}

/// Auto-capture trigger: every detected face is looking toward the
/// camera and at least the desired number of subjects is in frame.
#[must_use]
pub fn should_capture(looking: usize, total: usize, desired_subjects: usize) -> bool {
    total >= desired_subjects && looking == total
}

/// Per-frame gaze aggregator
pub struct GazeAggregator {
    localizer: Box<dyn PupilLocalizer>,
    classifier: GazeClassifier,
    eye_open_threshold: f32,
    association_epsilon: f64,
    metrics: Arc<GazeMetrics>,
}

impl GazeAggregator {
    #[must_use]
    pub fn new(
        localizer: Box<dyn PupilLocalizer>,
        classifier: GazeClassifier,
        eye_open_threshold: f32,
        association_epsilon: f64,
        metrics: Arc<GazeMetrics>,
    ) -> Self {
        Self {
            localizer,
            classifier,
            eye_open_threshold,
            association_epsilon,
            metrics,
        }
    }

    /// Build an aggregator from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configured localizer cannot be constructed.
    pub fn from_config(config: &Config, metrics: Arc<GazeMetrics>) -> Result<Self> {
        let localizer = create_localizer(&config.localizer)?;
        let classifier = GazeClassifier::new(
            config.pipeline.horizontal_tolerance,
            config.pipeline.vertical_tolerance,
        );
        Ok(Self::new(
            localizer,
            classifier,
            config.pipeline.eye_open_threshold,
            config.pipeline.association_epsilon,
            metrics,
        ))
    }

    /// Count the faces in a frame that are looking toward the camera.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::FrameFormat`] if the frame is not a
    /// single-channel 8-bit luma plane (a caller-side precondition
    /// violation), or an error if an `OpenCV` operation fails.
    pub fn count_looking_faces(
        &mut self,
        faces: &[FaceObservation],
        grey_frame: &Mat,
    ) -> Result<FrameSummary> {
        frame::ensure_grey(grey_frame)?;
        self.metrics.record_frame();

        let mut looking = 0;
        let mut outcomes = Vec::with_capacity(faces.len());

        for face in faces {
            self.metrics.record_face();
            let outcome = self.evaluate_face(face, grey_frame)?;

            if let FaceOutcome::Classified(result) = outcome {
                if result.facing_camera {
                    looking += 1;
                    self.metrics.record_looking_face();
                }
            }
            outcomes.push(outcome);
        }

        log::debug!("{looking} of {} face(s) looking toward camera", faces.len());
        Ok(FrameSummary { looking, outcomes })
    }

    fn evaluate_face(&mut self, face: &FaceObservation, grey_frame: &Mat) -> Result<FaceOutcome> {
        let eyes_open = match (face.left_eye_open_prob, face.right_eye_open_prob) {
            (Some(left), Some(right)) => {
                left >= self.eye_open_threshold && right >= self.eye_open_threshold
            }
            _ => false,
        };
        if !eyes_open {
            self.metrics.record_eyes_closed_skip();
            return Ok(FaceOutcome::Skipped(SkipReason::EyesNotOpen));
        }

        let (Some(left_ear), Some(right_ear), Some(nose)) =
            (face.left_ear, face.right_ear, face.nose_base)
        else {
            self.metrics.record_landmark_skip();
            return Ok(FaceOutcome::Skipped(SkipReason::MissingLandmarks));
        };
        if !face.has_required_landmarks() {
            self.metrics.record_landmark_skip();
            return Ok(FaceOutcome::Skipped(SkipReason::MissingLandmarks));
        }

        let Some((region, offset)) = frame::face_region(grey_frame, &face.bounding_box)? else {
            self.metrics.record_landmark_skip();
            return Ok(FaceOutcome::Skipped(SkipReason::RegionOutOfFrame));
        };

        // Candidates arrive in face-region coordinates; translate to
        // image coordinates before comparing against landmarks.
        let mut candidates: Vec<Point2D> = self
            .localizer
            .locate(&region)?
            .into_iter()
            .map(|candidate| {
                Point2D::new(
                    candidate.position.x + f64::from(offset.x),
                    candidate.position.y + f64::from(offset.y),
                )
            })
            .collect();

        if candidates.is_empty() {
            self.metrics.record_association_skip();
            return Ok(FaceOutcome::Skipped(SkipReason::NoCandidates));
        }

        let left_pupil = isolate(&mut candidates, left_ear, nose, self.association_epsilon);
        let right_pupil = isolate(&mut candidates, nose, right_ear, self.association_epsilon);

        let (Some(left_pupil), Some(right_pupil)) = (left_pupil, right_pupil) else {
            self.metrics.record_association_skip();
            return Ok(FaceOutcome::Skipped(SkipReason::AssociationFailed));
        };

        Ok(FaceOutcome::Classified(self.classifier.classify(
            face,
            left_pupil,
            right_pupil,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_capture_all_looking() {
        assert!(should_capture(2, 2, 1));
        assert!(should_capture(3, 3, 3));
    }

    #[test]
    fn test_should_capture_not_enough_subjects() {
        assert!(!should_capture(1, 1, 2));
    }

    #[test]
    fn test_should_capture_someone_looking_away() {
        assert!(!should_capture(1, 2, 1));
    }

    #[test]
    fn test_should_capture_empty_frame() {
        // desired_subjects >= 1 by configuration, so an empty frame
        // never triggers a capture.
        assert!(!should_capture(0, 0, 1));
    }
}
