//! Tests for configuration file handling and the JSON frame report

use gaze_detection::{
    aggregator::{FaceOutcome, FrameSummary, SkipReason},
    app::FrameReport,
    config::Config,
    face::FaceObservation,
    gaze_classifier::{Direction, GazeResult},
    metrics::GazeMetrics,
};
use std::fs;
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("gaze_detection_{name}"))
}

#[test]
fn test_config_file_round_trip() {
    let path = temp_path("roundtrip.yaml");
    let mut config = Config::default();
    config.pipeline.desired_subjects = 3;
    config.localizer.strategy = "hough".to_string();

    config.to_file(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(loaded.pipeline.desired_subjects, 3);
    assert_eq!(loaded.localizer.strategy, "hough");
    assert_eq!(
        loaded.pipeline.association_epsilon,
        config.pipeline.association_epsilon
    );
}

#[test]
fn test_config_missing_file() {
    assert!(Config::from_file("/nonexistent/gaze.yaml").is_err());
}

#[test]
fn test_partial_config_file_uses_defaults() {
    let path = temp_path("partial.yaml");
    fs::write(&path, "pipeline:\n  desired_subjects: 4\n").unwrap();

    let loaded = Config::from_file(&path).unwrap();
    fs::remove_file(&path).unwrap();

    let defaults = Config::default();
    assert_eq!(loaded.pipeline.desired_subjects, 4);
    assert_eq!(
        loaded.pipeline.eye_open_threshold,
        defaults.pipeline.eye_open_threshold
    );
    assert_eq!(loaded.localizer.strategy, defaults.localizer.strategy);
}

#[test]
fn test_face_observations_parse_from_detector_payload() {
    // Shape of the payload the upstream landmark detector emits: one
    // entry per face, absent landmarks as nulls.
    let json = r#"[
        {
            "bounding_box": {"left": 412, "top": 233, "right": 804, "bottom": 701},
            "left_eye": {"x": 512.4, "y": 388.1},
            "right_eye": {"x": 701.9, "y": 392.6},
            "left_ear": {"x": 431.0, "y": 455.2},
            "right_ear": {"x": 789.5, "y": 460.8},
            "nose_base": {"x": 606.3, "y": 501.0},
            "left_eye_open_prob": 0.993,
            "right_eye_open_prob": 0.987
        },
        {
            "bounding_box": {"left": 1100, "top": 300, "right": 1400, "bottom": 660},
            "left_eye": null,
            "right_eye": {"x": 1302.0, "y": 410.0},
            "left_ear": null,
            "right_ear": {"x": 1388.0, "y": 470.0},
            "nose_base": {"x": 1250.0, "y": 505.0},
            "left_eye_open_prob": null,
            "right_eye_open_prob": 0.95
        }
    ]"#;

    let faces: Vec<FaceObservation> = serde_json::from_str(json).unwrap();
    assert_eq!(faces.len(), 2);
    assert!(faces[0].has_required_landmarks());
    assert!(!faces[1].has_required_landmarks());
    assert!(faces[1].left_eye_open_prob.is_none());
}

#[test]
fn test_frame_report_json_round_trip() {
    let metrics = GazeMetrics::new();
    metrics.record_frame();
    metrics.record_face();
    metrics.record_face();
    metrics.record_looking_face();
    metrics.record_eyes_closed_skip();

    let report = FrameReport {
        faces_total: 2,
        faces_looking: 1,
        capture: false,
        summary: FrameSummary {
            looking: 1,
            outcomes: vec![
                FaceOutcome::Classified(GazeResult {
                    facing_camera: true,
                    left_direction: Some(Direction::TopRightLow),
                    right_direction: Some(Direction::TopLeftLow),
                }),
                FaceOutcome::Skipped(SkipReason::EyesNotOpen),
            ],
        },
        metrics: metrics.snapshot(),
    };

    let json = serde_json::to_string_pretty(&report).unwrap();
    let back: FrameReport = serde_json::from_str(&json).unwrap();

    assert_eq!(back.faces_total, 2);
    assert_eq!(back.faces_looking, 1);
    assert!(!back.capture);
    assert_eq!(back.summary.outcomes.len(), 2);
    assert_eq!(back.metrics.faces_skipped_eyes_closed, 1);
}
