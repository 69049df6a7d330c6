//! Gaze detection library for counting camera-facing faces in a frame.
//!
//! This library provides a Rust implementation of a per-frame gaze
//! detection pipeline using:
//! - `OpenCV` for pupil localization in grayscale face regions
//! - Externally supplied face observations (bounding boxes, landmarks
//!   and eye-open probabilities from an upstream face detector)
//! - Geometric association and classification over landmark distances
//!
//! The pipeline consists of:
//! 1. Pupil localization to propose candidate pupil positions per face
//! 2. Pupil-to-eye association using ear and nose landmark anchors
//! 3. Gaze classification via a horizontal and vertical symmetry test
//! 4. Frame aggregation into a looking-faces count and capture decision
//!
//! # Examples
//!
//! ```no_run
//! use gaze_detection::aggregator::{should_capture, GazeAggregator};
//! use gaze_detection::config::Config;
//! use gaze_detection::face::FaceObservation;
//! use gaze_detection::metrics::GazeMetrics;
//! use opencv::{core::Mat, imgcodecs, prelude::*};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Build the pipeline from configuration
//! let config = Config::default();
//! let metrics = Arc::new(GazeMetrics::new());
//! let mut aggregator = GazeAggregator::from_config(&config, Arc::clone(&metrics))?;
//!
//! // Load a grayscale frame and its face observations
//! let frame = imgcodecs::imread("frame.png", imgcodecs::IMREAD_GRAYSCALE)?;
//! let faces: Vec<FaceObservation> =
//!     serde_json::from_str(&std::fs::read_to_string("faces.json")?)?;
//!
//! // Count the faces looking toward the camera
//! let summary = aggregator.count_looking_faces(&faces, &frame)?;
//! println!("{} of {} face(s) looking", summary.looking, faces.len());
//!
//! if should_capture(summary.looking, faces.len(), config.pipeline.desired_subjects) {
//!     println!("Capture!");
//! }
//! # Ok(())
//! # }
//! ```

/// Geometric primitives and landmark distance helpers
pub mod geometry;

/// Face observations supplied by the upstream detector
pub mod face;

/// Frame buffer validation and face region extraction
pub mod frame;

/// Pupil localization strategies over grayscale face regions
pub mod pupil_localizer;

/// Pupil-to-eye association via landmark anchors
pub mod pupil_associator;

/// Forward-gaze classification and direction bucketing
pub mod gaze_classifier;

/// Frame-level aggregation and the auto-capture decision
pub mod aggregator;

/// Pipeline counters
pub mod metrics;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
