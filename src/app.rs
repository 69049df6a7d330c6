//! Main application module for gaze detection.

use crate::{
    aggregator::{should_capture, FrameSummary, GazeAggregator},
    config::Config,
    error::{Error, Result},
    face::FaceObservation,
    frame::ensure_grey,
    metrics::{GazeMetrics, MetricsSnapshot},
};
use log::{debug, info, warn};
use opencv::{
    core::Mat,
    imgcodecs::{self, IMREAD_GRAYSCALE},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Application configuration assembled from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the frame image (loaded as grayscale)
    pub frame_path: PathBuf,
    /// Path to the JSON file holding the frame's face observations
    pub faces_path: PathBuf,
    /// Optional path to write the JSON frame report to
    pub output_path: Option<PathBuf>,
    /// Pipeline configuration
    pub config: Config,
}

/// JSON report emitted for one processed frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameReport {
    /// Number of faces handed to the pipeline
    pub faces_total: usize,
    /// Number of faces looking toward the camera
    pub faces_looking: usize,
    /// Whether the frame qualifies for an automatic capture
    pub capture: bool,
    /// Per-face outcomes in input order
    pub summary: FrameSummary,
    /// Counter snapshot after the frame
    pub metrics: MetricsSnapshot,
}

/// Single-frame gaze detection application
pub struct GazeApp {
    config: AppConfig,
    aggregator: GazeAggregator,
    metrics: Arc<GazeMetrics>,
}

impl GazeApp {
    /// Create a new gaze detection application
    pub fn new(config: AppConfig) -> Result<Self> {
        info!("Initializing gaze detection application");
        config.config.validate()?;

        let metrics = Arc::new(GazeMetrics::new());
        let aggregator = GazeAggregator::from_config(&config.config, Arc::clone(&metrics))?;
        info!(
            "Pupil localizer strategy: {}",
            config.config.localizer.strategy
        );

        Ok(Self {
            config,
            aggregator,
            metrics,
        })
    }

    /// Load the frame, run the pipeline and produce the frame report
    pub fn run(&mut self) -> Result<FrameReport> {
        let frame = load_grey_frame(&self.config.frame_path)?;
        let faces = load_faces(&self.config.faces_path)?;
        info!(
            "Loaded {}x{} frame with {} face observation(s)",
            frame.cols(),
            frame.rows(),
            faces.len()
        );

        let desired = self.config.config.pipeline.desired_subjects;
        let summary = if faces.len() < desired {
            // Not enough subjects in frame; skip the per-face work entirely
            // but still account for the frame.
            debug!(
                "{} face(s) in frame, {} desired; pipeline not run",
                faces.len(),
                desired
            );
            self.metrics.record_frame();
            FrameSummary {
                looking: 0,
                outcomes: Vec::new(),
            }
        } else {
            self.aggregator.count_looking_faces(&faces, &frame)?
        };

        let capture = should_capture(summary.looking, faces.len(), desired);
        if capture {
            info!(
                "All {} face(s) looking toward camera, frame qualifies for capture",
                faces.len()
            );
        } else {
            debug!(
                "{} of {} face(s) looking, no capture",
                summary.looking,
                faces.len()
            );
        }

        let report = FrameReport {
            faces_total: faces.len(),
            faces_looking: summary.looking,
            capture,
            summary,
            metrics: self.metrics.snapshot(),
        };

        if let Some(output_path) = &self.config.output_path {
            write_report(output_path, &report)?;
            info!("Frame report written to {}", output_path.display());
        }

        Ok(report)
    }
}

/// Load an image file as a single-channel grayscale frame
pub fn load_grey_frame(path: &Path) -> Result<Mat> {
    let path_str = path
        .to_str()
        .ok_or_else(|| Error::InvalidInput(format!("non-UTF-8 frame path: {path:?}")))?;
    let frame = imgcodecs::imread(path_str, IMREAD_GRAYSCALE)?;
    if frame.empty() {
        return Err(Error::InvalidInput(format!(
            "failed to read frame image: {}",
            path.display()
        )));
    }
    ensure_grey(&frame)?;
    Ok(frame)
}

/// Load face observations from a JSON file
pub fn load_faces(path: &Path) -> Result<Vec<FaceObservation>> {
    let contents = fs::read_to_string(path)?;
    let faces: Vec<FaceObservation> = serde_json::from_str(&contents)?;
    if faces.is_empty() {
        warn!("Face observation file {} is empty", path.display());
    }
    Ok(faces)
}

fn write_report(path: &Path, report: &FrameReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}
