//! Configuration management for the gaze detection pipeline

use crate::constants::{
    DEFAULT_ASSOCIATION_EPSILON, DEFAULT_BLOB_BLOCK_SIZE, DEFAULT_BLOB_MIN_CIRCULARITY,
    DEFAULT_BLOB_MORPH_KSIZE, DEFAULT_BLOB_THRESHOLD_OFFSET, DEFAULT_HORIZONTAL_TOLERANCE,
    DEFAULT_HOUGH_ACCUMULATOR_THRESHOLD, DEFAULT_HOUGH_CANNY_THRESHOLD, DEFAULT_HOUGH_DP,
    DEFAULT_HOUGH_MAX_RADIUS, DEFAULT_HOUGH_MIN_DIST_DIVISOR, DEFAULT_HOUGH_MIN_RADIUS,
    DEFAULT_MEDIAN_BLUR_KSIZE, DEFAULT_VERTICAL_TOLERANCE, EYE_OPEN_PROBABILITY_THRESHOLD,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gaze pipeline thresholds
    pub pipeline: PipelineConfig,

    /// Pupil localizer selection and parameters
    pub localizer: LocalizerConfig,
}

/// Gaze pipeline thresholds.
///
/// The pixel tolerances are tied to the capture resolution they were
/// tuned for (1920x1080) and must be re-derived if it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum nose-to-pupil horizontal asymmetry in pixels
    pub horizontal_tolerance: f64,

    /// Maximum eye-to-pupil vertical asymmetry in pixels
    pub vertical_tolerance: f64,

    /// Pixel tolerance for the association colinearity test
    pub association_epsilon: f64,

    /// Minimum eye-open probability for a face to be evaluated (0.0-1.0)
    pub eye_open_threshold: f32,

    /// Number of subjects that must be in frame before the pipeline runs
    pub desired_subjects: usize,
}

/// Pupil localizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizerConfig {
    /// Strategy name: `darkest_point`, `blob` or `hough`
    pub strategy: String,

    /// Path to the eye cascade classifier file
    pub eye_cascade: PathBuf,

    /// Hough strategy parameters
    pub hough: HoughConfig,

    /// Blob strategy parameters
    pub blob: BlobConfig,
}

/// Hough circle detection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughConfig {
    /// Inverse accumulator resolution ratio
    pub dp: f64,

    /// Region height divided by this gives the minimum circle spacing
    pub min_dist_divisor: f64,

    /// Upper Canny edge threshold
    pub canny_threshold: f64,

    /// Accumulator vote threshold
    pub accumulator_threshold: f64,

    /// Minimum pupil radius in pixels
    pub min_radius: i32,

    /// Maximum pupil radius in pixels
    pub max_radius: i32,

    /// Median blur kernel size applied before detection (odd)
    pub median_blur_ksize: i32,
}

/// Blob detection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobConfig {
    /// Adaptive threshold neighborhood size (odd, > 1)
    pub block_size: i32,

    /// Constant subtracted from the adaptive threshold mean
    pub threshold_offset: f64,

    /// Erosion/dilation kernel size
    pub morph_ksize: i32,

    /// Median blur kernel size applied after morphology (odd)
    pub median_blur_ksize: i32,

    /// Minimum blob circularity (0.0-1.0)
    pub min_circularity: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            localizer: LocalizerConfig::default(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            horizontal_tolerance: DEFAULT_HORIZONTAL_TOLERANCE,
            vertical_tolerance: DEFAULT_VERTICAL_TOLERANCE,
            association_epsilon: DEFAULT_ASSOCIATION_EPSILON,
            eye_open_threshold: EYE_OPEN_PROBABILITY_THRESHOLD,
            desired_subjects: 1,
        }
    }
}

impl Default for LocalizerConfig {
    fn default() -> Self {
        Self {
            strategy: "darkest_point".to_string(),
            eye_cascade: PathBuf::from("assets/haarcascade_eye.xml"),
            hough: HoughConfig::default(),
            blob: BlobConfig::default(),
        }
    }
}

impl Default for HoughConfig {
    fn default() -> Self {
        Self {
            dp: DEFAULT_HOUGH_DP,
            min_dist_divisor: DEFAULT_HOUGH_MIN_DIST_DIVISOR,
            canny_threshold: DEFAULT_HOUGH_CANNY_THRESHOLD,
            accumulator_threshold: DEFAULT_HOUGH_ACCUMULATOR_THRESHOLD,
            min_radius: DEFAULT_HOUGH_MIN_RADIUS,
            max_radius: DEFAULT_HOUGH_MAX_RADIUS,
            median_blur_ksize: DEFAULT_MEDIAN_BLUR_KSIZE,
        }
    }
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOB_BLOCK_SIZE,
            threshold_offset: DEFAULT_BLOB_THRESHOLD_OFFSET,
            morph_ksize: DEFAULT_BLOB_MORPH_KSIZE,
            median_blur_ksize: DEFAULT_MEDIAN_BLUR_KSIZE,
            min_circularity: DEFAULT_BLOB_MIN_CIRCULARITY,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns a [`Error::ConfigError`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.horizontal_tolerance < 0.0 || self.pipeline.vertical_tolerance < 0.0 {
            return Err(Error::ConfigError(
                "Tolerances must be non-negative".to_string(),
            ));
        }
        if self.pipeline.association_epsilon <= 0.0 {
            return Err(Error::ConfigError(
                "Association epsilon must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.pipeline.eye_open_threshold) {
            return Err(Error::ConfigError(
                "Eye open threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.pipeline.desired_subjects == 0 {
            return Err(Error::ConfigError(
                "Desired subjects must be at least 1".to_string(),
            ));
        }

        match self.localizer.strategy.to_lowercase().as_str() {
            "darkest_point" | "darkestpoint" | "blob" => {
                if !self.localizer.eye_cascade.exists() {
                    return Err(Error::ConfigError(format!(
                        "Eye cascade file not found: {}",
                        self.localizer.eye_cascade.display()
                    )));
                }
            }
            "hough" => {}
            other => {
                return Err(Error::ConfigError(format!(
                    "Unknown localizer strategy: {other}"
                )));
            }
        }

        if self.localizer.hough.min_radius < 0
            || self.localizer.hough.max_radius <= self.localizer.hough.min_radius
        {
            return Err(Error::ConfigError(
                "Hough radius range must satisfy 0 <= min < max".to_string(),
            ));
        }
        if self.localizer.hough.median_blur_ksize < 3
            || self.localizer.hough.median_blur_ksize % 2 == 0
        {
            return Err(Error::ConfigError(
                "Median blur kernel size must be odd and at least 3".to_string(),
            ));
        }
        if self.localizer.blob.block_size < 3 || self.localizer.blob.block_size % 2 == 0 {
            return Err(Error::ConfigError(
                "Blob block size must be odd and at least 3".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.localizer.blob.min_circularity) {
            return Err(Error::ConfigError(
                "Blob circularity must be between 0.0 and 1.0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Gaze Detection Configuration

# Pipeline thresholds (pixel tolerances tuned for 1920x1080 capture)
pipeline:
  horizontal_tolerance: 10.0
  vertical_tolerance: 10.0
  association_epsilon: 1.5
  eye_open_threshold: 0.9
  desired_subjects: 1

# Pupil localizer (darkest_point, blob, hough)
localizer:
  strategy: "darkest_point"
  eye_cascade: "assets/haarcascade_eye.xml"
  hough:
    dp: 1.0
    min_dist_divisor: 16.0
    canny_threshold: 100.0
    accumulator_threshold: 30.0
    min_radius: 1
    max_radius: 30
    median_blur_ksize: 5
  blob:
    block_size: 11
    threshold_offset: 2.0
    morph_ksize: 3
    median_blur_ksize: 5
    min_circularity: 0.7
"#;
