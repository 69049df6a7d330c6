//! Constants used throughout the application

/// Reference capture resolution for the pixel tolerances below.
/// The tolerances must be re-derived if the capture resolution changes.
pub const REFERENCE_PIXEL_COUNT_HORIZONTAL: i32 = 1920;
pub const REFERENCE_PIXEL_COUNT_VERTICAL: i32 = 1080;

/// Maximum allowed difference between the nose-to-pupil horizontal
/// distances before a face is no longer considered facing the camera
pub const DEFAULT_HORIZONTAL_TOLERANCE: f64 = 10.0;

/// Maximum allowed difference between the eye-to-pupil vertical
/// distances before a face is no longer considered facing the camera
pub const DEFAULT_VERTICAL_TOLERANCE: f64 = 10.0;

/// Pixel tolerance for the colinearity test in pupil association
pub const DEFAULT_ASSOCIATION_EPSILON: f64 = 1.5;

/// Minimum eye-open probability for a face to be eligible for gaze evaluation
pub const EYE_OPEN_PROBABILITY_THRESHOLD: f32 = 0.9;

/// Width of one gaze direction sector
pub const DIRECTION_SECTOR_DEGREES: f64 = 45.0;

/// Full circle in degrees
pub const DEGREES_FULL_CIRCLE: f64 = 360.0;

/// Eye cascade detection parameters
pub const DEFAULT_CASCADE_SCALE_FACTOR: f64 = 1.1;
pub const DEFAULT_CASCADE_MIN_NEIGHBORS: i32 = 3;

/// Hough circle detection parameters (pupil radius range in pixels)
pub const DEFAULT_HOUGH_DP: f64 = 1.0;
pub const DEFAULT_HOUGH_MIN_DIST_DIVISOR: f64 = 16.0;
pub const DEFAULT_HOUGH_CANNY_THRESHOLD: f64 = 100.0;
pub const DEFAULT_HOUGH_ACCUMULATOR_THRESHOLD: f64 = 30.0;
pub const DEFAULT_HOUGH_MIN_RADIUS: i32 = 1;
pub const DEFAULT_HOUGH_MAX_RADIUS: i32 = 30;

/// Median blur kernel size used before circle and blob detection
pub const DEFAULT_MEDIAN_BLUR_KSIZE: i32 = 5;

/// Blob detection parameters
pub const DEFAULT_BLOB_BLOCK_SIZE: i32 = 11;
pub const DEFAULT_BLOB_THRESHOLD_OFFSET: f64 = 2.0;
pub const DEFAULT_BLOB_MORPH_KSIZE: i32 = 3;
pub const DEFAULT_BLOB_MIN_CIRCULARITY: f32 = 0.7;
