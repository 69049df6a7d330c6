//! Pupil localization strategies.
//!
//! Each strategy proposes candidate pupil positions inside a greyscale
//! face region. The darkest-point strategy is the production default;
//! the Hough-circle and blob strategies are retained for comparison,
//! having proven noisier in practice (more false positives and more
//! missed detections). Candidates are returned in face-region
//! coordinates and may number more than two per face; filtering noisy
//! candidates is the associator's job, not the localizer's.

use std::path::Path;

use opencv::core::{min_max_loc, no_array, Mat, Point, Rect, Size, Vec3f, Vector};
use opencv::features2d::{SimpleBlobDetector, SimpleBlobDetector_Params};
use opencv::imgproc;
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;

use crate::config::{BlobConfig, HoughConfig, LocalizerConfig};
use crate::constants::{DEFAULT_CASCADE_MIN_NEIGHBORS, DEFAULT_CASCADE_SCALE_FACTOR};
use crate::geometry::Point2D;
use crate::{Error, Result};

/// Unverified pixel coordinate proposed as a pupil location, in
/// face-region coordinates. Ephemeral: never reused across frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PupilCandidate {
    pub position: Point2D,
}

/// Strategy seam for pupil localization
pub trait PupilLocalizer: Send {
    /// Propose candidate pupil positions inside a greyscale face region.
    ///
    /// Zero candidates is a legitimate outcome (eyes not found), not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an error only if an underlying `OpenCV` operation fails.
    fn locate(&mut self, grey_face: &Mat) -> Result<Vec<PupilCandidate>>;

    /// Get strategy name
    fn name(&self) -> &str;
}

/// Create a pupil localizer from configuration
pub fn create_localizer(config: &LocalizerConfig) -> Result<Box<dyn PupilLocalizer>> {
    match config.strategy.to_lowercase().as_str() {
        "darkest_point" | "darkestpoint" => {
            Ok(Box::new(DarkestPointLocalizer::new(&config.eye_cascade)?))
        }
        "blob" => Ok(Box::new(BlobLocalizer::new(
            &config.eye_cascade,
            &config.blob,
        )?)),
        "hough" => Ok(Box::new(HoughLocalizer::new(config.hough.clone()))),
        other => Err(Error::ConfigError(format!(
            "Unknown localizer strategy: {other}"
        ))),
    }
}

/// Load and sanity-check the eye cascade classifier
fn load_eye_cascade<P: AsRef<Path>>(cascade_path: P) -> Result<CascadeClassifier> {
    let path = cascade_path.as_ref();
    log::info!("Loading eye cascade from: {}", path.display());

    let path_str = path
        .to_str()
        .ok_or_else(|| Error::Cascade(format!("Non-UTF-8 cascade path: {}", path.display())))?;
    let cascade = CascadeClassifier::new(path_str)?;
    if cascade.empty()? {
        return Err(Error::Cascade(format!(
            "Failed to load cascade classifier from {}",
            path.display()
        )));
    }
    Ok(cascade)
}

/// Detect eye sub-regions within the top half of a face region.
///
/// Eye detectors commonly fire on nostrils; restricting the search to
/// the top half of the face removes that false-positive source. The
/// returned rectangles are in face-region coordinates.
fn detect_eye_regions(
    cascade: &mut CascadeClassifier,
    grey_face: &Mat,
    scale_factor: f64,
    min_neighbors: i32,
) -> Result<Vec<Rect>> {
    let rows = grey_face.rows();
    let cols = grey_face.cols();
    if rows < 2 || cols < 1 {
        return Ok(Vec::new());
    }

    let top_half = Mat::roi(grey_face, Rect::new(0, 0, cols, rows / 2))?.try_clone()?;
    let mut regions = Vector::<Rect>::new();
    cascade.detect_multi_scale(
        &top_half,
        &mut regions,
        scale_factor,
        min_neighbors,
        0,
        Size::new(0, 0),
        Size::new(0, 0),
    )?;

    Ok(regions.iter().collect())
}

/// Darkest-point pupil localizer (production default).
///
/// Finds eye sub-regions with a cascade classifier, then takes the pixel
/// of minimum intensity in each sub-region as the pupil candidate. The
/// pupil is reliably the darkest structure in a correctly detected eye
/// region.
pub struct DarkestPointLocalizer {
    cascade: CascadeClassifier,
    scale_factor: f64,
    min_neighbors: i32,
}

impl DarkestPointLocalizer {
    /// Create a localizer from an eye cascade classifier file
    ///
    /// # Errors
    ///
    /// Returns an error if the cascade cannot be loaded or is empty.
    pub fn new<P: AsRef<Path>>(cascade_path: P) -> Result<Self> {
        Ok(Self {
            cascade: load_eye_cascade(cascade_path)?,
            scale_factor: DEFAULT_CASCADE_SCALE_FACTOR,
            min_neighbors: DEFAULT_CASCADE_MIN_NEIGHBORS,
        })
    }
}

impl PupilLocalizer for DarkestPointLocalizer {
    fn locate(&mut self, grey_face: &Mat) -> Result<Vec<PupilCandidate>> {
        let regions = detect_eye_regions(
            &mut self.cascade,
            grey_face,
            self.scale_factor,
            self.min_neighbors,
        )?;

        let mut candidates = Vec::with_capacity(regions.len());
        for region in regions {
            let eye = Mat::roi(grey_face, region)?;
            let mut darkest = Point::default();
            min_max_loc(&eye, None, None, Some(&mut darkest), None, &no_array())?;

            // Translate back to face-region coordinates
            candidates.push(PupilCandidate {
                position: Point2D::new(
                    f64::from(region.x + darkest.x),
                    f64::from(region.y + darkest.y),
                ),
            });
        }

        log::debug!("darkest-point: {} candidate(s)", candidates.len());
        Ok(candidates)
    }

    fn name(&self) -> &str {
        "darkest_point"
    }
}

/// Blob-detection pupil localizer (alternate strategy).
///
/// Binarizes each eye sub-region with an adaptive threshold, cleans it
/// up with erosion, dilation and a median blur, then collects the
/// centroids of circularity-filtered dark blobs.
pub struct BlobLocalizer {
    cascade: CascadeClassifier,
    detector: opencv::core::Ptr<SimpleBlobDetector>,
    scale_factor: f64,
    min_neighbors: i32,
    block_size: i32,
    threshold_offset: f64,
    morph_ksize: i32,
    median_blur_ksize: i32,
}

impl BlobLocalizer {
    /// Create a localizer from an eye cascade file and blob parameters
    ///
    /// # Errors
    ///
    /// Returns an error if the cascade cannot be loaded or the blob
    /// detector cannot be constructed.
    pub fn new<P: AsRef<Path>>(cascade_path: P, config: &BlobConfig) -> Result<Self> {
        let mut params = SimpleBlobDetector_Params::default()?;
        params.filter_by_color = true;
        params.blob_color = 0; // pupils are dark blobs
        params.filter_by_circularity = true;
        params.min_circularity = config.min_circularity;

        Ok(Self {
            cascade: load_eye_cascade(cascade_path)?,
            detector: SimpleBlobDetector::create(params)?,
            scale_factor: DEFAULT_CASCADE_SCALE_FACTOR,
            min_neighbors: DEFAULT_CASCADE_MIN_NEIGHBORS,
            block_size: config.block_size,
            threshold_offset: config.threshold_offset,
            morph_ksize: config.morph_ksize,
            median_blur_ksize: config.median_blur_ksize,
        })
    }

    fn binarize(&self, eye: &Mat) -> Result<Mat> {
        let mut binary = Mat::default();
        imgproc::adaptive_threshold(
            eye,
            &mut binary,
            255.0,
            imgproc::ADAPTIVE_THRESH_MEAN_C,
            imgproc::THRESH_BINARY,
            self.block_size,
            self.threshold_offset,
        )?;

        let kernel = imgproc::get_structuring_element(
            imgproc::MORPH_ELLIPSE,
            Size::new(self.morph_ksize, self.morph_ksize),
            Point::new(-1, -1),
        )?;
        let border_value = imgproc::morphology_default_border_value()?;

        let mut eroded = Mat::default();
        imgproc::erode(
            &binary,
            &mut eroded,
            &kernel,
            Point::new(-1, -1),
            1,
            opencv::core::BORDER_CONSTANT,
            border_value,
        )?;

        let mut dilated = Mat::default();
        imgproc::dilate(
            &eroded,
            &mut dilated,
            &kernel,
            Point::new(-1, -1),
            1,
            opencv::core::BORDER_CONSTANT,
            border_value,
        )?;

        let mut smoothed = Mat::default();
        imgproc::median_blur(&dilated, &mut smoothed, self.median_blur_ksize)?;
        Ok(smoothed)
    }
}

impl PupilLocalizer for BlobLocalizer {
    fn locate(&mut self, grey_face: &Mat) -> Result<Vec<PupilCandidate>> {
        let regions = detect_eye_regions(
            &mut self.cascade,
            grey_face,
            self.scale_factor,
            self.min_neighbors,
        )?;

        let mut candidates = Vec::new();
        for region in regions {
            let eye = Mat::roi(grey_face, region)?.try_clone()?;
            let prepared = self.binarize(&eye)?;

            let mut keypoints = Vector::<opencv::core::KeyPoint>::new();
            self.detector.detect(&prepared, &mut keypoints, &no_array())?;

            for keypoint in keypoints.iter() {
                let center = keypoint.pt();
                candidates.push(PupilCandidate {
                    position: Point2D::new(
                        f64::from(region.x) + f64::from(center.x),
                        f64::from(region.y) + f64::from(center.y),
                    ),
                });
            }
        }

        log::debug!("blob: {} candidate(s)", candidates.len());
        Ok(candidates)
    }

    fn name(&self) -> &str {
        "blob"
    }
}

/// Hough-circle pupil localizer (alternate strategy).
///
/// Runs circle detection over the whole face region with a fixed pupil
/// radius range, after a median blur to suppress sensor noise.
pub struct HoughLocalizer {
    config: HoughConfig,
}

impl HoughLocalizer {
    #[must_use]
    pub fn new(config: HoughConfig) -> Self {
        Self { config }
    }
}

impl PupilLocalizer for HoughLocalizer {
    fn locate(&mut self, grey_face: &Mat) -> Result<Vec<PupilCandidate>> {
        if grey_face.rows() < self.config.median_blur_ksize
            || grey_face.cols() < self.config.median_blur_ksize
        {
            return Ok(Vec::new());
        }

        let mut blurred = Mat::default();
        imgproc::median_blur(grey_face, &mut blurred, self.config.median_blur_ksize)?;

        // Minimum distance between circle centers scales with region height
        let min_dist =
            (f64::from(grey_face.rows()) / self.config.min_dist_divisor).max(1.0);

        let mut circles = Vector::<Vec3f>::new();
        imgproc::hough_circles(
            &blurred,
            &mut circles,
            imgproc::HOUGH_GRADIENT,
            self.config.dp,
            min_dist,
            self.config.canny_threshold,
            self.config.accumulator_threshold,
            self.config.min_radius,
            self.config.max_radius,
        )?;

        let candidates = circles
            .iter()
            .map(|circle| PupilCandidate {
                position: Point2D::new(
                    f64::from(circle[0]).round(),
                    f64::from(circle[1]).round(),
                ),
            })
            .collect::<Vec<_>>();

        log::debug!("hough: {} candidate(s)", candidates.len());
        Ok(candidates)
    }

    fn name(&self) -> &str {
        "hough"
    }
}
