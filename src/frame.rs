//! Greyscale frame-buffer handling.
//!
//! The pipeline assumes the capture layer hands over a single 8-bit luma
//! plane per frame. Any other layout is a precondition violation and is
//! rejected loudly rather than silently mis-decoded.

use opencv::core::{Mat, Point, Rect, CV_8UC1};
use opencv::prelude::*;

use crate::face::FaceRect;
use crate::{Error, Result};

/// Wrap a raw 8-bit luma plane in an `OpenCV` Mat.
///
/// # Errors
///
/// Returns [`Error::FrameFormat`] if the dimensions are not positive or
/// the plane length does not equal `width * height`.
pub fn luma_plane_to_mat(plane: &[u8], width: i32, height: i32) -> Result<Mat> {
    if width <= 0 || height <= 0 {
        return Err(Error::FrameFormat(format!(
            "invalid frame dimensions: {width}x{height}"
        )));
    }

    let expected = (width as usize) * (height as usize);
    if plane.len() != expected {
        return Err(Error::FrameFormat(format!(
            "luma plane length {} does not match {width}x{height} (expected {expected})",
            plane.len()
        )));
    }

    let mat = Mat::from_slice(plane)?;
    Ok(mat.reshape(1, height)?.try_clone()?)
}

/// Verify that a frame satisfies the single-plane 8-bit luma precondition.
///
/// # Errors
///
/// Returns [`Error::FrameFormat`] for empty frames or any type other
/// than `CV_8UC1`.
pub fn ensure_grey(frame: &Mat) -> Result<()> {
    if frame.empty() {
        return Err(Error::FrameFormat("frame is empty".to_string()));
    }
    if frame.typ() != CV_8UC1 {
        return Err(Error::FrameFormat(format!(
            "expected single-channel 8-bit frame (CV_8UC1), got type {}",
            frame.typ()
        )));
    }
    Ok(())
}

/// Extract the face bounding region from a greyscale frame.
///
/// The box is clamped to the frame boundaries. Returns `None` when the
/// clamped region is empty (face fully outside the frame), along with no
/// error: an out-of-frame face is an exclusion, not a fault. The returned
/// offset is the top-left corner of the clamped region in image
/// coordinates, used to translate region-local candidates back.
///
/// # Errors
///
/// Returns an error only if the underlying `OpenCV` ROI operation fails.
pub fn face_region(frame: &Mat, bounding_box: &FaceRect) -> Result<Option<(Mat, Point)>> {
    let left = bounding_box.left.max(0);
    let top = bounding_box.top.max(0);
    let right = bounding_box.right.min(frame.cols());
    let bottom = bounding_box.bottom.min(frame.rows());

    let width = right - left;
    let height = bottom - top;
    if width <= 0 || height <= 0 {
        return Ok(None);
    }

    let roi = Mat::roi(frame, Rect::new(left, top, width, height))?;
    Ok(Some((roi.try_clone()?, Point::new(left, top))))
}
