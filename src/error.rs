//! Error types for the gaze detection library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// `OpenCV` operation failed
    #[error("OpenCV error: {0}")]
    OpenCV(#[from] opencv::Error),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Eye cascade classifier could not be loaded or is unusable
    #[error("Cascade error: {0}")]
    Cascade(String),

    /// Frame buffer does not satisfy the single-plane 8-bit luma precondition
    #[error("Frame format error: {0}")]
    FrameFormat(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
