//! Diagnostic counters for the gaze pipeline.
//!
//! The collector is created by the caller and handed to the aggregator,
//! scoped to the caller's lifecycle. Counters are append-only and atomic:
//! a capture layer that overlaps invocations (it should not, but counters
//! must stay consistent if it does) cannot corrupt them.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Atomic diagnostic counters shared with the aggregator
#[derive(Debug, Default)]
pub struct GazeMetrics {
    frames_processed: AtomicU64,
    faces_seen: AtomicU64,
    faces_skipped_eyes_closed: AtomicU64,
    faces_skipped_landmarks: AtomicU64,
    faces_skipped_association: AtomicU64,
    faces_looking: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub frames_processed: u64,
    pub faces_seen: u64,
    pub faces_skipped_eyes_closed: u64,
    pub faces_skipped_landmarks: u64,
    pub faces_skipped_association: u64,
    pub faces_looking: u64,
}

impl GazeMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_frame(&self) {
        self.frames_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_face(&self) {
        self.faces_seen.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eyes_closed_skip(&self) {
        self.faces_skipped_eyes_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_landmark_skip(&self) {
        self.faces_skipped_landmarks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_association_skip(&self) {
        self.faces_skipped_association.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_looking_face(&self) {
        self.faces_looking.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy the current counter values
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            frames_processed: self.frames_processed.load(Ordering::Relaxed),
            faces_seen: self.faces_seen.load(Ordering::Relaxed),
            faces_skipped_eyes_closed: self.faces_skipped_eyes_closed.load(Ordering::Relaxed),
            faces_skipped_landmarks: self.faces_skipped_landmarks.load(Ordering::Relaxed),
            faces_skipped_association: self.faces_skipped_association.load(Ordering::Relaxed),
            faces_looking: self.faces_looking.load(Ordering::Relaxed),
        }
    }
}
