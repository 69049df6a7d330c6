//! Pupil-to-eye association.
//!
//! Pupil candidates arrive unordered and without any face or side
//! attribution. A candidate belongs to a side when it lies horizontally
//! between that side's ear anchor and the nose anchor: the sum of the
//! absolute horizontal distances from anchor to candidate and candidate
//! to anchor then equals the anchor-to-anchor span. Camera-derived
//! coordinates make exact floating equality unusable here, so the
//! comparison is epsilon-bounded.

use crate::geometry::{horizontal_distance, Point2D};

/// Resolve the first candidate lying horizontally between the two anchors.
///
/// Candidates are scanned in detector-returned order and the match is
/// removed from the pool, so a candidate resolved for one side cannot be
/// claimed again by the other. Returns `None` when no candidate satisfies
/// the colinearity predicate.
pub fn isolate(
    candidates: &mut Vec<Point2D>,
    anchor_a: Point2D,
    anchor_b: Point2D,
    epsilon: f64,
) -> Option<Point2D> {
    let span = horizontal_distance(anchor_a, anchor_b).abs();

    let index = candidates.iter().position(|&candidate| {
        let via = horizontal_distance(anchor_a, candidate).abs()
            + horizontal_distance(candidate, anchor_b).abs();
        (via - span).abs() <= epsilon
    })?;

    Some(candidates.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_ASSOCIATION_EPSILON;

    const EPSILON: f64 = DEFAULT_ASSOCIATION_EPSILON;

    #[test]
    fn test_candidate_between_anchors_is_resolved() {
        let ear = Point2D::new(100.0, 200.0);
        let nose = Point2D::new(200.0, 230.0);
        let mut candidates = vec![Point2D::new(150.0, 190.0)];

        let resolved = isolate(&mut candidates, ear, nose, EPSILON).unwrap();
        assert_eq!(resolved, Point2D::new(150.0, 190.0));
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_candidate_outside_anchor_span_is_rejected() {
        let ear = Point2D::new(100.0, 200.0);
        let nose = Point2D::new(200.0, 230.0);
        let mut candidates = vec![Point2D::new(250.0, 190.0), Point2D::new(50.0, 190.0)];

        assert!(isolate(&mut candidates, ear, nose, EPSILON).is_none());
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_resolved_point_lies_within_anchor_span() {
        // Colinearity property: any resolved point is inside
        // [min(a.x, b.x), max(a.x, b.x)] up to the epsilon bound.
        let a = Point2D::new(310.0, 0.0);
        let b = Point2D::new(120.0, 0.0);
        let mut candidates = vec![
            Point2D::new(400.0, 10.0),
            Point2D::new(119.0, 10.0),
            Point2D::new(200.0, 10.0),
        ];

        let resolved = isolate(&mut candidates, a, b, EPSILON).unwrap();
        let lo = a.x.min(b.x) - EPSILON;
        let hi = a.x.max(b.x) + EPSILON;
        assert!(resolved.x >= lo && resolved.x <= hi);
    }

    #[test]
    fn test_first_match_in_detector_order_wins() {
        let ear = Point2D::new(0.0, 0.0);
        let nose = Point2D::new(100.0, 0.0);
        let mut candidates = vec![
            Point2D::new(30.0, 5.0),
            Point2D::new(60.0, 5.0),
            Point2D::new(70.0, 5.0),
        ];

        let resolved = isolate(&mut candidates, ear, nose, EPSILON).unwrap();
        assert_eq!(resolved.x, 30.0);
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_matched_candidate_removed_from_pool() {
        // One candidate sits between both anchor pairs; after the left
        // side claims it, the right side must not resolve it again.
        let left_ear = Point2D::new(0.0, 0.0);
        let nose = Point2D::new(100.0, 0.0);
        let right_ear = Point2D::new(200.0, 0.0);
        let mut candidates = vec![Point2D::new(100.0, 5.0)];

        let left = isolate(&mut candidates, left_ear, nose, EPSILON);
        assert!(left.is_some());
        let right = isolate(&mut candidates, nose, right_ear, EPSILON);
        assert!(right.is_none());
    }

    #[test]
    fn test_epsilon_bound_is_inclusive() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(100.0, 0.0);

        // A point just past the span: via - span = 2 * overshoot.
        let mut near = vec![Point2D::new(100.5, 0.0)]; // via - span = 1.0
        assert!(isolate(&mut near, a, b, 1.0).is_some());

        let mut far = vec![Point2D::new(101.0, 0.0)]; // via - span = 2.0
        assert!(isolate(&mut far, a, b, 1.0).is_none());
    }

    #[test]
    fn test_anchor_order_does_not_matter() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(100.0, 0.0);
        let mut forward = vec![Point2D::new(40.0, 0.0)];
        let mut backward = vec![Point2D::new(40.0, 0.0)];

        assert!(isolate(&mut forward, a, b, EPSILON).is_some());
        assert!(isolate(&mut backward, b, a, EPSILON).is_some());
    }

    #[test]
    fn test_empty_pool() {
        let mut candidates = Vec::new();
        assert!(isolate(
            &mut candidates,
            Point2D::new(0.0, 0.0),
            Point2D::new(100.0, 0.0),
            EPSILON
        )
        .is_none());
    }
}
