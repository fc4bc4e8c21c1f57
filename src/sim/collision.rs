//! Separating-axis collision detection between convex polygons
//!
//! Each edge normal of both polygons is a candidate separating axis. If the
//! projections of the two vertex sets onto any candidate do not overlap, the
//! polygons are apart. Otherwise the candidate with the least overlap is the
//! minimum-translation axis. Concave input is not supported.

use super::body::Body;
use super::vector::{self, VEC_ZERO, Vector};

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether the polygons overlap
    pub collided: bool,
    /// Unit minimum-translation axis (meaningful only if `collided`)
    pub axis: Vector,
    /// Penetration depth along `axis`
    pub overlap: f64,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            collided: false,
            axis: VEC_ZERO,
            overlap: 0.0,
        }
    }
}

/// Check whether two bodies' polygons overlap
pub fn find_collision(body1: &Body, body2: &Body) -> CollisionResult {
    find_shape_collision(body1.polygon().points(), body2.polygon().points())
}

/// Check whether two convex vertex lists overlap
///
/// Both directions are tested; any separating axis from either side wins.
/// When both sides agree on a collision the axis with the smaller overlap is
/// reported.
pub fn find_shape_collision(shape1: &[Vector], shape2: &[Vector]) -> CollisionResult {
    let Some((axis1, overlap1)) = least_overlap_axis(shape1, shape2) else {
        return CollisionResult::miss();
    };
    let Some((axis2, overlap2)) = least_overlap_axis(shape2, shape1) else {
        return CollisionResult::miss();
    };

    let (axis, overlap) = if overlap1 < overlap2 {
        (axis1, overlap1)
    } else {
        (axis2, overlap2)
    };
    CollisionResult {
        collided: true,
        axis,
        overlap,
    }
}

/// Project both shapes onto every edge normal of `shape1`
///
/// Returns `None` at the first separating axis, otherwise the axis of
/// least overlap and that overlap.
fn least_overlap_axis(shape1: &[Vector], shape2: &[Vector]) -> Option<(Vector, f64)> {
    let n = shape1.len();
    let mut best_axis = VEC_ZERO;
    let mut best_overlap = f64::MAX;

    for i in 0..n {
        let edge = shape1[i] - shape1[(i + 1) % n];
        let normal = Vector::new(-edge.y, edge.x);
        let len = vector::length(normal);
        assert!(len != 0.0, "zero-length edge at vertex {i}: duplicate consecutive vertices");
        let axis = vector::scale(1.0 / len, normal);

        let (min1, max1) = projection_bounds(shape1, axis);
        let (min2, max2) = projection_bounds(shape2, axis);
        if max1 < min2 || max2 < min1 {
            return None;
        }

        let overlap = max1.min(max2) - min1.max(min2);
        if overlap < best_overlap {
            best_overlap = overlap;
            best_axis = axis;
        }
    }

    Some((best_axis, best_overlap))
}

/// `(min, max)` of the vertices projected onto a unit axis
fn projection_bounds(shape: &[Vector], axis: Vector) -> (f64, f64) {
    shape
        .iter()
        .map(|&p| vector::dot(p, axis))
        .fold((f64::MAX, f64::MIN), |(lo, hi), d| (lo.min(d), hi.max(d)))
}
