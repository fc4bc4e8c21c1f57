//! Polygon geometry
//!
//! A polygon owns an ordered, counter-clockwise vertex list plus the kinematic
//! state that travels with it (velocity, accumulated rotation, spin rate) and
//! its color. The cached `center` always equals the centroid of `points` once
//! any mutator returns.

use serde::Serialize;

use super::color::Rgb;
use super::vector::{self, VEC_ZERO, Vector};
use crate::consts::MIN_POLYGON_AREA;
use crate::normalize_angle;

/// A simple (non-self-intersecting) polygon
#[derive(Debug, Clone, Serialize)]
pub struct Polygon {
    points: Vec<Vector>,
    velocity: Vector,
    /// Orientation relative to the vertices as built, wrapped to [-π, π)
    angle: f64,
    /// Spin rate applied by `Body::spin` (radians/second)
    rotation_speed: f64,
    center: Vector,
    color: Rgb,
}

impl Polygon {
    /// Create a polygon from its vertices (ownership moves in)
    ///
    /// Panics if the vertex list has fewer than 3 points or no area.
    pub fn new(points: Vec<Vector>, velocity: Vector, rotation_speed: f64, color: Rgb) -> Self {
        assert!(
            points.len() >= 3,
            "polygon needs at least 3 vertices, got {}",
            points.len()
        );
        let center = centroid_of(&points);
        Self {
            points,
            velocity,
            angle: 0.0,
            rotation_speed,
            center,
            color,
        }
    }

    /// Create a stationary, non-spinning polygon
    pub fn from_points(points: Vec<Vector>, color: Rgb) -> Self {
        Self::new(points, VEC_ZERO, 0.0, color)
    }

    /// Live vertex list (read-only)
    #[inline]
    pub fn points(&self) -> &[Vector] {
        &self.points
    }

    #[inline]
    pub fn velocity(&self) -> Vector {
        self.velocity
    }

    #[inline]
    pub fn set_velocity(&mut self, velocity: Vector) {
        self.velocity = velocity;
    }

    #[inline]
    pub fn rotation_speed(&self) -> f64 {
        self.rotation_speed
    }

    #[inline]
    pub fn set_rotation_speed(&mut self, rotation_speed: f64) {
        self.rotation_speed = rotation_speed;
    }

    #[inline]
    pub fn color(&self) -> Rgb {
        self.color
    }

    #[inline]
    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    /// Cached centroid
    #[inline]
    pub fn center(&self) -> Vector {
        self.center
    }

    /// Current orientation (radians, in [-π, π))
    #[inline]
    pub fn rotation(&self) -> f64 {
        self.angle
    }

    /// Unsigned area (shoelace)
    pub fn area(&self) -> f64 {
        signed_area(&self.points).abs()
    }

    /// Area-weighted centroid, recomputed from the vertices
    pub fn centroid(&self) -> Vector {
        centroid_of(&self.points)
    }

    /// Move every vertex by `delta`
    pub fn translate(&mut self, delta: Vector) {
        for p in &mut self.points {
            *p += delta;
        }
        self.center = centroid_of(&self.points);
    }

    /// Rotate every vertex by `angle` radians about `pivot`
    pub fn rotate(&mut self, angle: f64, pivot: Vector) {
        for p in &mut self.points {
            *p = pivot + vector::rotate(*p - pivot, angle);
        }
        self.center = centroid_of(&self.points);
        self.angle = normalize_angle(self.angle + angle);
    }

    /// Move so the centroid lands on `target`
    pub fn set_center(&mut self, target: Vector) {
        self.translate(target - self.center);
    }

    /// Rotate about the centroid until the total rotation equals `target_angle`
    pub fn set_rotation(&mut self, target_angle: f64) {
        let center = self.center;
        self.rotate(target_angle - self.angle, center);
    }
}

/// Signed shoelace area; positive for counter-clockwise winding
pub fn signed_area(points: &[Vector]) -> f64 {
    let n = points.len();
    let mut sum = 0.0;
    for i in 0..n {
        sum += vector::cross(points[i], points[(i + 1) % n]);
    }
    0.5 * sum
}

/// Centroid of a vertex list
///
/// Panics on degenerate (zero-area) input.
pub fn centroid_of(points: &[Vector]) -> Vector {
    let area = signed_area(points);
    assert!(
        area.abs() > MIN_POLYGON_AREA,
        "degenerate polygon: area {area} over {} vertices",
        points.len()
    );

    let n = points.len();
    let mut acc = VEC_ZERO;
    for i in 0..n {
        let (v, v1) = (points[i], points[(i + 1) % n]);
        acc += vector::scale(vector::cross(v, v1), v + v1);
    }
    // Signed area: winding order cancels out
    vector::scale(1.0 / (6.0 * area), acc)
}
