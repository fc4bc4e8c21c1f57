//! 2D vector math
//!
//! `Vector` is glam's `DVec2`; the free functions here are the small set of
//! operations the rest of the simulation is written against.

use glam::DVec2;

/// 2D vector value type (copied and compared by value)
pub type Vector = DVec2;

/// The zero vector
pub const VEC_ZERO: Vector = DVec2::ZERO;

#[inline]
pub fn add(v1: Vector, v2: Vector) -> Vector {
    v1 + v2
}

#[inline]
pub fn subtract(v1: Vector, v2: Vector) -> Vector {
    v1 - v2
}

#[inline]
pub fn negate(v: Vector) -> Vector {
    -v
}

/// Multiply a vector by a scalar
#[inline]
pub fn scale(scalar: f64, v: Vector) -> Vector {
    v * scalar
}

#[inline]
pub fn dot(v1: Vector, v2: Vector) -> f64 {
    v1.dot(v2)
}

/// 2D scalar cross product: `x1*y2 - x2*y1`
#[inline]
pub fn cross(v1: Vector, v2: Vector) -> f64 {
    v1.perp_dot(v2)
}

/// Rotate a vector counter-clockwise about the origin by `angle` radians
#[inline]
pub fn rotate(v: Vector, angle: f64) -> Vector {
    let (sin, cos) = angle.sin_cos();
    Vector::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Euclidean length; zero for the zero vector
#[inline]
pub fn length(v: Vector) -> f64 {
    v.length()
}
