//! Vertex-list builders for the shapes bodies are made from
//!
//! Every builder returns counter-clockwise vertices whose centroid is `center`.

use std::f64::consts::TAU;

use super::vector::{self, Vector};

/// Regular `resolution`-gon inscribed in a circle
pub fn circle(radius: f64, center: Vector, resolution: usize) -> Vec<Vector> {
    ellipse(radius, radius, center, resolution, 0.0)
}

/// Polygonal ellipse with semi-axes `radius_x`, `radius_y`, rotated by `angle`
pub fn ellipse(
    radius_x: f64,
    radius_y: f64,
    center: Vector,
    resolution: usize,
    angle: f64,
) -> Vec<Vector> {
    assert!(radius_x > 0.0 && radius_y > 0.0, "ellipse radii must be positive");
    assert!(resolution >= 3, "ellipse resolution must be at least 3");

    (0..resolution)
        .map(|i| {
            let theta = TAU * i as f64 / resolution as f64;
            let local = Vector::new(radius_x * theta.cos(), radius_y * theta.sin());
            center + vector::rotate(local, angle)
        })
        .collect()
}

pub fn square(side: f64, center: Vector, angle: f64) -> Vec<Vector> {
    rectangle(side, side, center, angle)
}

/// Axis-aligned rectangle rotated by `angle` about its center
pub fn rectangle(width: f64, height: f64, center: Vector, angle: f64) -> Vec<Vector> {
    assert!(width > 0.0 && height > 0.0, "rectangle sides must be positive");
    let (hw, hh) = (width / 2.0, height / 2.0);
    place(
        &[
            Vector::new(hw, hh),
            Vector::new(-hw, hh),
            Vector::new(-hw, -hh),
            Vector::new(hw, -hh),
        ],
        center,
        angle,
    )
}

/// Equilateral triangle with one vertex pointing up (before rotation)
pub fn equilateral_triangle(side: f64, center: Vector, angle: f64) -> Vec<Vector> {
    assert!(side > 0.0, "triangle side must be positive");
    let apex = side / 3.0_f64.sqrt();
    let base = side / (2.0 * 3.0_f64.sqrt());
    place(
        &[
            Vector::new(0.0, apex),
            Vector::new(-side / 2.0, -base),
            Vector::new(side / 2.0, -base),
        ],
        center,
        angle,
    )
}

/// 3-4-5 right triangle: legs `4 * scale` (x) and `3 * scale` (y)
pub fn right_triangle_345(scale: f64, center: Vector, angle: f64) -> Vec<Vector> {
    assert!(scale > 0.0, "triangle scale must be positive");
    // Centroid of (0,0), (4,0), (0,3) is (4/3, 1)
    let offset = Vector::new(4.0 / 3.0, 1.0);
    place(
        &[
            (Vector::new(0.0, 0.0) - offset) * scale,
            (Vector::new(4.0, 0.0) - offset) * scale,
            (Vector::new(0.0, 3.0) - offset) * scale,
        ],
        center,
        angle,
    )
}

/// Rotate origin-centered local vertices and move them to `center`
fn place(local: &[Vector], center: Vector, angle: f64) -> Vec<Vector> {
    local
        .iter()
        .map(|&v| center + vector::rotate(v, angle))
        .collect()
}
