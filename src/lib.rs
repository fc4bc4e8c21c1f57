//! Arcade Physics - polygon rigid-body core for a 2D arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (polygons, bodies, SAT collisions, scene)
//! - `scenario`: Data-driven scene descriptions (JSON)
//! - `settings`: Runner timestep configuration

pub mod scenario;
pub mod settings;
pub mod sim;

pub use scenario::Scenario;
pub use settings::{Settings, TimestepPreset};
pub use sim::{
    Body, BodyId, Bodies, CollisionResult, ForceCreator, Polygon, Rgb, Scene, Stepper, Vector,
    find_collision,
};

/// Simulation configuration constants
pub mod consts {
    /// Default fixed simulation timestep (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the stepper will accept (seconds)
    pub const MAX_FRAME_DT: f64 = 0.1;

    /// Polygons with less area than this are treated as degenerate
    pub const MIN_POLYGON_AREA: f64 = 1e-9;
    /// Bodies closer than this skip pairwise gravity
    pub const MIN_GRAVITY_DISTANCE: f64 = 5.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f64) -> f64 {
    use std::f64::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> Vector {
    Vector::new(r * theta.cos(), r * theta.sin())
}
