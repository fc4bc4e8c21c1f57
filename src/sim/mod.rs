//! Deterministic simulation module
//!
//! The rigid-body core lives here. This module must stay pure:
//! - Time comes in only as a `dt` argument
//! - Stable iteration order (insertion order, ids ascending)
//! - No rendering, input or platform dependencies

pub mod body;
pub mod collision;
pub mod color;
pub mod forces;
pub mod polygon;
pub mod scene;
pub mod shape;
pub mod stepper;
pub mod vector;

pub use body::Body;
pub use collision::{CollisionResult, find_collision, find_shape_collision};
pub use color::Rgb;
pub use forces::{
    create_collision, create_destructive_collision, create_drag, create_newtonian_gravity,
    create_partial_destructive_collision, create_physics_collision,
};
pub use polygon::Polygon;
pub use scene::{Bodies, BodyId, ForceCreator, Scene};
pub use stepper::Stepper;
pub use vector::{VEC_ZERO, Vector};
