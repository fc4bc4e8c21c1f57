//! Rigid bodies and the per-body integrator
//!
//! A body wraps one polygon with mass, force/impulse accumulators, a sticky
//! removal flag, and an optional owner-supplied payload. Gameplay layers hang
//! their own data (being stats, projectile stats, ...) off the payload; it is
//! dropped exactly once, together with the body.

use std::any::Any;
use std::fmt;

use super::color::Rgb;
use super::polygon::Polygon;
use super::vector::{self, VEC_ZERO, Vector};

/// A polygonal rigid body
pub struct Body {
    polygon: Polygon,
    /// `0` or `INFINITY` means immovable
    mass: f64,
    force: Vector,
    impulse: Vector,
    removed: bool,
    payload: Option<Box<dyn Any>>,
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("centroid", &self.polygon.center())
            .field("velocity", &self.polygon.velocity())
            .field("mass", &self.mass)
            .field("force", &self.force)
            .field("impulse", &self.impulse)
            .field("removed", &self.removed)
            .field("has_payload", &self.payload.is_some())
            .finish()
    }
}

impl Body {
    /// Create a body from a counter-clockwise vertex list
    ///
    /// Panics on negative/NaN mass or a degenerate shape.
    pub fn new(shape: Vec<Vector>, mass: f64, color: Rgb) -> Self {
        assert!(mass >= 0.0, "body mass must be non-negative, got {mass}");
        Self {
            polygon: Polygon::new(shape, VEC_ZERO, 0.0, color),
            mass,
            force: VEC_ZERO,
            impulse: VEC_ZERO,
            removed: false,
            payload: None,
        }
    }

    /// Create a body carrying gameplay data
    pub fn with_payload<T: Any>(shape: Vec<Vector>, mass: f64, color: Rgb, payload: T) -> Self {
        let mut body = Self::new(shape, mass, color);
        body.payload = Some(Box::new(payload));
        body
    }

    /// An immovable body (infinite mass)
    pub fn fixed(shape: Vec<Vector>, color: Rgb) -> Self {
        Self::new(shape, f64::INFINITY, color)
    }

    #[inline]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Copy of the current vertices
    pub fn shape(&self) -> Vec<Vector> {
        self.polygon.points().to_vec()
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Whether forces and impulses can change this body's velocity
    #[inline]
    pub fn is_movable(&self) -> bool {
        self.mass != 0.0 && self.mass.is_finite()
    }

    #[inline]
    pub fn centroid(&self) -> Vector {
        self.polygon.center()
    }

    pub fn set_centroid(&mut self, centroid: Vector) {
        self.polygon.set_center(centroid);
    }

    #[inline]
    pub fn velocity(&self) -> Vector {
        self.polygon.velocity()
    }

    pub fn set_velocity(&mut self, velocity: Vector) {
        self.polygon.set_velocity(velocity);
    }

    #[inline]
    pub fn rotation(&self) -> f64 {
        self.polygon.rotation()
    }

    pub fn set_rotation(&mut self, angle: f64) {
        self.polygon.set_rotation(angle);
    }

    #[inline]
    pub fn rotation_speed(&self) -> f64 {
        self.polygon.rotation_speed()
    }

    pub fn set_rotation_speed(&mut self, rotation_speed: f64) {
        self.polygon.set_rotation_speed(rotation_speed);
    }

    /// Rotate about the centroid by `rotation_speed * dt`
    pub fn spin(&mut self, dt: f64) {
        let speed = self.polygon.rotation_speed();
        if speed != 0.0 {
            let center = self.polygon.center();
            self.polygon.rotate(speed * dt, center);
        }
    }

    #[inline]
    pub fn color(&self) -> Rgb {
        self.polygon.color()
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.polygon.set_color(color);
    }

    /// Force accumulated since the last tick
    #[inline]
    pub fn force(&self) -> Vector {
        self.force
    }

    /// Impulse accumulated since the last tick
    #[inline]
    pub fn impulse(&self) -> Vector {
        self.impulse
    }

    pub fn add_force(&mut self, force: Vector) {
        self.force += force;
    }

    pub fn add_impulse(&mut self, impulse: Vector) {
        self.impulse += impulse;
    }

    /// Mark for removal on the next scene tick (irreversible)
    pub fn remove(&mut self) {
        self.removed = true;
    }

    #[inline]
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// Payload downcast to `T`, if present and of that type
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref().and_then(|p| p.downcast_ref::<T>())
    }

    pub fn payload_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.payload.as_deref_mut().and_then(|p| p.downcast_mut::<T>())
    }

    /// Advance one step of length `dt`
    ///
    /// Impulse is folded into force as `impulse / dt` (skipped when `dt == 0`),
    /// velocity changes by `force / mass * dt` for movable bodies only, and the
    /// centroid moves by the average of old and new velocity times `dt`.
    /// Both accumulators are cleared afterwards, movable or not.
    pub fn tick(&mut self, dt: f64) {
        let old_velocity = self.velocity();

        if dt != 0.0 {
            self.force += vector::scale(1.0 / dt, self.impulse);
        }

        if self.is_movable() {
            let dv = vector::scale(dt / self.mass, self.force);
            self.polygon.set_velocity(old_velocity + dv);
        }

        let dpos = vector::scale(dt / 2.0, self.velocity() + old_velocity);
        if dpos != VEC_ZERO {
            self.polygon.translate(dpos);
        }

        self.force = VEC_ZERO;
        self.impulse = VEC_ZERO;
    }
}
