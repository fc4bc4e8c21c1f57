//! Stock force creators
//!
//! Each `create_*` helper registers a creator bound to the bodies it touches,
//! so the scene unregisters it as soon as one of them is swept.

use super::body::Body;
use super::collision::find_collision;
use super::scene::{Bodies, BodyId, ForceCreator, Scene};
use super::vector::{self, Vector};
use crate::consts::MIN_GRAVITY_DISTANCE;

/// Runs a handler on the tick two bodies start overlapping
pub struct Collision<H> {
    body1: BodyId,
    body2: BodyId,
    handler: H,
    /// Whether the pair overlapped on the previous step
    colliding: bool,
}

impl<H> Collision<H>
where
    H: FnMut(&mut Body, &mut Body, Vector),
{
    pub fn new(body1: BodyId, body2: BodyId, handler: H) -> Self {
        Self {
            body1,
            body2,
            handler,
            colliding: false,
        }
    }
}

impl<H> ForceCreator for Collision<H>
where
    H: FnMut(&mut Body, &mut Body, Vector),
{
    fn apply(&mut self, bodies: &mut Bodies) {
        let Some((b1, b2)) = bodies.pair_mut(self.body1, self.body2) else {
            return;
        };
        let result = find_collision(b1, b2);
        if result.collided && !self.colliding {
            log::trace!(
                "collision {} <-> {} axis ({:.3}, {:.3}) overlap {:.3}",
                self.body1,
                self.body2,
                result.axis.x,
                result.axis.y,
                result.overlap
            );
            (self.handler)(b1, b2, result.axis);
        }
        self.colliding = result.collided;
    }
}

/// Register `handler(body1, body2, axis)` to run when the pair starts colliding
pub fn create_collision<H>(scene: &mut Scene, body1: BodyId, body2: BodyId, handler: H)
where
    H: FnMut(&mut Body, &mut Body, Vector) + 'static,
{
    scene.add_bodies_force_creator(Collision::new(body1, body2, handler), vec![body1, body2]);
}

/// Remove both bodies when they collide
pub fn create_destructive_collision(scene: &mut Scene, body1: BodyId, body2: BodyId) {
    create_collision(scene, body1, body2, |b1, b2, _axis| {
        b1.remove();
        b2.remove();
    });
}

/// Remove only `target` when it collides with `other`
pub fn create_partial_destructive_collision(scene: &mut Scene, target: BodyId, other: BodyId) {
    create_collision(scene, target, other, |target, _other, _axis| {
        target.remove();
    });
}

/// Bounce two bodies apart along the collision axis
///
/// `elasticity` is the coefficient of restitution (0 = inelastic, 1 = elastic).
pub fn create_physics_collision(scene: &mut Scene, body1: BodyId, body2: BodyId, elasticity: f64) {
    assert!(elasticity >= 0.0, "elasticity must be non-negative, got {elasticity}");
    create_collision(scene, body1, body2, move |b1, b2, axis| {
        apply_collision_impulse(b1, b2, axis, elasticity);
    });
}

/// Impulse exchange for a collision along unit `axis`
///
/// An immovable body acts as an infinitely heavy wall.
pub fn apply_collision_impulse(b1: &mut Body, b2: &mut Body, axis: Vector, elasticity: f64) {
    let reduced_mass = match (b1.is_movable(), b2.is_movable()) {
        (true, true) => b1.mass() * b2.mass() / (b1.mass() + b2.mass()),
        (false, true) => b2.mass(),
        (true, false) => b1.mass(),
        (false, false) => return,
    };
    let u1 = vector::dot(b1.velocity(), axis);
    let u2 = vector::dot(b2.velocity(), axis);
    let j = reduced_mass * (1.0 + elasticity) * (u2 - u1);
    b1.add_impulse(vector::scale(j, axis));
    b2.add_impulse(vector::scale(-j, axis));
}

/// Mutual attraction `G m1 m2 / r²` between two bodies' centroids
///
/// Pairs involving an immovable (infinite-mass) body are skipped.
pub struct NewtonianGravity {
    pub g: f64,
    pub body1: BodyId,
    pub body2: BodyId,
}

impl ForceCreator for NewtonianGravity {
    fn apply(&mut self, bodies: &mut Bodies) {
        let Some((b1, b2)) = bodies.pair_mut(self.body1, self.body2) else {
            return;
        };
        // An infinite mass would make the force infinite
        if !b1.mass().is_finite() || !b2.mass().is_finite() {
            return;
        }
        let r = b2.centroid() - b1.centroid();
        let dist = vector::length(r);
        // Too close: the force blows up
        if dist < MIN_GRAVITY_DISTANCE {
            return;
        }
        let magnitude = self.g * b1.mass() * b2.mass() / (dist * dist);
        let force = vector::scale(magnitude / dist, r);
        b1.add_force(force);
        b2.add_force(-force);
    }
}

pub fn create_newtonian_gravity(scene: &mut Scene, g: f64, body1: BodyId, body2: BodyId) {
    scene.add_bodies_force_creator(NewtonianGravity { g, body1, body2 }, vec![body1, body2]);
}

/// Linear drag `-gamma * v`
pub struct Drag {
    pub gamma: f64,
    pub body: BodyId,
}

impl ForceCreator for Drag {
    fn apply(&mut self, bodies: &mut Bodies) {
        if let Some(body) = bodies.get_mut(self.body) {
            let v = body.velocity();
            body.add_force(vector::scale(-self.gamma, v));
        }
    }
}

pub fn create_drag(scene: &mut Scene, gamma: f64, body: BodyId) {
    scene.add_bodies_force_creator(Drag { gamma, body }, vec![body]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::color::Rgb;
    use crate::sim::shape;
    use approx::assert_relative_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    fn square(scene: &mut Scene, x: f64, mass: f64) -> BodyId {
        scene.add_body(Body::new(
            shape::square(10.0, Vector::new(x, 0.0), 0.0),
            mass,
            Rgb::WHITE,
        ))
    }

    #[test]
    fn test_destructive_collision_removes_both() {
        let mut scene = Scene::new();
        let player = square(&mut scene, -100.0, 1.0);
        let a = square(&mut scene, 0.0, 1.0);
        let b = square(&mut scene, 5.0, 1.0);
        create_destructive_collision(&mut scene, a, b);
        scene.tick(0.01);
        assert_eq!(scene.body_count(), 1);
        assert_eq!(scene.body_id(0), player);
        assert_eq!(scene.force_creator_count(), 0);
    }

    #[test]
    fn test_destructive_collision_waits_for_contact() {
        let mut scene = Scene::new();
        let a = square(&mut scene, 0.0, 1.0);
        let b = square(&mut scene, 30.0, 1.0);
        scene.find_mut(b).unwrap().set_velocity(Vector::new(-100.0, 0.0));
        create_destructive_collision(&mut scene, a, b);

        scene.tick(0.1);
        scene.tick(0.1);
        // b has only just reached contact range (x = 10); not yet checked
        assert_eq!(scene.body_count(), 2);
        scene.tick(0.1);
        scene.tick(0.1);
        assert_eq!(scene.body_count(), 0);
    }

    #[test]
    fn test_partial_destructive_collision_removes_target_only() {
        let mut scene = Scene::new();
        let being = square(&mut scene, 0.0, 1.0);
        let projectile = square(&mut scene, 4.0, 1.0);
        create_partial_destructive_collision(&mut scene, projectile, being);
        scene.tick(0.01);
        assert_eq!(scene.body_count(), 1);
        assert_eq!(scene.body_id(0), being);
    }

    #[test]
    fn test_handler_fires_once_per_contact() {
        let mut scene = Scene::new();
        let a = square(&mut scene, 0.0, 1.0);
        let b = square(&mut scene, 5.0, 1.0);
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        create_collision(&mut scene, a, b, move |_, _, _| counter.set(counter.get() + 1));
        for _ in 0..5 {
            scene.tick(0.01);
        }
        assert_eq!(hits.get(), 1);

        // Separate, then touch again
        scene.find_mut(b).unwrap().set_centroid(Vector::new(50.0, 0.0));
        scene.tick(0.01);
        scene.find_mut(b).unwrap().set_centroid(Vector::new(5.0, 0.0));
        scene.tick(0.01);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_elastic_collision_swaps_velocities() {
        let mut scene = Scene::new();
        let a = square(&mut scene, 0.0, 1.0);
        let b = square(&mut scene, 9.0, 1.0);
        scene.find_mut(a).unwrap().set_velocity(Vector::new(1.0, 0.0));
        scene.find_mut(b).unwrap().set_velocity(Vector::new(-1.0, 0.0));
        create_physics_collision(&mut scene, a, b, 1.0);
        scene.tick(0.01);
        assert_relative_eq!(scene.find(a).unwrap().velocity().x, -1.0, epsilon = 1e-9);
        assert_relative_eq!(scene.find(b).unwrap().velocity().x, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_inelastic_collision_conserves_momentum() {
        let mut scene = Scene::new();
        let a = square(&mut scene, 0.0, 3.0);
        let b = square(&mut scene, 9.0, 1.0);
        scene.find_mut(a).unwrap().set_velocity(Vector::new(2.0, 0.0));
        create_physics_collision(&mut scene, a, b, 0.0);
        scene.tick(0.01);
        let va = scene.find(a).unwrap().velocity().x;
        let vb = scene.find(b).unwrap().velocity().x;
        assert_relative_eq!(3.0 * va + vb, 6.0, epsilon = 1e-9);
        assert_relative_eq!(va, vb, epsilon = 1e-9);
    }

    #[test]
    fn test_bounce_off_immovable_wall() {
        let mut scene = Scene::new();
        let ball = square(&mut scene, 0.0, 2.0);
        let wall = square(&mut scene, 9.0, f64::INFINITY);
        scene.find_mut(ball).unwrap().set_velocity(Vector::new(5.0, 0.0));
        create_physics_collision(&mut scene, ball, wall, 1.0);
        scene.tick(0.01);
        assert_relative_eq!(scene.find(ball).unwrap().velocity().x, -5.0, epsilon = 1e-9);
        assert_eq!(scene.find(wall).unwrap().velocity(), Vector::ZERO);
    }

    #[test]
    fn test_gravity_pulls_together() {
        let mut scene = Scene::new();
        let a = square(&mut scene, 0.0, 2.0);
        let b = square(&mut scene, 10.0, 2.0);
        create_newtonian_gravity(&mut scene, 1.0, a, b);
        scene.tick(1.0);
        // F = 1 * 2 * 2 / 100 = 0.04, a = 0.02
        assert_relative_eq!(scene.find(a).unwrap().velocity().x, 0.02, epsilon = 1e-9);
        assert_relative_eq!(scene.find(b).unwrap().velocity().x, -0.02, epsilon = 1e-9);
    }

    #[test]
    fn test_gravity_skipped_when_too_close() {
        let mut scene = Scene::new();
        let a = square(&mut scene, 0.0, 2.0);
        let b = square(&mut scene, 1.0, 2.0);
        create_newtonian_gravity(&mut scene, 1.0, a, b);
        scene.tick(1.0);
        assert_eq!(scene.find(a).unwrap().velocity(), Vector::ZERO);
    }

    #[test]
    fn test_gravity_ignores_immovable_partner() {
        let mut scene = Scene::new();
        let wall = square(&mut scene, 0.0, f64::INFINITY);
        let ball = scene.add_body(Body::new(
            shape::square(2.0, Vector::new(50.0, 0.0), 0.0),
            1.0,
            Rgb::WHITE,
        ));
        create_newtonian_gravity(&mut scene, 1.0, wall, ball);
        scene.tick(1.0 / 60.0);
        let v = scene.find(ball).unwrap().velocity();
        assert_eq!(v, Vector::ZERO);
        assert_relative_eq!(scene.find(ball).unwrap().centroid().x, 50.0, epsilon = 1e-9);
        assert_eq!(scene.find(wall).unwrap().velocity(), Vector::ZERO);
    }

    #[test]
    fn test_drag_slows_body() {
        let mut scene = Scene::new();
        let a = square(&mut scene, 0.0, 1.0);
        scene.find_mut(a).unwrap().set_velocity(Vector::new(10.0, 0.0));
        create_drag(&mut scene, 0.5, a);
        scene.tick(0.1);
        // dv = -0.5 * 10 * 0.1
        assert_relative_eq!(scene.find(a).unwrap().velocity().x, 9.5, epsilon = 1e-9);
    }

    #[test]
    fn test_removed_body_unregisters_stock_creators() {
        let mut scene = Scene::new();
        let a = square(&mut scene, 0.0, 1.0);
        let b = square(&mut scene, 100.0, 1.0);
        create_drag(&mut scene, 0.1, a);
        create_newtonian_gravity(&mut scene, 1.0, a, b);
        create_physics_collision(&mut scene, a, b, 1.0);
        assert_eq!(scene.force_creator_count(), 3);
        scene.find_mut(a).unwrap().remove();
        scene.tick(0.1);
        assert_eq!(scene.force_creator_count(), 0);
        assert_eq!(scene.body_count(), 1);
    }
}
