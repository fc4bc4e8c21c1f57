//! Data-driven scene descriptions
//!
//! A scenario lists bodies, the interactions between them, and optionally a
//! seeded scatter of extra bodies. Interactions refer to bodies by their
//! position in the combined list (declared bodies first, then scattered ones).
//!
//! ```json
//! {
//!   "name": "duel",
//!   "bodies": [
//!     { "shape": { "kind": "square", "side": 40.0 }, "center": [100.0, 250.0] },
//!     { "shape": { "kind": "circle", "radius": 10.0, "resolution": 12 },
//!       "center": [400.0, 250.0], "velocity": [-200.0, 0.0], "mass": 0.5 }
//!   ],
//!   "interactions": [
//!     { "kind": "partial_destructive", "target": 1, "other": 0 }
//!   ]
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result, bail, ensure};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::MIN_POLYGON_AREA;
use crate::sim::polygon::signed_area;
use crate::sim::{
    Body, BodyId, Rgb, Scene, Vector, create_destructive_collision, create_drag,
    create_newtonian_gravity, create_partial_destructive_collision, create_physics_collision,
    shape,
};

/// Shape of a body, built around its `center`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeSpec {
    Circle { radius: f64, resolution: usize },
    Ellipse { radius_x: f64, radius_y: f64, resolution: usize },
    Square { side: f64 },
    Rectangle { width: f64, height: f64 },
    EquilateralTriangle { side: f64 },
    RightTriangle { scale: f64 },
    /// Counter-clockwise vertices; their centroid is moved to `center`
    Polygon { points: Vec<Vector> },
}

impl ShapeSpec {
    /// Vertices centered on `center`, rotated by `angle`
    pub fn vertices(&self, center: Vector, angle: f64) -> Result<Vec<Vector>> {
        let points = match self {
            ShapeSpec::Circle { radius, resolution } => {
                ensure!(*radius > 0.0, "circle radius must be positive");
                ensure!(*resolution >= 3, "circle resolution must be at least 3");
                shape::ellipse(*radius, *radius, center, *resolution, angle)
            }
            ShapeSpec::Ellipse {
                radius_x,
                radius_y,
                resolution,
            } => {
                ensure!(*radius_x > 0.0 && *radius_y > 0.0, "ellipse radii must be positive");
                ensure!(*resolution >= 3, "ellipse resolution must be at least 3");
                shape::ellipse(*radius_x, *radius_y, center, *resolution, angle)
            }
            ShapeSpec::Square { side } => {
                ensure!(*side > 0.0, "square side must be positive");
                shape::square(*side, center, angle)
            }
            ShapeSpec::Rectangle { width, height } => {
                ensure!(*width > 0.0 && *height > 0.0, "rectangle sides must be positive");
                shape::rectangle(*width, *height, center, angle)
            }
            ShapeSpec::EquilateralTriangle { side } => {
                ensure!(*side > 0.0, "triangle side must be positive");
                shape::equilateral_triangle(*side, center, angle)
            }
            ShapeSpec::RightTriangle { scale } => {
                ensure!(*scale > 0.0, "triangle scale must be positive");
                shape::right_triangle_345(*scale, center, angle)
            }
            ShapeSpec::Polygon { points } => {
                ensure!(points.len() >= 3, "polygon needs at least 3 points");
                ensure!(
                    signed_area(points).abs() > MIN_POLYGON_AREA,
                    "polygon has no area"
                );
                points.clone()
            }
        };
        Ok(points)
    }
}

fn default_mass() -> f64 {
    1.0
}

fn default_color() -> Rgb {
    Rgb::WHITE
}

/// One declared body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodySpec {
    pub shape: ShapeSpec,
    #[serde(default)]
    pub center: Vector,
    /// Initial rotation (radians)
    #[serde(default)]
    pub angle: f64,
    #[serde(default = "default_mass")]
    pub mass: f64,
    /// Infinite mass, overrides `mass`
    #[serde(default)]
    pub immovable: bool,
    #[serde(default = "default_color")]
    pub color: Rgb,
    #[serde(default)]
    pub velocity: Vector,
    /// Spin about the centroid (radians/second), applied by the stepper
    #[serde(default)]
    pub rotation_speed: f64,
}

impl BodySpec {
    pub fn build(&self) -> Result<Body> {
        let mass = if self.immovable {
            f64::INFINITY
        } else {
            ensure!(self.mass >= 0.0, "mass must be non-negative, got {}", self.mass);
            self.mass
        };

        let mut body = Body::new(self.shape.vertices(self.center, 0.0)?, mass, self.color);
        body.set_centroid(self.center);
        if self.angle != 0.0 {
            body.set_rotation(self.angle);
        }
        body.set_velocity(self.velocity);
        body.set_rotation_speed(self.rotation_speed);
        Ok(body)
    }
}

/// A force creator between listed bodies (indices into the body list)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InteractionSpec {
    Destructive { bodies: [usize; 2] },
    PartialDestructive { target: usize, other: usize },
    Physics { bodies: [usize; 2], elasticity: f64 },
    Gravity { bodies: [usize; 2], g: f64 },
    Drag { body: usize, gamma: f64 },
}

/// Seeded random squares for stress scenes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterSpec {
    pub seed: u64,
    pub count: usize,
    /// Lower-left corner of the spawn area
    pub min: Vector,
    /// Upper-right corner of the spawn area
    pub max: Vector,
    pub side_min: f64,
    pub side_max: f64,
    #[serde(default)]
    pub max_speed: f64,
    #[serde(default = "default_mass")]
    pub mass: f64,
    /// Bounce every scattered pair off each other with this restitution
    #[serde(default)]
    pub elasticity: Option<f64>,
}

impl ScatterSpec {
    fn spawn(&self) -> Result<Vec<Body>> {
        ensure!(
            self.min.x <= self.max.x && self.min.y <= self.max.y,
            "scatter bounds are inverted"
        );
        ensure!(
            self.side_min > 0.0 && self.side_min <= self.side_max,
            "scatter sides must satisfy 0 < side_min <= side_max"
        );
        ensure!(self.mass >= 0.0, "scatter mass must be non-negative");

        let mut rng = Pcg32::seed_from_u64(self.seed);
        let mut bodies = Vec::with_capacity(self.count);
        for _ in 0..self.count {
            let center = Vector::new(
                rng.random_range(self.min.x..=self.max.x),
                rng.random_range(self.min.y..=self.max.y),
            );
            let side = rng.random_range(self.side_min..=self.side_max);
            let angle = rng.random_range(0.0..std::f64::consts::TAU);
            let speed = rng.random_range(0.0..=self.max_speed.max(0.0));
            let heading = rng.random_range(0.0..std::f64::consts::TAU);
            let color = Rgb::new(rng.random(), rng.random(), rng.random());

            let mut body = Body::new(shape::square(side, center, angle), self.mass, color);
            body.set_velocity(crate::polar_to_cartesian(speed, heading));
            bodies.push(body);
        }
        Ok(bodies)
    }
}

/// A complete scene description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bodies: Vec<BodySpec>,
    #[serde(default)]
    pub interactions: Vec<InteractionSpec>,
    #[serde(default)]
    pub scatter: Option<ScatterSpec>,
}

impl Scenario {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load a scenario from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        let scenario = Self::from_json_str(&json)
            .with_context(|| format!("parsing scenario {}", path.display()))?;
        log::info!(
            "Loaded scenario '{}' ({} bodies, {} interactions)",
            scenario.name,
            scenario.bodies.len(),
            scenario.interactions.len()
        );
        Ok(scenario)
    }

    /// Built-in arena: a player, a wall, and projectiles aimed at both
    ///
    /// Panics if the bundled `scenarios/arena.json` does not parse.
    pub fn demo() -> Self {
        let json = include_str!("../scenarios/arena.json");
        Self::from_json_str(json).expect("bundled arena.json must parse")
    }

    /// Build the scene; returns it with the ids of all bodies in list order
    pub fn build(&self) -> Result<(Scene, Vec<BodyId>)> {
        let mut scene = Scene::new();
        let mut ids = Vec::with_capacity(self.bodies.len());

        for (i, spec) in self.bodies.iter().enumerate() {
            let body = spec.build().with_context(|| format!("body {i}"))?;
            ids.push(scene.add_body(body));
        }

        let scattered_from = ids.len();
        if let Some(scatter) = &self.scatter {
            for body in scatter.spawn().context("scatter")? {
                ids.push(scene.add_body(body));
            }
            if let Some(elasticity) = scatter.elasticity {
                ensure!(elasticity >= 0.0, "scatter elasticity must be non-negative");
                for i in scattered_from..ids.len() {
                    for j in (i + 1)..ids.len() {
                        create_physics_collision(&mut scene, ids[i], ids[j], elasticity);
                    }
                }
            }
        }

        let lookup = |index: usize| -> Result<BodyId> {
            match ids.get(index) {
                Some(&id) => Ok(id),
                None => bail!("interaction refers to body {index}, but only {} exist", ids.len()),
            }
        };

        for (i, interaction) in self.interactions.iter().enumerate() {
            let context = || format!("interaction {i}");
            match *interaction {
                InteractionSpec::Destructive { bodies: [a, b] } => {
                    let (a, b) = (lookup(a).with_context(context)?, lookup(b).with_context(context)?);
                    ensure!(a != b, "interaction {i} pairs a body with itself");
                    create_destructive_collision(&mut scene, a, b);
                }
                InteractionSpec::PartialDestructive { target, other } => {
                    let (t, o) = (
                        lookup(target).with_context(context)?,
                        lookup(other).with_context(context)?,
                    );
                    ensure!(t != o, "interaction {i} pairs a body with itself");
                    create_partial_destructive_collision(&mut scene, t, o);
                }
                InteractionSpec::Physics {
                    bodies: [a, b],
                    elasticity,
                } => {
                    let (a, b) = (lookup(a).with_context(context)?, lookup(b).with_context(context)?);
                    ensure!(a != b, "interaction {i} pairs a body with itself");
                    ensure!(elasticity >= 0.0, "interaction {i} has negative elasticity");
                    create_physics_collision(&mut scene, a, b, elasticity);
                }
                InteractionSpec::Gravity { bodies: [a, b], g } => {
                    let (a, b) = (lookup(a).with_context(context)?, lookup(b).with_context(context)?);
                    ensure!(a != b, "interaction {i} pairs a body with itself");
                    let finite = |id: BodyId| {
                        scene.find(id).is_some_and(|body| body.mass().is_finite())
                    };
                    ensure!(
                        finite(a) && finite(b),
                        "interaction {i} applies gravity to an immovable body"
                    );
                    create_newtonian_gravity(&mut scene, g, a, b);
                }
                InteractionSpec::Drag { body, gamma } => {
                    create_drag(&mut scene, gamma, lookup(body).with_context(context)?);
                }
            }
        }

        log::debug!(
            "built scenario '{}': {} bodies, {} force creators",
            self.name,
            scene.body_count(),
            scene.force_creator_count()
        );
        Ok((scene, ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_demo_scenario_builds() {
        let scenario = Scenario::demo();
        assert!(!scenario.bodies.is_empty());
        let (scene, ids) = scenario.build().unwrap();
        assert_eq!(scene.body_count(), ids.len());
        assert!(scene.force_creator_count() > 0);
    }

    #[test]
    fn test_body_spec_defaults() {
        let scenario = Scenario::from_json_str(
            r#"{ "bodies": [ { "shape": { "kind": "square", "side": 2.0 }, "center": [3.0, 4.0] } ] }"#,
        )
        .unwrap();
        let (scene, _) = scenario.build().unwrap();
        let body = scene.body(0);
        assert_relative_eq!(body.mass(), 1.0);
        assert_relative_eq!(body.centroid().x, 3.0, epsilon = 1e-9);
        assert_relative_eq!(body.centroid().y, 4.0, epsilon = 1e-9);
        assert_eq!(body.color(), Rgb::WHITE);
    }

    #[test]
    fn test_polygon_shape_is_recentered() {
        let scenario = Scenario::from_json_str(
            r#"{ "bodies": [ {
                "shape": { "kind": "polygon", "points": [[0.0, 0.0], [4.0, 0.0], [0.0, 3.0]] },
                "center": [10.0, 10.0],
                "immovable": true
            } ] }"#,
        )
        .unwrap();
        let (scene, _) = scenario.build().unwrap();
        assert_relative_eq!(scene.body(0).centroid().x, 10.0, epsilon = 1e-9);
        assert!(!scene.body(0).is_movable());
    }

    #[test]
    fn test_bad_interaction_index_is_error() {
        let scenario = Scenario::from_json_str(
            r#"{
                "bodies": [ { "shape": { "kind": "square", "side": 2.0 } } ],
                "interactions": [ { "kind": "destructive", "bodies": [0, 3] } ]
            }"#,
        )
        .unwrap();
        let err = scenario.build().unwrap_err();
        assert!(format!("{err:#}").contains("body 3"));
    }

    #[test]
    fn test_gravity_on_immovable_body_is_error() {
        let scenario = Scenario::from_json_str(
            r#"{
                "bodies": [
                    { "shape": { "kind": "square", "side": 10.0 }, "immovable": true },
                    { "shape": { "kind": "square", "side": 2.0 }, "center": [50.0, 0.0] }
                ],
                "interactions": [ { "kind": "gravity", "bodies": [1, 0], "g": 1.0 } ]
            }"#,
        )
        .unwrap();
        let err = scenario.build().unwrap_err();
        assert!(format!("{err:#}").contains("immovable"));
    }

    #[test]
    fn test_invalid_shape_is_error() {
        let scenario = Scenario::from_json_str(
            r#"{ "bodies": [ { "shape": { "kind": "circle", "radius": 1.0, "resolution": 2 } } ] }"#,
        )
        .unwrap();
        assert!(scenario.build().is_err());
    }

    #[test]
    fn test_unknown_shape_kind_fails_to_parse() {
        let result = Scenario::from_json_str(
            r#"{ "bodies": [ { "shape": { "kind": "hexagram", "side": 1.0 } } ] }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_scatter_is_deterministic() {
        let json = r#"{
            "scatter": {
                "seed": 7, "count": 12,
                "min": [0.0, 0.0], "max": [500.0, 500.0],
                "side_min": 5.0, "side_max": 15.0,
                "max_speed": 40.0, "elasticity": 0.8
            }
        }"#;
        let (a, ids) = Scenario::from_json_str(json).unwrap().build().unwrap();
        let (b, _) = Scenario::from_json_str(json).unwrap().build().unwrap();
        assert_eq!(ids.len(), 12);
        assert_eq!(a.force_creator_count(), 12 * 11 / 2);
        for i in 0..12 {
            assert_eq!(a.body(i).centroid(), b.body(i).centroid());
            assert_eq!(a.body(i).velocity(), b.body(i).velocity());
        }
    }
}
