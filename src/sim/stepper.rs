//! Fixed-timestep driver
//!
//! Turns variable frame deltas into a whole number of fixed `Scene::tick`
//! calls, each followed by a spin of every body. Time never comes from a
//! clock here; the caller passes each frame's elapsed seconds.

use super::scene::Scene;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Accumulates frame time and ticks a scene in fixed steps
#[derive(Debug, Clone)]
pub struct Stepper {
    dt: f64,
    max_substeps: u32,
    max_frame_dt: f64,
    accumulator: f64,
    /// Fixed steps taken so far
    ticks: u64,
}

impl Default for Stepper {
    fn default() -> Self {
        Self::new(SIM_DT)
    }
}

impl Stepper {
    pub fn new(dt: f64) -> Self {
        Self::with_limits(dt, MAX_SUBSTEPS, MAX_FRAME_DT)
    }

    /// Panics if `dt` is not positive or `max_substeps` is zero
    pub fn with_limits(dt: f64, max_substeps: u32, max_frame_dt: f64) -> Self {
        assert!(dt > 0.0, "fixed timestep must be positive, got {dt}");
        assert!(max_substeps > 0, "max_substeps must be at least 1");
        Self {
            dt,
            max_substeps,
            max_frame_dt,
            accumulator: 0.0,
            ticks: 0,
        }
    }

    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Unsimulated time carried over to the next frame
    #[inline]
    pub fn pending(&self) -> f64 {
        self.accumulator
    }

    /// Feed one frame's elapsed time; returns the number of ticks run
    pub fn advance(&mut self, scene: &mut Scene, frame_dt: f64) -> u32 {
        let frame_dt = frame_dt.clamp(0.0, self.max_frame_dt);
        self.accumulator += frame_dt;

        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < self.max_substeps {
            scene.tick(self.dt);
            scene.spin_bodies(self.dt);
            self.accumulator -= self.dt;
            substeps += 1;
        }
        self.ticks += u64::from(substeps);

        if substeps == self.max_substeps && self.accumulator >= self.dt {
            log::warn!(
                "stepper fell behind: dropping {:.4}s of simulation time",
                self.accumulator
            );
            self.accumulator %= self.dt;
        }
        substeps
    }

    /// Forget any carried-over time
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
