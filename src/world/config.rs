use std::time::Duration;

use crate::error::{PhysicsError, Result};
use crate::math::Vec2;

/// Tuning knobs for a [`PhysicsWorld`](super::PhysicsWorld).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Velocity gained per second of simulated time. Default: (0, 9.81), y down.
    pub gravity: Vec2,
    /// Length of one fixed tick. Default: 1/600 s.
    pub time_step: Duration,
    /// Impulse solver passes per tick. Default: 100.
    pub collision_iterations: usize,
    /// Penetration left uncorrected to avoid jitter. Default: 0.05.
    pub penetration_allowance: f64,
    /// Fraction of the remaining penetration removed per tick, in [0, 1]. Default: 0.4.
    pub penetration_correction: f64,
    /// Points reported for a circle outline. Default: 24.
    pub circle_vertices: usize,
    /// Upper bound on live bodies. Default: unbounded.
    pub max_bodies: Option<usize>,
    /// Upper bound on manifolds kept per tick. Default: unbounded.
    pub max_manifolds: Option<usize>,
    /// Upper bound on ticks run by one `run_step` call. Default: unbounded.
    pub max_substeps: Option<usize>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 9.81),
            time_step: Duration::from_secs(1) / 600,
            collision_iterations: 100,
            penetration_allowance: 0.05,
            penetration_correction: 0.4,
            circle_vertices: 24,
            max_bodies: None,
            max_manifolds: None,
            max_substeps: None,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<()> {
        if self.time_step.is_zero() {
            return Err(PhysicsError::InvalidConfiguration("time step must be positive"));
        }
        if self.collision_iterations == 0 {
            return Err(PhysicsError::InvalidConfiguration(
                "collision iterations must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.penetration_correction) {
            return Err(PhysicsError::InvalidConfiguration(
                "penetration correction must be within [0, 1]",
            ));
        }
        if self.penetration_allowance.is_nan() || self.penetration_allowance < 0.0 {
            return Err(PhysicsError::InvalidConfiguration(
                "penetration allowance must be non-negative",
            ));
        }
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfiguration("gravity must be finite"));
        }
        if self.circle_vertices < 3 {
            return Err(PhysicsError::InvalidConfiguration(
                "circle outline needs at least 3 vertices",
            ));
        }
        if self.max_substeps == Some(0) {
            return Err(PhysicsError::InvalidConfiguration(
                "max substeps must be at least 1",
            ));
        }
        Ok(())
    }

    /// Tick length in milliseconds, the unit the integrator works in.
    pub(crate) fn time_step_ms(&self) -> f64 {
        self.time_step.as_secs_f64() * 1000.0
    }
}
