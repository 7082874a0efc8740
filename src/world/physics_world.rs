use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::{
    collision::{solve_manifold, Manifold},
    error::{PhysicsError, Result},
    integration::integrator,
    math::vec2::Vec2,
    objects::rigid_body::RigidBody,
    shapes::{Circle, Polygon, Shape},
};

use super::arena::{BodyArena, BodyHandle};
use super::config::WorldConfig;
use super::solver;

/// Shatter fragments are shrunk toward their centroid by this factor so they
/// start out separated.
const SHATTER_SHRINK: f64 = 0.95;

/// Owns every body and runs the fixed-timestep simulation.
#[derive(Debug, Default)]
pub struct PhysicsWorld {
    bodies: BodyArena,
    manifolds: Vec<Manifold>,
    config: WorldConfig,
    accumulator: Duration,
    steps_count: u64,
}

impl PhysicsWorld {
    /// Creates an empty world with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty world after validating `config`.
    pub fn with_config(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    pub fn set_gravity(&mut self, x: f64, y: f64) -> Result<()> {
        let gravity = Vec2::new(x, y);
        if !gravity.is_finite() {
            return Err(PhysicsError::InvalidConfiguration("gravity must be finite"));
        }
        self.config.gravity = gravity;
        debug!(x, y, "gravity changed");
        Ok(())
    }

    pub fn time_step(&self) -> Duration {
        self.config.time_step
    }

    /// Changes the fixed tick length. Time already accumulated is kept.
    pub fn set_time_step(&mut self, time_step: Duration) -> Result<()> {
        if time_step.is_zero() {
            return Err(PhysicsError::InvalidConfiguration("time step must be positive"));
        }
        self.config.time_step = time_step;
        debug!(?time_step, "time step changed");
        Ok(())
    }

    /// Ticks simulated since creation or the last [`reset`](Self::reset).
    pub fn steps_count(&self) -> u64 {
        self.steps_count
    }

    // --- Body creation / destruction --- //

    /// Creates a circle body centered on `position`.
    pub fn create_circle(&mut self, position: Vec2, radius: f64, density: f64) -> Result<BodyHandle> {
        check_position(position)?;
        check_extent(radius, "circle radius must be positive")?;
        check_density(density)?;
        let body = RigidBody::new(Shape::Circle(Circle::new(radius)), position, density);
        self.insert_body(body)
    }

    /// Creates an axis-aligned box of `width` x `height` centered on `position`.
    pub fn create_rectangle(
        &mut self,
        position: Vec2,
        width: f64,
        height: f64,
        density: f64,
    ) -> Result<BodyHandle> {
        check_position(position)?;
        check_extent(width, "rectangle width must be positive")?;
        check_extent(height, "rectangle height must be positive")?;
        check_density(density)?;
        let polygon = Polygon::rectangle(Vec2::ZERO, Vec2::new(width, height));
        self.insert_body(RigidBody::new(Shape::Polygon(polygon), position, density))
    }

    /// Creates a regular polygon with `sides` vertices on a circle of `radius`.
    pub fn create_polygon(
        &mut self,
        position: Vec2,
        radius: f64,
        sides: usize,
        density: f64,
    ) -> Result<BodyHandle> {
        check_position(position)?;
        check_extent(radius, "polygon radius must be positive")?;
        if sides < 3 {
            return Err(PhysicsError::InvalidGeometry("polygon needs at least 3 sides"));
        }
        check_density(density)?;
        let polygon = Polygon::regular(radius, sides);
        self.insert_body(RigidBody::new(Shape::Polygon(polygon), position, density))
    }

    /// Creates a convex polygon body from world-space vertices. The body's
    /// position is the outline's centroid.
    pub fn create_body_from_vertices(
        &mut self,
        vertices: &[Vec2],
        density: f64,
    ) -> Result<BodyHandle> {
        check_density(density)?;
        let polygon = Polygon::from_vertices(vertices.to_vec())?;
        self.insert_body(RigidBody::new(Shape::Polygon(polygon), Vec2::ZERO, density))
    }

    fn check_capacity(&self, additional: usize) -> Result<()> {
        match self.config.max_bodies {
            Some(limit) if self.bodies.len() + additional > limit => {
                Err(PhysicsError::CapacityExceeded {
                    resource: "bodies",
                    limit,
                })
            }
            _ => Ok(()),
        }
    }

    fn insert_body(&mut self, mut body: RigidBody) -> Result<BodyHandle> {
        self.check_capacity(1)?;
        body.circle_vertices = self.config.circle_vertices;
        let shape = body.shape_type();
        let mass = body.mass;
        let handle = self.bodies.insert(body);
        debug!(%handle, ?shape, mass, "created body");
        Ok(handle)
    }

    /// Removes a body and hands it back. The last body in enumeration order
    /// takes the removed body's index; current manifolds are discarded.
    pub fn destroy_body(&mut self, handle: BodyHandle) -> Result<RigidBody> {
        let body = self
            .bodies
            .remove(handle)
            .ok_or(PhysicsError::InvalidHandle(handle))?;
        self.manifolds.clear();
        debug!(%handle, bodies = self.bodies.len(), "destroyed body");
        Ok(body)
    }

    /// Breaks a polygon body into one triangle per edge around `point`.
    ///
    /// Does nothing (and returns no handles) when `point` lies outside the
    /// body or the body is a circle. Each fragment keeps the parent's
    /// density, velocity and surface, and receives `force` pointing away
    /// from `point`.
    pub fn shatter(&mut self, handle: BodyHandle, point: Vec2, force: f64) -> Result<Vec<BodyHandle>> {
        let parent = self.body(handle)?;
        let Shape::Polygon(polygon) = &parent.shape else {
            return Ok(Vec::new());
        };
        let local_point = polygon.transform.transpose().mul_vec(point - parent.position);
        if !polygon.contains_local(local_point) {
            return Ok(Vec::new());
        }

        let n = polygon.vertex_count();
        self.check_capacity(n.saturating_sub(1))?;

        let area = polygon.signed_area();
        let density = if area > 0.0 { parent.mass / area } else { 0.0 };
        let outline: Vec<Vec2> = (0..n).map(|i| polygon.world_vertex(i, parent.position)).collect();

        let parent = self.destroy_body(handle)?;

        let mut fragments = Vec::with_capacity(n);
        for i in 0..n {
            let triangle = [outline[i], outline[(i + 1) % n], point];
            let centroid = (triangle[0] + triangle[1] + triangle[2]) / 3.0;
            let shrunk = triangle
                .iter()
                .map(|&v| centroid + (v - centroid) * SHATTER_SHRINK)
                .collect();
            // Skips slivers from a point lying on an edge.
            let Ok(piece) = Polygon::from_vertices(shrunk) else {
                continue;
            };

            let mut body = RigidBody::new(Shape::Polygon(piece), Vec2::ZERO, density);
            body.velocity = parent.velocity;
            body.angular_velocity = parent.angular_velocity;
            body.material = parent.material;
            body.solid_type = parent.solid_type;
            body.use_gravity = parent.use_gravity;
            body.freeze_orient = parent.freeze_orient;
            body.enabled = parent.enabled;
            body.add_force((body.position - point).normalize() * force);

            fragments.push(self.insert_body(body)?);
        }

        debug!(%handle, fragments = fragments.len(), "shattered body");
        Ok(fragments)
    }

    /// Drops every body and manifold; all outstanding handles become invalid.
    pub fn reset(&mut self) {
        let dropped = self.bodies.len();
        self.bodies.clear();
        self.manifolds.clear();
        self.accumulator = Duration::ZERO;
        self.steps_count = 0;
        debug!(dropped, "world reset");
    }

    // --- Accessors --- //

    pub fn body(&self, handle: BodyHandle) -> Result<&RigidBody> {
        self.bodies.get(handle).ok_or(PhysicsError::InvalidHandle(handle))
    }

    /// Mutable access to a body. Replacing the whole body is allowed; the
    /// handle keeps referring to the same slot.
    pub fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody> {
        self.bodies
            .get_mut(handle)
            .ok_or(PhysicsError::InvalidHandle(handle))
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.get(handle).is_some()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Body at an enumeration index. Indices shift when bodies are destroyed.
    pub fn body_at(&self, index: usize) -> Result<&RigidBody> {
        self.bodies
            .as_slice()
            .get(index)
            .ok_or(PhysicsError::InvalidBodyIndex {
                index,
                count: self.bodies.len(),
            })
    }

    pub fn handle_at(&self, index: usize) -> Result<BodyHandle> {
        self.bodies
            .handles()
            .get(index)
            .copied()
            .ok_or(PhysicsError::InvalidBodyIndex {
                index,
                count: self.bodies.len(),
            })
    }

    pub fn bodies(&self) -> impl Iterator<Item = &RigidBody> {
        self.bodies.as_slice().iter()
    }

    pub fn handles(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.bodies.handles().iter().copied()
    }

    pub fn manifold_count(&self) -> usize {
        self.manifolds.len()
    }

    /// Contacts found by the last tick. `body_a_idx`/`body_b_idx` are
    /// enumeration indices, valid until the next create or destroy.
    pub fn manifolds(&self) -> &[Manifold] {
        &self.manifolds
    }

    pub fn add_force(&mut self, handle: BodyHandle, force: Vec2) -> Result<()> {
        self.body_mut(handle)?.add_force(force);
        Ok(())
    }

    pub fn add_torque(&mut self, handle: BodyHandle, amount: f64) -> Result<()> {
        self.body_mut(handle)?.add_torque(amount);
        Ok(())
    }

    pub fn set_body_rotation(&mut self, handle: BodyHandle, radians: f64) -> Result<()> {
        self.body_mut(handle)?.set_rotation(radians);
        Ok(())
    }

    // --- Simulation --- //

    /// Feeds `elapsed` wall-clock time into the accumulator and runs as many
    /// fixed ticks as it covers. Returns the number of ticks run.
    pub fn run_step(&mut self, elapsed: Duration) -> usize {
        self.accumulator = self.accumulator.saturating_add(elapsed);
        let time_step = self.config.time_step;

        let mut ticks = 0;
        while self.accumulator >= time_step {
            if self.config.max_substeps.is_some_and(|max| ticks >= max) {
                warn!(
                    dropped = ?self.accumulator,
                    ticks,
                    "substep limit reached, dropping accumulated time"
                );
                self.accumulator = Duration::ZERO;
                break;
            }
            self.step();
            self.accumulator -= time_step;
            ticks += 1;
        }
        ticks
    }

    /// Advances the simulation by exactly one fixed tick.
    pub fn step(&mut self) {
        let dt = self.config.time_step_ms();
        let gravity = self.config.gravity;
        self.steps_count += 1;

        let bodies = self.bodies.as_mut_slice();
        for body in bodies.iter_mut() {
            body.is_grounded = false;
        }

        self.manifolds.clear();
        detect_collisions(bodies, &mut self.manifolds, self.config.max_manifolds);

        for body in bodies.iter_mut() {
            integrator::integrate_forces(body, dt, gravity);
        }

        for manifold in &mut self.manifolds {
            let (a, b) = (&bodies[manifold.body_a_idx], &bodies[manifold.body_b_idx]);
            solver::initialize_manifold(manifold, a, b, gravity, dt);
        }

        for _ in 0..self.config.collision_iterations {
            for manifold in &self.manifolds {
                let (a, b) = solver::pair_mut(bodies, manifold.body_a_idx, manifold.body_b_idx);
                solver::integrate_impulses(manifold, a, b);
            }
        }

        for body in bodies.iter_mut() {
            integrator::integrate_velocity(body, dt, gravity);
        }

        for manifold in &self.manifolds {
            let (a, b) = solver::pair_mut(bodies, manifold.body_a_idx, manifold.body_b_idx);
            solver::correct_positions(
                manifold,
                a,
                b,
                self.config.penetration_allowance,
                self.config.penetration_correction,
            );
        }

        for body in bodies.iter_mut() {
            body.clear_accumulators();
        }

        trace!(
            step = self.steps_count,
            bodies = bodies.len(),
            manifolds = self.manifolds.len(),
            "tick"
        );
    }
}

/// Brute-force narrow phase over every unordered pair. Marks grounded bodies.
fn detect_collisions(bodies: &mut [RigidBody], manifolds: &mut Vec<Manifold>, limit: Option<usize>) {
    let mut dropped = 0usize;
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (body_a, body_b) = (&bodies[i], &bodies[j]);
            if body_a.is_static() && body_b.is_static() {
                continue;
            }
            if !body_a.solid_type.interacts_with(body_b.solid_type) {
                continue;
            }
            let Some(manifold) = solve_manifold(body_a, i, body_b, j) else {
                continue;
            };
            if limit.is_some_and(|max| manifolds.len() >= max) {
                dropped += 1;
                continue;
            }

            // y grows downward: the body on the upper side of the contact rests on the other.
            if manifold.normal.y < 0.0 {
                bodies[j].is_grounded = true;
            } else if manifold.normal.y > 0.0 {
                bodies[i].is_grounded = true;
            }
            manifolds.push(manifold);
        }
    }

    if dropped > 0 {
        warn!(dropped, limit = ?limit, "manifold limit reached, contacts dropped this tick");
    }
}

fn check_position(position: Vec2) -> Result<()> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(PhysicsError::InvalidGeometry("position must be finite"))
    }
}

fn check_extent(value: f64, message: &'static str) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::InvalidGeometry(message))
    }
}

fn check_density(density: f64) -> Result<()> {
    if density.is_finite() && density >= 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::InvalidGeometry("density must be finite and non-negative"))
    }
}
