use crate::common::Material;
use crate::error::{PhysicsError, Result};
use crate::math::{Mat2, Vec2};
use crate::shapes::{Shape, ShapeType};

/// Outline resolution used to report circles as polygons when the body was
/// not created through a world.
pub const DEFAULT_CIRCLE_VERTICES: usize = 24;

/// How a body takes part in contact resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolidType {
    /// Collides with everything.
    Ground,
    /// Passes through `NonPassable` bodies.
    Passable,
    /// Passes through `Passable` bodies.
    #[default]
    NonPassable,
}

impl SolidType {
    /// False for the `Passable`/`NonPassable` combination in either order.
    pub fn interacts_with(self, other: SolidType) -> bool {
        !matches!(
            (self, other),
            (SolidType::NonPassable, SolidType::Passable)
                | (SolidType::Passable, SolidType::NonPassable)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    /// Excluded from dynamics when false; still collides.
    pub enabled: bool,

    // Geometry
    pub shape: Shape,
    pub material: Material,
    pub solid_type: SolidType,

    // Primary state
    pub position: Vec2, // World position of the center of mass
    pub velocity: Vec2,
    pub angular_velocity: f64,
    pub orient: f64, // Radians

    // Accumulators, cleared after every step
    pub force: Vec2,
    pub torque: f64,

    // Physical properties
    pub mass: f64,
    pub inv_mass: f64, // 0.0 for immovable bodies
    pub inertia: f64,
    pub inv_inertia: f64,

    pub use_gravity: bool,
    pub freeze_orient: bool,
    /// Set while a contact supports this body from below.
    pub is_grounded: bool,

    pub(crate) circle_vertices: usize,
}

impl RigidBody {
    /// Builds a body whose shape's local origin sits at `origin`.
    ///
    /// Polygons are re-centered on their centroid, so `position` ends up at
    /// the center of mass. A density of zero gives an immovable body.
    pub(crate) fn new(mut shape: Shape, origin: Vec2, density: f64) -> Self {
        let mass_data = shape.mass_data(density);
        if let Shape::Polygon(polygon) = &mut shape {
            polygon.recenter(mass_data.centroid);
        }

        Self {
            enabled: true,
            shape,
            material: Material::default(),
            solid_type: SolidType::default(),
            position: origin + mass_data.centroid,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            orient: 0.0,
            force: Vec2::ZERO,
            torque: 0.0,
            mass: mass_data.mass,
            inv_mass: mass_data.inverse_mass(),
            inertia: mass_data.inertia,
            inv_inertia: mass_data.inverse_inertia(),
            use_gravity: true,
            freeze_orient: false,
            is_grounded: false,
            circle_vertices: DEFAULT_CIRCLE_VERTICES,
        }
    }

    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }

    /// Adds to the force accumulator. Consumed by the next step.
    pub fn add_force(&mut self, force: Vec2) {
        self.force += force;
    }

    pub fn add_torque(&mut self, amount: f64) {
        self.torque += amount;
    }

    /// Sets the orientation and refreshes the polygon rotation matrix.
    pub fn set_rotation(&mut self, radians: f64) {
        self.orient = radians;
        if let Shape::Polygon(polygon) = &mut self.shape {
            polygon.transform = Mat2::from_radians(radians);
        }
    }

    pub fn shape_type(&self) -> ShapeType {
        self.shape.shape_type()
    }

    /// Number of outline points reported by [`shape_vertex`](Self::shape_vertex).
    pub fn vertex_count(&self) -> usize {
        match &self.shape {
            Shape::Circle(_) => self.circle_vertices,
            Shape::Polygon(polygon) => polygon.vertex_count(),
        }
    }

    /// World-space outline point, for drawing.
    pub fn shape_vertex(&self, index: usize) -> Result<Vec2> {
        let count = self.vertex_count();
        if index >= count {
            return Err(PhysicsError::InvalidVertexIndex { index, count });
        }
        Ok(match &self.shape {
            Shape::Circle(circle) => {
                let angle = self.orient + std::f64::consts::TAU * index as f64 / count as f64;
                self.position + Vec2::new(circle.radius, 0.0).rotate(angle)
            }
            Shape::Polygon(polygon) => polygon.world_vertex(index, self.position),
        })
    }

    /// Zeroes force and torque. Called at the end of every step.
    pub fn clear_accumulators(&mut self) {
        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }
}
