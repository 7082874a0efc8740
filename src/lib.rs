//! Fixed-timestep 2D rigid body physics.
//!
//! Convex circles and polygons are stepped by a [`PhysicsWorld`]: contacts
//! come from SAT with incident-face clipping and are resolved by a
//! sequential impulse solver with Coulomb friction, restitution and
//! positional correction. The host calls [`PhysicsWorld::run_step`] once
//! per frame with the elapsed time; the world runs as many fixed ticks as
//! that covers.
//!
//! Coordinates follow screen conventions: y grows downward, so the default
//! gravity is `(0, 9.81)`.

pub mod collision;
pub mod common;
pub mod error;
pub mod integration;
pub mod math;
pub mod objects;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use collision::Manifold;
pub use common::Material;
pub use error::{PhysicsError, Result};
pub use math::{Mat2, Vec2};
pub use objects::{RigidBody, SolidType};
pub use shapes::{Circle, MassData, Polygon, Shape, ShapeType};
pub use world::{BodyHandle, PhysicsWorld, WorldConfig};
