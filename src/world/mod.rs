pub mod arena;
pub mod config;
pub mod physics_world;
pub(crate) mod solver;

pub use arena::BodyHandle;
pub use config::WorldConfig;
pub use physics_world::PhysicsWorld;
