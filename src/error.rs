//! Error type shared by every fallible world operation.

use thiserror::Error;

use crate::world::BodyHandle;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// The handle was destroyed, or belongs to another world.
    #[error("invalid body handle {0}")]
    InvalidHandle(BodyHandle),

    #[error("body index {index} out of range (count={count})")]
    InvalidBodyIndex { index: usize, count: usize },

    #[error("vertex index {index} out of range (count={count})")]
    InvalidVertexIndex { index: usize, count: usize },

    /// Shape parameters that cannot describe a convex body with positive area.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(&'static str),

    #[error("{resource} capacity of {limit} exceeded")]
    CapacityExceeded { resource: &'static str, limit: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}

pub type Result<T> = std::result::Result<T, PhysicsError>;
