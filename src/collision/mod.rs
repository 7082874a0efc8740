pub mod detection;
pub mod manifold;
pub mod sat;

pub use detection::solve_manifold;
pub use manifold::Manifold;

/// Tolerance for "touching" and "negligible" comparisons in the narrow
/// phase and the solver.
pub const EPSILON: f64 = 1e-6;
