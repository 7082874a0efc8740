use crate::math::vec2::Vec2;

/// Contact information for one pair of bodies during one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Manifold {
    /// Dense index of the first body involved in the collision.
    pub body_a_idx: usize,
    /// Dense index of the second body involved in the collision.
    pub body_b_idx: usize,
    /// Depth of overlap along `normal`.
    pub penetration: f64,
    /// Unit collision normal, pointing from body A towards body B.
    pub normal: Vec2,
    /// World-space contact points; only the first `contact_count` are meaningful.
    pub contacts: [Vec2; 2],
    pub contact_count: usize,
    /// Mixed coefficients, filled in before the impulse iterations.
    pub restitution: f64,
    pub static_friction: f64,
    pub dynamic_friction: f64,
}

impl Manifold {
    /// An empty manifold for the pair; detection fills it in.
    pub fn new(body_a_idx: usize, body_b_idx: usize) -> Self {
        Self {
            body_a_idx,
            body_b_idx,
            penetration: 0.0,
            normal: Vec2::ZERO,
            contacts: [Vec2::ZERO; 2],
            contact_count: 0,
            restitution: 0.0,
            static_friction: 0.0,
            dynamic_friction: 0.0,
        }
    }

    pub fn has_contacts(&self) -> bool {
        self.contact_count > 0
    }

    /// The live contact points.
    pub fn contact_points(&self) -> &[Vec2] {
        &self.contacts[..self.contact_count]
    }
}
